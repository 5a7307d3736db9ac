use super::domain::AttachmentDescriptor;

/// Per-file upload cap honored by the intake surface.
pub const MAX_ATTACHMENT_BYTES: u64 = 25 * 1024 * 1024;
/// Aggregate cap across one submission's uploads.
pub const MAX_TOTAL_ATTACHMENT_BYTES: u64 = 100 * 1024 * 1024;

/// Size limits applied to a submission's attachment batch.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentPolicy {
    pub max_per_file: u64,
    pub max_total: u64,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_per_file: MAX_ATTACHMENT_BYTES,
            max_total: MAX_TOTAL_ATTACHMENT_BYTES,
        }
    }
}

/// Whole-batch rejection raised before any submission state exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentRejection {
    #[error("these files exceed the {limit} byte per-file limit: {}", .offending.join(", "))]
    PerFileTooLarge { offending: Vec<String>, limit: u64 },
    #[error("attachments total {total} bytes, above the {limit} byte limit")]
    TotalTooLarge { total: u64, limit: u64 },
}

impl AttachmentPolicy {
    /// Accepts the batch only when every file and the sum are within bounds.
    /// No partial acceptance: one oversized file rejects the lot.
    pub fn validate(&self, attachments: &[AttachmentDescriptor]) -> Result<(), AttachmentRejection> {
        let offending: Vec<String> = attachments
            .iter()
            .filter(|attachment| attachment.size_bytes > self.max_per_file)
            .map(|attachment| attachment.filename.clone())
            .collect();

        if !offending.is_empty() {
            return Err(AttachmentRejection::PerFileTooLarge {
                offending,
                limit: self.max_per_file,
            });
        }

        let total: u64 = attachments
            .iter()
            .map(|attachment| attachment.size_bytes)
            .sum();
        if total > self.max_total {
            return Err(AttachmentRejection::TotalTooLarge {
                total,
                limit: self.max_total,
            });
        }

        Ok(())
    }
}
