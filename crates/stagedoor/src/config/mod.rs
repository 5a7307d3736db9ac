use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub platform: PlatformConfig,
    pub channels: ChannelConfig,
    pub auto_reply: Option<AutoReplyConfig>,
    pub stream_watch: Option<StreamWatchConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let bot_token = env::var("TOKEN").map_err(|_| ConfigError::MissingVar("TOKEN"))?;
        let application_id = optional_id("APPID")?;
        let owner_id = optional_id("OWNER_ID")?;

        let channels = ChannelConfig {
            intake: optional_id("SUBMISSION_CHANNELID")?,
            accepted: optional_id("ACCEPTED_CHANNELID")?,
            denied: optional_id("DENIED_CHANNELID")?,
            held: optional_id("HELD_CHANNELID")?,
        };

        let auto_reply = optional_id("STICKERID")?.map(|sticker_id| AutoReplyConfig { sticker_id });
        let stream_watch = StreamWatchConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            platform: PlatformConfig {
                bot_token,
                application_id,
                owner_id,
            },
            channels,
            auto_reply,
            stream_watch,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Chat platform credentials and the owner gate.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub bot_token: String,
    pub application_id: Option<u64>,
    pub owner_id: Option<u64>,
}

/// Channel ids for intake and the three review destinations.
///
/// Every entry is optional; an absent id disables that branch only.
#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
    pub intake: Option<u64>,
    pub accepted: Option<u64>,
    pub denied: Option<u64>,
    pub held: Option<u64>,
}

/// Sticker used by the keyword auto-reply.
#[derive(Debug, Clone)]
pub struct AutoReplyConfig {
    pub sticker_id: u64,
}

/// Stream watcher credentials and announcement channel.
#[derive(Debug, Clone)]
pub struct StreamWatchConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub channel_id: u64,
}

impl StreamWatchConfig {
    /// The watcher is enabled only when the full credential set is present.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let client_id = env::var("TWITCH_CLIENT_ID").ok();
        let client_secret = env::var("TWITCH_CLIENT_SECRET").ok();
        let username = env::var("TWITCH_USERNAME").ok();
        let channel_id = optional_id("TWITCH_NOTIFICATION_CHANNELID")?;

        match (client_id, client_secret, username, channel_id) {
            (Some(client_id), Some(client_secret), Some(username), Some(channel_id)) => {
                Ok(Some(Self {
                    client_id,
                    client_secret,
                    username,
                    channel_id,
                }))
            }
            _ => Ok(None),
        }
    }
}

fn optional_id(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidId { name }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingVar(&'static str),
    InvalidId { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingVar(name) => write!(f, "{name} must be set"),
            ConfigError::InvalidId { name } => {
                write!(f, "{name} must be a numeric platform id")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
