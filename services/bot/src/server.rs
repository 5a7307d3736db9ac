use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stagedoor::config::AppConfig;
use stagedoor::error::AppError;
use stagedoor::telemetry;
use stagedoor::workflows::autoreply::AutoReply;
use stagedoor::workflows::streamwatch::{HelixSource, StreamWatcher};
use stagedoor::workflows::submissions::domain::{ChannelId, StickerId, UserId};
use stagedoor::workflows::submissions::http::SubmissionApp;
use stagedoor::workflows::submissions::rest::RestChatGateway;
use stagedoor::workflows::submissions::routing::ChannelDirectory;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(RestChatGateway::new(config.platform.bot_token.clone()));
    let directory = ChannelDirectory::from_config(&config.channels);
    let owner = config.platform.owner_id.map(UserId);
    let auto_reply = config
        .auto_reply
        .as_ref()
        .map(|settings| AutoReply::with_defaults(StickerId(settings.sticker_id)));

    let submission_app = Arc::new(SubmissionApp::new(
        gateway.clone(),
        directory,
        owner,
        auto_reply,
    ));

    if let Some(settings) = &config.stream_watch {
        let source = HelixSource::new(settings);
        let watcher = StreamWatcher::new(
            source,
            gateway.clone(),
            ChannelId(settings.channel_id),
            settings.username.clone(),
        );
        info!(username = %settings.username, "stream watcher started");
        tokio::spawn(watcher.run());
    }

    let app = with_service_routes(submission_app)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "stagedoor review desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
