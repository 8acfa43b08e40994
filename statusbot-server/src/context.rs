//! statusbot-server/src/context.rs
//!
//! Everything the running bot holds on to, built once from a validated config.

use std::sync::Arc;

use tracing::info;

use statusbot_core::config::DISCORD_HTTP_TIMEOUT;
use statusbot_core::health::{start_liveness_server, LivenessServer};
use statusbot_core::platforms::discord::{DiscordMessenger, DiscordPlatform};
use statusbot_core::services::StatusService;
use statusbot_core::status::{StatusBoard, StatusPresenter, StatuspageSource};
use statusbot_core::{BotConfig, DefaultHttpClient, Error};

pub struct ServerContext {
    pub config: BotConfig,
    pub platform: DiscordPlatform,
    pub service: Arc<StatusService>,
    pub liveness: LivenessServer,
}

impl ServerContext {
    pub async fn new(config: BotConfig) -> Result<Self, Error> {
        config.validate()?;

        let http_client = DefaultHttpClient::new(config.request_timeout)?;
        let source = StatuspageSource::new(
            Arc::new(http_client),
            config.summary_url.clone(),
            config.request_timeout,
        );
        let presenter = StatusPresenter::new(&config.service_name, config.status_page_url.clone());

        let platform = DiscordPlatform::new(config.token.clone(), DISCORD_HTTP_TIMEOUT);
        let messenger = DiscordMessenger::new(platform.http());
        let board = StatusBoard::new(
            Arc::new(messenger),
            config.default_channel_id,
            config.request_timeout,
        );

        let service = Arc::new(StatusService::new(Arc::new(source), presenter, board));
        info!(
            "Status board bound to channel {}; polling {} every {:?}",
            config.default_channel_id, config.summary_url, config.refresh_interval
        );

        let liveness = start_liveness_server(config.liveness_addr).await?;

        Ok(Self {
            config,
            platform,
            service,
            liveness,
        })
    }
}
