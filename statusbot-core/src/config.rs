//! Runtime configuration for the bot, validated once at startup.

use std::net::SocketAddr;
use std::time::Duration;

use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, ChannelMarker, GuildMarker};
use url::Url;

use crate::Error;

pub const DEFAULT_SUMMARY_URL: &str = "https://status.atlassian.com/api/v2/summary.json";
pub const DEFAULT_STATUS_PAGE_URL: &str = "https://status.atlassian.com/";
pub const DEFAULT_SERVICE_NAME: &str = "Atlassian";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_LIVENESS_ADDR: &str = "0.0.0.0:8080";

/// Timeout for the twilight REST client itself; individual board calls are
/// bounded separately by `request_timeout`.
pub const DISCORD_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub application_id: Option<Id<ApplicationMarker>>,
    pub guild_id: Option<Id<GuildMarker>>,
    pub default_channel_id: Id<ChannelMarker>,
    pub summary_url: String,
    pub status_page_url: String,
    pub service_name: String,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub liveness_addr: SocketAddr,
}

impl BotConfig {
    /// Config with every optional value at its default.
    pub fn new(token: impl Into<String>, default_channel_id: Id<ChannelMarker>) -> Result<Self, Error> {
        Ok(Self {
            token: token.into(),
            application_id: None,
            guild_id: None,
            default_channel_id,
            summary_url: DEFAULT_SUMMARY_URL.to_string(),
            status_page_url: DEFAULT_STATUS_PAGE_URL.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            liveness_addr: DEFAULT_LIVENESS_ADDR.parse()?,
        })
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.token.trim().is_empty() {
            return Err(Error::Config("bot token is empty".into()));
        }
        check_http_url("summary URL", &self.summary_url)?;
        check_http_url("status page URL", &self.status_page_url)?;
        if self.service_name.trim().is_empty() {
            return Err(Error::Config("service name is empty".into()));
        }
        if self.refresh_interval.is_zero() {
            return Err(Error::Config("refresh interval must be greater than zero".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::Config("request timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

fn check_http_url(what: &str, raw: &str) -> Result<(), Error> {
    let url = Url::parse(raw).map_err(|e| Error::Config(format!("invalid {what} '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!("{what} must be http(s), got '{other}'"))),
    }
}

/// Parses a non-zero Discord snowflake.
pub fn parse_id<T>(what: &str, raw: u64) -> Result<Id<T>, Error> {
    Id::new_checked(raw).ok_or_else(|| Error::Config(format!("{what} must be a non-zero snowflake")))
}
