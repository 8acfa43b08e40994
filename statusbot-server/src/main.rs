use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use twilight_model::id::marker::{ApplicationMarker, ChannelMarker, GuildMarker};

use statusbot_core::config::{
    parse_id, DEFAULT_LIVENESS_ADDR, DEFAULT_SERVICE_NAME, DEFAULT_STATUS_PAGE_URL, DEFAULT_SUMMARY_URL,
};
use statusbot_core::platforms::PlatformIntegration;
use statusbot_core::platforms::discord::DiscordEvent;
use statusbot_core::platforms::discord::slashcommands::{handle_interaction_create, register_slash_commands};
use statusbot_core::services::StatusService;
use statusbot_core::tasks::status_refresh::spawn_status_refresh_task;
use statusbot_core::{BotConfig, Error};

mod context;
use context::ServerContext;

#[derive(Parser, Debug, Clone)]
#[command(name = "statusbot")]
#[command(author, version, about = "Statusbot - keeps a Statuspage summary posted in a Discord channel")]
struct Args {
    /// Discord bot token.
    #[arg(long, env = "TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Application id used for command registration; taken from READY when absent.
    #[arg(long, env = "CLIENT_ID")]
    application_id: Option<u64>,

    /// Register the slash command in this guild instead of globally.
    #[arg(long, env = "GUILD_ID")]
    guild_id: Option<u64>,

    /// Channel the status message goes to until an operator picks another.
    #[arg(long, env = "CHANNEL_ID")]
    channel_id: Option<u64>,

    #[arg(long, env = "STATUS_SUMMARY_URL", default_value = DEFAULT_SUMMARY_URL)]
    summary_url: String,

    /// Page the "View Status" button links to.
    #[arg(long, env = "STATUS_PAGE_URL", default_value = DEFAULT_STATUS_PAGE_URL)]
    status_page_url: String,

    #[arg(long, env = "STATUS_SERVICE_NAME", default_value = DEFAULT_SERVICE_NAME)]
    service_name: String,

    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value_t = 60)]
    refresh_interval_secs: u64,

    /// Upper bound for the status fetch and for each Discord message call.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 15)]
    request_timeout_secs: u64,

    #[arg(long, env = "LIVENESS_ADDR", default_value = DEFAULT_LIVENESS_ADDR)]
    liveness_addr: SocketAddr,
}

impl Args {
    fn into_config(self, token: String) -> Result<BotConfig, Error> {
        let channel_id = self
            .channel_id
            .ok_or_else(|| Error::Config("CHANNEL_ID is not set".into()))?;

        let mut config = BotConfig::new(token, parse_id::<ChannelMarker>("channel id", channel_id)?)?;
        config.application_id = self
            .application_id
            .map(|raw| parse_id::<ApplicationMarker>("application id", raw))
            .transpose()?;
        config.guild_id = self
            .guild_id
            .map(|raw| parse_id::<GuildMarker>("guild id", raw))
            .transpose()?;
        config.summary_url = self.summary_url;
        config.status_page_url = self.status_page_url;
        config.service_name = self.service_name;
        config.refresh_interval = Duration::from_secs(self.refresh_interval_secs);
        config.request_timeout = Duration::from_secs(self.request_timeout_secs);
        config.liveness_addr = self.liveness_addr;
        Ok(config)
    }
}

fn init_tracing() {
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::from_default_env()
        .add_directive("statusbot=info".parse().unwrap_or_default())
        .add_directive("statusbot_core=info".parse().unwrap_or_default())
        .add_directive("statusbot_server=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let token = match args.token.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => {
            error!("No bot token provided. Set TOKEN or pass --token.");
            process::exit(1);
        }
    };

    let config = match args.into_config(token) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    info!("Statusbot starting.");
    if let Err(e) = run_server(config).await {
        error!("Server error: {:?}", e);
        process::exit(1);
    }
    info!("Main finished. Goodbye!");
}

/// Starts the periodic refresh unless it already runs. READY repeats after a
/// reconnect; the timer must not. Returns whether a task was spawned.
fn ensure_refresh_task(
    slot: &mut Option<JoinHandle<()>>,
    service: &Arc<StatusService>,
    period: Duration,
) -> bool {
    if slot.is_some() {
        debug!("Refresh task already running; ignoring repeated READY.");
        return false;
    }
    *slot = Some(spawn_status_refresh_task(service.clone(), period));
    true
}

async fn run_server(config: BotConfig) -> Result<(), Error> {
    let mut ctx = ServerContext::new(config).await?;
    ctx.platform.connect().await?;

    let mut refresh_task: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            event = ctx.platform.next_event() => {
                let Some(event) = event else {
                    warn!("Gateway event stream ended.");
                    break;
                };
                match event {
                    DiscordEvent::Ready { application_id, user_id, user_name } => {
                        info!("Logged in as {user_name} (ID={user_id})");

                        let app_id = ctx.config.application_id.unwrap_or(application_id);
                        if let Err(e) =
                            register_slash_commands(&ctx.platform.http(), app_id, ctx.config.guild_id).await
                        {
                            error!("Slash command registration failed: {e}");
                        }

                        ensure_refresh_task(&mut refresh_task, &ctx.service, ctx.config.refresh_interval);
                    }
                    DiscordEvent::Interaction(interaction) => {
                        debug!("Dispatching interaction {}", interaction.id);
                        let http = ctx.platform.http();
                        let service = ctx.service.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_interaction_create(http, service, &interaction).await {
                                error!("Interaction handling failed: {e}");
                            }
                        });
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C detected; shutting down.");
                break;
            }
        }
    }

    if let Some(task) = refresh_task.take() {
        task.abort();
    }
    if let Err(e) = ctx.platform.disconnect().await {
        error!("Error while disconnecting from Discord: {e}");
    }
    ctx.liveness.shutdown().await;
    Ok(())
}
