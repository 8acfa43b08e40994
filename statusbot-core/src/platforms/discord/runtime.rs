use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, UserMarker};

use crate::Error;
use crate::platforms::{ConnectionStatus, PlatformAuth, PlatformIntegration};

/// Gateway events the bot acts on.
#[derive(Debug, Clone)]
pub enum DiscordEvent {
    Ready {
        application_id: Id<ApplicationMarker>,
        user_id: Id<UserMarker>,
        user_name: String,
    },
    Interaction(Box<InteractionCreate>),
}

/// Hands `event` to the receiver; `false` once the receiver is gone.
fn forward(shard_id: u32, tx: &UnboundedSender<DiscordEvent>, event: DiscordEvent) -> bool {
    if tx.send(event).is_err() {
        warn!("Shard {shard_id} => event receiver dropped; stopping.");
        return false;
    }
    true
}

/// Reads events from one shard and forwards the ones we care about to `tx`.
async fn shard_runner(mut shard: Shard, tx: UnboundedSender<DiscordEvent>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    let wanted = EventTypeFlags::READY | EventTypeFlags::INTERACTION_CREATE;
    while let Some(item) = shard.next_event(wanted).await {
        let event = match item {
            Ok(Event::Ready(ready)) => {
                info!(
                    "Shard {shard_id} => READY. Logged in as {} (ID={})",
                    ready.user.name, ready.user.id
                );
                DiscordEvent::Ready {
                    application_id: ready.application.id,
                    user_id: ready.user.id,
                    user_name: ready.user.name.clone(),
                }
            }
            Ok(Event::InteractionCreate(interaction)) => {
                debug!("Shard {shard_id} => interaction {}", interaction.id);
                DiscordEvent::Interaction(interaction)
            }
            Ok(other) => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
                continue;
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
                continue;
            }
        };

        if !forward(shard_id, &tx, event) {
            break;
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// Gateway connection plus the REST client shared with the status board.
pub struct DiscordPlatform {
    pub token: String,
    pub connection_status: ConnectionStatus,

    /// Filled in by `connect`, cleared by `disconnect`.
    pub rx: Mutex<Option<UnboundedReceiver<DiscordEvent>>>,

    pub shard_tasks: Vec<JoinHandle<()>>,
    pub shard_senders: Vec<MessageSender>,

    pub http: Arc<HttpClient>,
}

impl DiscordPlatform {
    pub fn new(token: String, http_timeout: Duration) -> Self {
        let http = Arc::new(
            ClientBuilder::new()
                .token(token.clone())
                .timeout(http_timeout)
                .build(),
        );
        Self {
            token,
            connection_status: ConnectionStatus::Disconnected,
            rx: Mutex::new(None),
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
            http,
        }
    }

    pub fn http(&self) -> Arc<HttpClient> {
        self.http.clone()
    }

    /// Waits for the next forwarded gateway event. `None` once every shard
    /// has stopped or before `connect`.
    pub async fn next_event(&self) -> Option<DiscordEvent> {
        let mut guard = self.rx.lock().await;
        match guard.as_mut() {
            Some(r) => r.recv().await,
            None => None,
        }
    }
}

#[async_trait]
impl PlatformAuth for DiscordPlatform {
    async fn authenticate(&mut self) -> Result<(), Error> {
        if self.token.trim().is_empty() {
            return Err(Error::Auth("Discord token is empty".into()));
        }
        Ok(())
    }

    async fn is_authenticated(&self) -> Result<bool, Error> {
        Ok(!self.token.trim().is_empty())
    }
}

#[async_trait]
impl PlatformIntegration for DiscordPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if matches!(self.connection_status, ConnectionStatus::Connected) {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }
        self.authenticate().await?;

        let (tx, rx) = unbounded_channel::<DiscordEvent>();
        {
            let mut guard = self.rx.lock().await;
            *guard = Some(rx);
        }

        // Slash commands only need guild metadata; no privileged intents.
        let config = Config::new(self.token.clone(), Intents::GUILDS);

        let shards = match gateway::create_recommended(&self.http, config, |_, b| b.build()).await {
            Ok(shards) => shards,
            Err(e) => {
                self.connection_status = ConnectionStatus::Error(e.to_string());
                return Err(Error::Platform(format!("create_recommended error: {e}")));
            }
        };

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let tx_for_shard = tx.clone();
            let handle = tokio::spawn(shard_runner(shard, tx_for_shard));
            self.shard_tasks.push(handle);
        }

        info!("(DiscordPlatform) Connected with {} shard(s)", self.shard_tasks.len());
        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for task in &mut self.shard_tasks {
            let _ = task.await;
        }

        self.shard_senders.clear();
        self.shard_tasks.clear();

        {
            let mut guard = self.rx.lock().await;
            *guard = None;
        }

        Ok(())
    }

    async fn get_connection_status(&self) -> Result<ConnectionStatus, Error> {
        Ok(self.connection_status.clone())
    }
}
