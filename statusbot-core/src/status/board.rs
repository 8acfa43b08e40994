use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

use statusbot_common::error::BoardError;
use statusbot_common::models::binding::{BindingState, DisplayBinding};
use statusbot_common::models::message::RenderedMessage;

use crate::Error;

/// The three chat-platform calls an upsert is made of.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(
        &self,
        channel_id: Id<ChannelMarker>,
        message: &RenderedMessage,
    ) -> Result<Id<MessageMarker>, Error>;

    async fn lookup(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<(), Error>;

    async fn edit(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        message: &RenderedMessage,
    ) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Sent(Id<MessageMarker>),
    Edited(Id<MessageMarker>),
}

/// Owns the display binding and keeps the one tracked message up to date.
///
/// All reads and writes of the binding go through a [`BoardSession`], which
/// holds the binding lock for as long as it lives. Whoever holds a session has
/// exclusive use of the binding, so a refresh cycle and a channel change can
/// never interleave.
pub struct StatusBoard {
    transport: Arc<dyn MessageTransport>,
    binding: Mutex<DisplayBinding>,
    call_timeout: Duration,
}

impl StatusBoard {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        default_channel: Id<ChannelMarker>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            binding: Mutex::new(DisplayBinding::new(default_channel)),
            call_timeout,
        }
    }

    /// Waits for exclusive access to the binding.
    pub async fn session(&self) -> BoardSession<'_> {
        BoardSession {
            board: self,
            binding: self.binding.lock().await,
        }
    }

    /// Copy of the current binding.
    pub async fn snapshot(&self) -> DisplayBinding {
        *self.binding.lock().await
    }

    /// Send-if-absent, edit-if-present against `binding`.
    ///
    /// Only a successful send changes the binding. Every failure leaves it
    /// exactly as it was; in particular a missing message is reported, not
    /// re-sent.
    async fn upsert(
        &self,
        binding: &mut DisplayBinding,
        message: &RenderedMessage,
    ) -> Result<UpsertOutcome, BoardError> {
        let channel_id = binding.channel_id();

        match binding.state() {
            BindingState::Unset => {
                let message_id = self
                    .bounded("send", self.transport.send(channel_id, message))
                    .await
                    .map_err(|e| BoardError::SendFailed(format!("channel {channel_id}: {e}")))?;

                binding.record_sent(message_id);
                info!("Posted new status message {message_id} in channel {channel_id}");
                Ok(UpsertOutcome::Sent(message_id))
            }
            BindingState::Set(message_id) => {
                self.bounded("lookup", self.transport.lookup(channel_id, message_id))
                    .await
                    .map_err(|e| {
                        BoardError::MessageMissing(format!(
                            "message {message_id} in channel {channel_id}: {e}"
                        ))
                    })?;

                self.bounded("edit", self.transport.edit(channel_id, message_id, message))
                    .await
                    .map_err(|e| {
                        BoardError::EditFailed(format!("message {message_id} in channel {channel_id}: {e}"))
                    })?;

                debug!("Edited status message {message_id} in channel {channel_id}");
                Ok(UpsertOutcome::Edited(message_id))
            }
        }
    }

    async fn bounded<T>(
        &self,
        op: &str,
        call: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(elapsed) => {
                warn!("Discord {op} call exceeded {:?}", self.call_timeout);
                Err(Error::Timeout(elapsed))
            }
        }
    }
}

/// Exclusive handle on the board's binding.
pub struct BoardSession<'a> {
    board: &'a StatusBoard,
    binding: MutexGuard<'a, DisplayBinding>,
}

impl BoardSession<'_> {
    pub fn binding(&self) -> &DisplayBinding {
        &self.binding
    }

    /// Retarget to `channel`; the next upsert sends a fresh message there.
    pub fn redirect(&mut self, channel: Id<ChannelMarker>) {
        let previous = self.binding.channel_id();
        self.binding.redirect(channel);
        info!("Status channel redirected from {previous} to {channel}");
    }

    pub async fn upsert(&mut self, message: &RenderedMessage) -> Result<UpsertOutcome, BoardError> {
        self.board.upsert(&mut self.binding, message).await
    }
}
