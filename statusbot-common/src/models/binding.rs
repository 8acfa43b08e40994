use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

/// Where the status message lives, and which message is currently tracked.
///
/// `message_id` is only ever set by a successful send and is cleared whenever
/// the channel is redirected. There is no history of earlier messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBinding {
    channel_id: Id<ChannelMarker>,
    message_id: Option<Id<MessageMarker>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Unset,
    Set(Id<MessageMarker>),
}

impl DisplayBinding {
    pub fn new(default_channel: Id<ChannelMarker>) -> Self {
        Self {
            channel_id: default_channel,
            message_id: None,
        }
    }

    pub fn channel_id(&self) -> Id<ChannelMarker> {
        self.channel_id
    }

    pub fn message_id(&self) -> Option<Id<MessageMarker>> {
        self.message_id
    }

    pub fn state(&self) -> BindingState {
        match self.message_id {
            Some(id) => BindingState::Set(id),
            None => BindingState::Unset,
        }
    }

    /// Point the binding at `channel`. Always drops the tracked message, even
    /// when `channel` is the one already bound; the old message is abandoned.
    pub fn redirect(&mut self, channel: Id<ChannelMarker>) {
        self.channel_id = channel;
        self.message_id = None;
    }

    pub fn record_sent(&mut self, message_id: Id<MessageMarker>) {
        self.message_id = Some(message_id);
    }
}
