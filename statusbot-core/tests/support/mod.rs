// File: statusbot-core/tests/support/mod.rs
//
// Hand-written fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

use statusbot_common::error::FetchError;
use statusbot_common::models::message::RenderedMessage;
use statusbot_common::models::status::StatusSummary;
use statusbot_core::Error;
use statusbot_core::services::StatusService;
use statusbot_core::status::{MessageTransport, StatusBoard, StatusPresenter, StatusSource};

pub const DEFAULT_CHANNEL: Id<ChannelMarker> = Id::new(1344647779078766622);

/// Replays scripted fetch results; repeats the last one when exhausted.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<StatusSummary, FetchError>>>,
    last: Mutex<Option<Result<StatusSummary, FetchError>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<StatusSummary, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(&self) -> Result<StatusSummary, FetchError> {
        let next = self.script.lock().await.pop_front();
        let mut last = self.last.lock().await;
        if let Some(result) = next {
            *last = Some(result);
        }
        last.clone().unwrap_or_else(|| Err(FetchError::Request("no scripted result".into())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send(Id<ChannelMarker>, RenderedMessage),
    Lookup(Id<ChannelMarker>, Id<MessageMarker>),
    Edit(Id<ChannelMarker>, Id<MessageMarker>, RenderedMessage),
}

/// In-memory chat channel store that records every call.
#[derive(Default)]
pub struct RecordingTransport {
    pub calls: Mutex<Vec<Call>>,
    next_id: Mutex<u64>,
    live: Mutex<Vec<(Id<ChannelMarker>, Id<MessageMarker>)>>,
    pub rejected_channels: Mutex<Vec<Id<ChannelMarker>>>,
    pub send_delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_send_delay(delay: Duration) -> Self {
        Self {
            send_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Simulates the message being deleted by someone in the channel.
    pub async fn delete_all(&self) {
        self.live.lock().await.clear();
    }

    pub async fn reject(&self, channel: Id<ChannelMarker>) {
        self.rejected_channels.lock().await.push(channel);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn sends(&self) -> usize {
        self.calls().await.iter().filter(|c| matches!(c, Call::Send(..))).count()
    }

    pub async fn edits(&self) -> usize {
        self.calls().await.iter().filter(|c| matches!(c, Call::Edit(..))).count()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(
        &self,
        channel_id: Id<ChannelMarker>,
        message: &RenderedMessage,
    ) -> Result<Id<MessageMarker>, Error> {
        if let Some(delay) = self.send_delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().await.push(Call::Send(channel_id, message.clone()));
        if self.rejected_channels.lock().await.contains(&channel_id) {
            return Err(Error::Platform("Missing Permissions".into()));
        }

        let mut next = self.next_id.lock().await;
        *next += 1;
        let id = Id::new(1000 + *next);
        self.live.lock().await.push((channel_id, id));
        Ok(id)
    }

    async fn lookup(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<(), Error> {
        self.calls.lock().await.push(Call::Lookup(channel_id, message_id));
        if self.live.lock().await.contains(&(channel_id, message_id)) {
            Ok(())
        } else {
            Err(Error::NotFound("Unknown Message".into()))
        }
    }

    async fn edit(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        message: &RenderedMessage,
    ) -> Result<(), Error> {
        self.calls
            .lock()
            .await
            .push(Call::Edit(channel_id, message_id, message.clone()));
        Ok(())
    }
}

pub fn build_service(
    source: Arc<dyn StatusSource>,
    transport: Arc<RecordingTransport>,
) -> Arc<StatusService> {
    Arc::new(StatusService::new(
        source,
        StatusPresenter::new("Atlassian", "https://status.atlassian.com/"),
        StatusBoard::new(transport, DEFAULT_CHANNEL, Duration::from_secs(10)),
    ))
}
