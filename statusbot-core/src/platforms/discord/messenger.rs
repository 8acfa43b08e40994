use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client as HttpClient;
use twilight_http::error::ErrorType;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

use statusbot_common::models::message::RenderedMessage;

use crate::Error;
use crate::platforms::discord::embed::{link_row, to_embed};
use crate::status::board::MessageTransport;

/// [`MessageTransport`] over the Discord REST API.
#[derive(Clone)]
pub struct DiscordMessenger {
    http: Arc<HttpClient>,
}

impl DiscordMessenger {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

/// 404s become `NotFound`, everything else a platform error.
fn discord_error(what: &str, e: twilight_http::Error) -> Error {
    if let ErrorType::Response { status, .. } = e.kind() {
        if status.get() == 404 {
            return Error::NotFound(format!("{what}: {e}"));
        }
    }
    Error::Platform(format!("{what}: {e}"))
}

#[async_trait]
impl MessageTransport for DiscordMessenger {
    async fn send(
        &self,
        channel_id: Id<ChannelMarker>,
        message: &RenderedMessage,
    ) -> Result<Id<MessageMarker>, Error> {
        let embeds = [to_embed(message)];
        let components = [link_row(&message.link)];

        let created = self
            .http
            .create_message(channel_id)
            .embeds(&embeds)
            .components(&components)
            .await
            .map_err(|e| discord_error("Error sending status embed", e))?
            .model()
            .await
            .map_err(|e| Error::Platform(format!("Error reading created message: {e}")))?;

        Ok(created.id)
    }

    async fn lookup(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<(), Error> {
        self.http
            .message(channel_id, message_id)
            .await
            .map_err(|e| discord_error("Error fetching status message", e))?;
        Ok(())
    }

    async fn edit(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        message: &RenderedMessage,
    ) -> Result<(), Error> {
        let embeds = [to_embed(message)];
        let components = [link_row(&message.link)];

        self.http
            .update_message(channel_id, message_id)
            .embeds(Some(embeds.as_slice()))
            .components(Some(components.as_slice()))
            .await
            .map_err(|e| discord_error("Error editing status embed", e))?;
        Ok(())
    }
}
