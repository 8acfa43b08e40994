// File: statusbot-core/src/platforms/discord/slashcommands/server_info.rs

use std::sync::Arc;
use tracing::{error, info, warn};
use twilight_http::Client as HttpClient;
use twilight_model::{
    application::command::CommandType,
    application::interaction::Interaction,
    application::interaction::application_command::{CommandDataOption, CommandOptionValue},
    channel::ChannelType,
    channel::message::MessageFlags,
    guild::Permissions,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::marker::ChannelMarker,
    id::Id,
};
use twilight_util::builder::command::{ChannelBuilder, CommandBuilder};

use statusbot_common::error::BoardError;

use crate::Error;
use crate::services::status_service::StatusService;

pub const SERVER_INFO_COMMAND: &str = "server-info";
pub const CHANNEL_OPTION: &str = "channel";

/// `/server-info [channel]`, admin-only by default.
pub fn create_server_info_command() -> CommandBuilder {
    CommandBuilder::new(
        SERVER_INFO_COMMAND,
        "Get the server status.",
        CommandType::ChatInput,
    )
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .option(
            ChannelBuilder::new(CHANNEL_OPTION, "Channel to send updates in")
                .channel_types([ChannelType::GuildText, ChannelType::GuildAnnouncement])
                .required(false),
        )
}

/// The channel picked by the invoker, if any.
pub fn channel_option(options: &[CommandDataOption]) -> Option<Id<ChannelMarker>> {
    options.iter().find_map(|opt| match (&opt.value, opt.name.as_str()) {
        (CommandOptionValue::Channel(id), CHANNEL_OPTION) => Some(*id),
        _ => None,
    })
}

/// Private reply for the outcome of a command-triggered refresh.
pub fn reply_text(result: &Result<Id<ChannelMarker>, (Id<ChannelMarker>, BoardError)>) -> String {
    match result {
        Ok(channel) => format!("Status updates will be sent to: <#{channel}>"),
        Err((_, BoardError::SendFailed(_))) => {
            "Failed to send the status embed. Check channel permissions.".to_string()
        }
        Err((channel, BoardError::MessageMissing(_))) => format!(
            "The status message in <#{channel}> could not be found. \
             Run /server-info with a channel to post a new one."
        ),
        Err((channel, BoardError::EditFailed(_))) => {
            format!("Failed to update the status embed in <#{channel}>. Check channel permissions.")
        }
    }
}

/// Runs the command's redirect-and-refresh. Returns the reply for the
/// deferred response, or `None` when there is no acknowledged response to
/// fill in.
pub async fn refresh_for_command(
    service: &StatusService,
    requested: Option<Id<ChannelMarker>>,
    acknowledged: bool,
) -> Option<String> {
    let result = service.select_and_refresh(requested).await;
    if let Err((channel, e)) = &result {
        error!("/server-info refresh for channel {channel} failed: {e}");
    }
    acknowledged.then(|| reply_text(&result))
}

/// Handle an incoming `/server-info` interaction.
///
/// Acknowledges with a deferred ephemeral response, runs the refresh, then
/// fills the deferred response in with the outcome. A failed acknowledgement
/// does not cancel the refresh.
pub async fn handle_server_info_interaction(
    http: &Arc<HttpClient>,
    service: &Arc<StatusService>,
    interaction: &Interaction,
    options: &[CommandDataOption],
) -> Result<(), Error> {
    let client = http.interaction(interaction.application_id);

    let deferred = client
        .create_response(
            interaction.id,
            &interaction.token,
            &InteractionResponse {
                kind: InteractionResponseType::DeferredChannelMessageWithSource,
                data: Some(InteractionResponseData {
                    flags: Some(MessageFlags::EPHEMERAL),
                    ..Default::default()
                }),
            },
        )
        .await;
    if let Err(e) = &deferred {
        warn!("Error deferring `/server-info`, refreshing anyway: {e}");
    }

    let requested = channel_option(options);
    info!("/server-info invoked (channel option: {requested:?})");

    let Some(text) = refresh_for_command(service, requested, deferred.is_ok()).await else {
        return Err(Error::Platform(
            "`/server-info` was not acknowledged; outcome not reported".into(),
        ));
    };

    client
        .update_response(&interaction.token)
        .content(Some(text.as_str()))
        .await
        .map_err(|e| Error::Platform(format!("Error responding to `/server-info`: {e}")))?;

    Ok(())
}
