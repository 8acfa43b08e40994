// File: statusbot-core/src/platforms/discord/slashcommands/mod.rs

pub mod server_info;

use std::sync::Arc;
use tracing::{debug, info, warn};
use twilight_http::Client as HttpClient;
use twilight_model::{
    application::interaction::InteractionData,
    channel::message::MessageFlags,
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::marker::{ApplicationMarker, GuildMarker},
    id::Id,
};

use crate::Error;
use crate::services::status_service::StatusService;
use crate::platforms::discord::slashcommands::server_info::{
    create_server_info_command,
    handle_server_info_interaction,
    SERVER_INFO_COMMAND,
};

/// Registers the bot's slash commands, scoped to `guild_id` when given so
/// changes show up immediately, otherwise globally.
pub async fn register_slash_commands(
    http: &HttpClient,
    application_id: Id<ApplicationMarker>,
    guild_id: Option<Id<GuildMarker>>,
) -> Result<(), Error> {
    let commands = [create_server_info_command().build()];
    let client = http.interaction(application_id);

    match guild_id {
        Some(guild_id) => {
            client
                .set_guild_commands(guild_id, &commands)
                .await
                .map_err(|e| Error::Platform(format!("Failed to register guild slash commands: {e}")))?;
            info!("Registered {} slash command(s) in guild {guild_id}", commands.len());
        }
        None => {
            client
                .set_global_commands(&commands)
                .await
                .map_err(|e| Error::Platform(format!("Failed to register global slash commands: {e}")))?;
            info!("Registered {} global slash command(s)", commands.len());
        }
    }

    Ok(())
}

/// Dispatch slash commands from an `InteractionCreate`.
pub async fn handle_interaction_create(
    http: Arc<HttpClient>,
    service: Arc<StatusService>,
    event: &InteractionCreate,
) -> Result<(), Error> {
    let interaction = &event.0;

    let Some(InteractionData::ApplicationCommand(cmd_data)) = &interaction.data else {
        debug!("Ignoring non-command interaction {}", interaction.id);
        return Ok(());
    };

    match cmd_data.name.as_str() {
        SERVER_INFO_COMMAND => {
            handle_server_info_interaction(&http, &service, interaction, &cmd_data.options).await?;
        }
        other => {
            warn!("Unrecognized slash command: {other}");
            http.interaction(interaction.application_id)
                .create_response(
                    interaction.id,
                    &interaction.token,
                    &InteractionResponse {
                        kind: InteractionResponseType::ChannelMessageWithSource,
                        data: Some(InteractionResponseData {
                            content: Some(format!("Unrecognized command: {other}")),
                            flags: Some(MessageFlags::EPHEMERAL),
                            ..Default::default()
                        }),
                    },
                )
                .await
                .ok(); // ignore error
        }
    }

    Ok(())
}
