pub mod embed;
pub mod messenger;
pub mod runtime;
pub mod slashcommands;

pub use messenger::DiscordMessenger;
pub use runtime::{DiscordEvent, DiscordPlatform};
