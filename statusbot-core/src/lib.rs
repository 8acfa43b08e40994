// src/lib.rs

pub mod config;
pub mod health;
pub mod http;
pub mod platforms;
pub mod services;
pub mod status;
pub mod tasks;

pub use config::BotConfig;
pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
pub use statusbot_common::error::Error;
