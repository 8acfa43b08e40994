// File: src/platforms/mod.rs

use async_trait::async_trait;
use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformAuth {
    async fn authenticate(&mut self) -> Result<(), Error>;
    async fn is_authenticated(&self) -> Result<bool, Error>;
}

#[async_trait]
pub trait PlatformIntegration: PlatformAuth {
    async fn connect(&mut self) -> Result<(), Error>;
    async fn disconnect(&mut self) -> Result<(), Error>;
    async fn get_connection_status(&self) -> Result<ConnectionStatus, Error>;
}

pub mod discord;
