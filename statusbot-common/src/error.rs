// ================================================================
// File: statusbot-common/src/error.rs
// ================================================================

use std::time::Duration;

use thiserror::Error;

/// Why a status summary could not be produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("unparseable summary body: {0}")]
    Parse(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Failures of the send-or-edit operation against the tracked message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Initial send was rejected (bad channel, missing permission, ...).
    #[error("failed to send status message: {0}")]
    SendFailed(String),

    /// The tracked message could not be resolved any more.
    #[error("tracked status message is missing: {0}")]
    MessageMissing(String),

    #[error("failed to edit status message: {0}")]
    EditFailed(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Timeout error: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_errors_keep_their_context() {
        let err = BoardError::MessageMissing("message 5 in channel 1: Unknown Message".into());
        assert_eq!(
            err.to_string(),
            "tracked status message is missing: message 5 in channel 1: Unknown Message"
        );
    }

    #[test]
    fn bad_socket_address_converts() {
        let err: Error = "not-an-addr".parse::<std::net::SocketAddr>().unwrap_err().into();
        assert!(matches!(err, Error::AddrParse(_)));
    }
}
