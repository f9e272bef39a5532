use thiserror::Error;

use crate::api::TransportError;

/// Error type that captures client-side failures talking to the marketplace.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Unexpected status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("You must be logged in to {0}")]
    LoginRequired(&'static str),
    #[error("Unknown form field: {0}")]
    UnknownField(String),
    #[error("Only administrators can set {0}")]
    AdminOnly(String),
    #[error("Session store unavailable: {0}")]
    SessionStore(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    Input(String),
}
