//! Error type for exam service calls.

use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach exam service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("exam service error: {0}")]
    Api(#[from] ApiException),
    #[error("invalid response from exam service: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for problems with local input (bad file, bad URL, empty selection),
    /// false for anything that happened on the way to or inside the service.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Message suitable for an alert, without the category prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(err) => err.to_string(),
            Self::Api(err) => err.message.clone(),
            Self::Decode(message) | Self::InvalidInput(message) => message.clone(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
