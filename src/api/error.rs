use reqwest::StatusCode;
use thiserror::Error;

use crate::cache::KeyTypeMismatch;
use crate::domain::error::DomainError;

/// Failure of one API call.
///
/// `Clone` so a single in-flight load can hand the same error to every caller
/// attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected locally; never reached the network.
    #[error("{message}")]
    Validation { message: String },
    #[error("request failed: {message}")]
    Transport { message: String },
    #[error("session expired")]
    Unauthorized,
    #[error("permission denied: {message}")]
    Forbidden { message: String },
    #[error("{entity} not found")]
    NotFound { entity: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("request rejected ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {message}")]
    Decode { message: String },
    #[error("invalid url: {message}")]
    Url { message: String },
    #[error(transparent)]
    Cache(#[from] KeyTypeMismatch),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify a non-success response, preferring the body's `message` or `error` field.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
        let code = status.as_u16();

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden { message },
            StatusCode::NOT_FOUND => Self::NotFound { entity: message },
            _ if status.is_server_error() => Self::Server {
                status: code,
                message,
            },
            _ => Self::Status {
                status: code,
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Short text suitable for showing to an operator.
    pub fn presentation_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Transport { .. } => "Could not reach the server.".to_string(),
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::Forbidden { .. } => "You do not have permission to perform this action.".to_string(),
            Self::NotFound { .. } => "The requested item was not found.".to_string(),
            Self::Server { .. } => "The server encountered an error.".to_string(),
            Self::Status { message, .. } => message.clone(),
            Self::Decode { .. } | Self::Url { .. } | Self::Cache(_) => {
                "Unexpected response from the server.".to_string()
            }
        }
    }
}

fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Url {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity } => Self::NotFound {
                entity: entity.to_string(),
            },
            DomainError::Validation { message } => Self::Validation { message },
        }
    }
}
