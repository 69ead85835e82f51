//! Error types for taskdeck-core

use thiserror::Error;

use crate::validation::FieldErrors;

/// Result type alias using taskdeck-core's Error
pub type Result<T> = std::result::Result<T, Error>;

const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur in taskdeck-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Form input rejected before any request was issued
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The server answered 401; the stored session has been cleared
    #[error("Authentication required")]
    Unauthorized,

    /// No session is stored for this client
    #[error("Not signed in")]
    NotSignedIn,

    /// Envelope with `success: false`
    #[error("{0}")]
    Application(String),

    /// Non-success HTTP status other than 401
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected envelope
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Credential storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Application(message) => message.clone(),
            Self::Unauthorized | Self::NotSignedIn => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Validation(errors) => errors.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_errors_surface_the_server_message_verbatim() {
        let error = Error::Application("Title cannot be empty".to_string());
        assert_eq!(error.user_message(), "Title cannot be empty");
    }

    #[test]
    fn transport_errors_use_the_generic_message() {
        let error = Error::Malformed("unexpected end of input".to_string());
        assert_eq!(error.user_message(), GENERIC_FAILURE_MESSAGE);

        let error = Error::Status {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(error.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn unauthorized_maps_to_session_expired() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert_eq!(Error::Unauthorized.user_message(), SESSION_EXPIRED_MESSAGE);
    }
}
