use std::io;

use taskdeck_core::{FieldErrors, FormError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] taskdeck_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Task ID cannot be empty")]
    EmptyTaskId,
    #[error("Invalid date '{0}'; expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Nothing to change; pass at least one field to update")]
    NothingToUpdate,
    #[error("Profile '{0}' is not signed in. Run `taskdeck auth login --email <email> --password <password>`.")]
    NotSignedIn(String),
    #[error("Configuration error: {0}")]
    Config(String),
    /// The failure was already shown to the user.
    #[error("command failed")]
    Reported,
}
