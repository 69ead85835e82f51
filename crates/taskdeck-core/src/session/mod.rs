//! Authentication state exposed to the view layer.

use std::sync::Arc;

use crate::auth::{CredentialStore, Session};
use crate::error::{Error, Result};
use crate::navigation::{Navigator, Route};

/// Per-app-instance view of the session. Every read goes through the
/// credential store, so presence here always matches what is persisted.
#[derive(Clone)]
pub struct SessionContext {
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    /// Mount the context for an authenticated area. Does not redirect.
    pub fn mount(credentials: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            credentials,
            navigator,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.read().is_some()
    }

    pub fn session(&self) -> Option<Session> {
        self.credentials.read()
    }

    pub fn require_session(&self) -> Result<Session> {
        self.session().ok_or(Error::NotSignedIn)
    }

    /// Clear the stored session and return to the login entry point.
    pub fn logout(&self) {
        self.credentials.clear();
        self.navigator.navigate(Route::Login);
        tracing::info!("Signed out");
    }
}
