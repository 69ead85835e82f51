//! Session model, credential storage, and the login/registration client.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gateway::HttpGateway;
use crate::util::normalize_text_option;
use crate::validation::{LoginForm, RegistrationForm};

const AUTHENTICATE_PATH: &str = "/users/authenticate";
const REGISTER_PATH: &str = "/users/register";

/// The authenticated identity and bearer credential held by the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub user_name: String,
    pub token: String,
}

impl Session {
    /// Build a session; all three fields must be non-blank.
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Option<Self> {
        let session = Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            token: token.into(),
        };
        session.is_complete().then_some(session)
    }

    pub fn is_complete(&self) -> bool {
        [&self.user_id, &self.user_name, &self.token]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Persistent storage for the single serialized [`Session`].
///
/// `read` never fails: missing, unparsable, or partial data reads as absent.
pub trait CredentialStore: Send + Sync {
    fn save(&self, session: &Session) -> Result<()>;
    fn read(&self) -> Option<Session>;
    fn clear(&self);
}

/// Decode a stored session, treating anything unusable as absent.
pub fn decode_stored_session(raw: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(raw) {
        Ok(session) if session.is_complete() => Some(session),
        Ok(_) => {
            tracing::warn!("Ignoring stored session with missing fields");
            None
        }
        Err(error) => {
            tracing::warn!("Ignoring unreadable stored session: {}", error);
            None
        }
    }
}

pub fn encode_session(session: &Session) -> Result<String> {
    if !session.is_complete() {
        return Err(Error::Storage(
            "refusing to store a partially populated session".to_string(),
        ));
    }
    Ok(serde_json::to_string(session)?)
}

/// In-process store holding the raw serialized session under one slot.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    raw: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with arbitrary raw content, as a browser storage slot
    /// might hold after manual edits.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|raw| raw.clone())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, session: &Session) -> Result<()> {
        let encoded = encode_session(session)?;
        let mut slot = self
            .raw
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *slot = Some(encoded);
        Ok(())
    }

    fn read(&self) -> Option<Session> {
        let raw = self.raw()?;
        decode_stored_session(&raw)
    }

    fn clear(&self) {
        match self.raw.lock() {
            Ok(mut slot) => *slot = None,
            Err(error) => tracing::warn!("Failed to clear in-memory session: {}", error),
        }
    }
}

/// Session persisted as a JSON file at a fixed path.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, session: &Session) -> Result<()> {
        let encoded = encode_session(session)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                Error::Storage(format!(
                    "Failed to create session directory {}: {}",
                    parent.display(),
                    error
                ))
            })?;
        }
        std::fs::write(&self.path, encoded).map_err(|error| {
            Error::Storage(format!(
                "Failed to write session at {}: {}",
                self.path.display(),
                error
            ))
        })
    }

    fn read(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        decode_stored_session(&raw)
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => tracing::warn!(
                "Failed to remove session file {}: {}",
                self.path.display(),
                error
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    SignedIn(Session),
    /// The account exists but the server did not issue a token.
    SignInRequired,
}

/// Login and registration calls. Successful responses replace the stored
/// session.
#[derive(Clone)]
pub struct AuthApi {
    gateway: HttpGateway,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthApi {
    pub fn new(gateway: HttpGateway) -> Self {
        let credentials = gateway.credentials();
        Self {
            gateway,
            credentials,
        }
    }

    pub async fn login(&self, form: &LoginForm) -> Result<Session> {
        let credentials = form.validate().map_err(Error::Validation)?;
        let request = self
            .gateway
            .request(Method::POST, AUTHENTICATE_PATH)
            .json(&credentials);
        let reply = self.gateway.execute::<AuthPayload>(request).await?;
        let session = reply
            .data
            .and_then(AuthPayload::into_session)
            .ok_or_else(|| {
                Error::Malformed("Sign-in response did not include a complete session".to_string())
            })?;

        self.credentials.save(&session)?;
        tracing::info!("Signed in as {}", session.user_name);
        Ok(session)
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<RegisterOutcome> {
        let registration = form.validate().map_err(Error::Validation)?;
        let request = self
            .gateway
            .request(Method::POST, REGISTER_PATH)
            .json(&registration);
        let reply = self.gateway.execute::<AuthPayload>(request).await?;

        match reply.data.and_then(AuthPayload::into_session) {
            Some(session) => {
                self.credentials.save(&session)?;
                Ok(RegisterOutcome::SignedIn(session))
            }
            None => Ok(RegisterOutcome::SignInRequired),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthPayload {
    #[serde(default, alias = "userId")]
    id: Option<serde_json::Value>,
    #[serde(default, alias = "username")]
    user_name: Option<String>,
    #[serde(default, alias = "accessToken")]
    token: Option<String>,
}

impl AuthPayload {
    fn into_session(self) -> Option<Session> {
        let user_id = match self.id? {
            serde_json::Value::String(id) => id,
            serde_json::Value::Number(id) => id.to_string(),
            _ => return None,
        };
        Session::new(
            user_id,
            normalize_text_option(self.user_name)?,
            normalize_text_option(self.token)?,
        )
    }
}
