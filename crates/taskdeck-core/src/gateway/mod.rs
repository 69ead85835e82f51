//! The single configured HTTP client every API call goes through.
//!
//! Outgoing requests get the stored bearer token attached. Incoming 401s
//! clear the credential store and send the view back to the login entry
//! point before the failure reaches the caller. Successful bodies are
//! unwrapped from the `{ success, message, data }` envelope.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::CredentialStore;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::navigation::{Navigator, Route};
use crate::util::{compact_text, normalize_base_url};

/// Decoded envelope of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Reply<T> {
    /// The payload, or a malformed-response error when the server sent none.
    pub fn into_data(self) -> Result<T> {
        self.data
            .ok_or_else(|| Error::Malformed("response envelope did not include data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default = "Option::default")]
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    title: Option<String>,
}

#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl HttpGateway {
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let base_url = normalize_base_url(&config.api_base_url)
            .map_err(|message| Error::InvalidConfiguration(message.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
            credentials,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.navigator)
    }

    /// Start a request against `path`, attaching the stored bearer token when
    /// a session exists.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!("{} {}", method, url);

        let request = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match self.credentials.read() {
            Some(session) => request.bearer_auth(session.token),
            None => request,
        }
    }

    /// Send the request and unwrap the response envelope.
    pub async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Reply<T>> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.end_session();
            return Err(Error::Unauthorized);
        }

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                message: parse_error_message(&body),
            });
        }

        let envelope = serde_json::from_slice::<Envelope<T>>(&body).map_err(|error| {
            Error::Malformed(format!(
                "{error}; body: {}",
                compact_text(&String::from_utf8_lossy(&body))
            ))
        })?;

        if !envelope.success {
            let message = envelope
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "The request was rejected".to_string());
            return Err(Error::Application(message));
        }

        Ok(Reply {
            message: envelope.message,
            data: envelope.data,
        })
    }

    fn end_session(&self) {
        tracing::warn!("Server rejected credentials; clearing stored session");
        self.credentials.clear();
        self.navigator.navigate(Route::Login);
    }
}

fn parse_error_message(body: &[u8]) -> String {
    if let Ok(payload) = serde_json::from_slice::<ErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error).or(payload.title) {
            return message.trim().to_string();
        }
    }
    compact_text(&String::from_utf8_lossy(body))
}
