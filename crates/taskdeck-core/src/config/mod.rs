//! Client configuration.
//!
//! Provides the `ClientConfig` struct consumed by the HTTP gateway and the
//! task list controller. Front ends build it from their own settings layer
//! (CLI profiles, environment variables) and hand it to the library.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{normalize_base_url, normalize_text_option};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5081/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const API_URL_ENV: &str = "TASKDECK_API_URL";
const PAGE_SIZE_ENV: &str = "TASKDECK_PAGE_SIZE";

/// Runtime settings for talking to the task API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base endpoint every request path is appended to.
    pub api_base_url: String,
    /// Number of tasks per page requested by the list controller.
    pub page_size: u32,
    /// Per-request timeout; `None` keeps the HTTP client's default.
    #[serde(default)]
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl AsRef<str>) -> Result<Self> {
        let api_base_url = normalize_base_url(api_base_url.as_ref())
            .map_err(|message| Error::InvalidConfiguration(message.to_string()))?;
        Ok(Self {
            api_base_url,
            ..Self::default()
        })
    }

    /// Build a config from `TASKDECK_API_URL` / `TASKDECK_PAGE_SIZE`, falling
    /// back to defaults for unset values.
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(PAGE_SIZE_ENV).ok(),
        )
    }

    pub fn from_values(api_base_url: Option<String>, page_size: Option<String>) -> Result<Self> {
        let mut config = match normalize_text_option(api_base_url) {
            Some(url) => Self::new(url)?,
            None => Self::default(),
        };
        if let Some(raw) = normalize_text_option(page_size) {
            config = config.with_page_size(parse_page_size(&raw)?)?;
        }
        Ok(config)
    }

    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidConfiguration(
                "page size must be at least 1".to_string(),
            ));
        }
        self.page_size = page_size;
        Ok(self)
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn parse_page_size(raw: &str) -> Result<u32> {
    raw.parse::<u32>()
        .map_err(|_| Error::InvalidConfiguration(format!("invalid page size '{raw}'")))
}
