//! Orthanc server connection settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

/// Default number of changes requested per page.
const fn default_page_limit() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrthancConfig {
    /// Server base URL (e.g., `http://localhost:8042`). May embed credentials.
    #[serde(default)]
    pub url: String,

    /// Basic auth user. Takes precedence over credentials in `url`.
    #[serde(default)]
    pub username: String,

    /// Basic auth password.
    #[serde(default)]
    pub password: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Changes requested per page.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for OrthancConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            page_limit: default_page_limit(),
        }
    }
}

impl OrthancConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Check ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout or page limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "orthanc.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "orthanc.page_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
