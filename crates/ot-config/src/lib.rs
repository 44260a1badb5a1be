//! # ot-config
//!
//! Layered configuration loading for orthanctool using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ORTHANCTOOL_*` prefix, `__` as separator)
//! 2. Project-level `./orthanctool.toml`
//! 3. User-level `~/.config/orthanctool/config.toml`
//! 4. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Environment Variable Mapping
//!
//! `ORTHANCTOOL_ORTHANC__URL` -> `orthanc.url`,
//! `ORTHANCTOOL_CHANGES__POLL_SECS` -> `changes.poll_secs`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ot_config::ToolConfig;
//!
//! let config = ToolConfig::load_with_dotenv().expect("config");
//! if config.orthanc.is_configured() {
//!     println!("Orthanc URL: {}", config.orthanc.url);
//! }
//! ```

mod changes;
mod error;
mod orthanc;

pub use changes::ChangesConfig;
pub use error::ConfigError;
pub use orthanc::OrthancConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = "orthanctool.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ORTHANCTOOL_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub orthanc: OrthancConfig,
    #[serde(default)]
    pub changes: ChangesConfig,
}

impl ToolConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.orthanc.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("orthanctool").join("config.toml"))
    }
}
