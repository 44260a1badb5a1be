//! Defaults for the `changes` command.

use serde::{Deserialize, Serialize};

const fn default_poll_secs() -> u64 {
    60
}

const fn default_all() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangesConfig {
    /// Seconds between polls once the tail is reached. 0 disables the tail.
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,

    /// Seconds between full resweeps of the log. 0 disables resweeps.
    #[serde(default)]
    pub sweep_secs: u64,

    /// Replay changes that existed before startup.
    #[serde(default = "default_all")]
    pub all: bool,

    /// Only handle changes of this type (e.g., `StableStudy`). Empty means all.
    #[serde(default)]
    pub filter: String,
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self {
            poll_secs: default_poll_secs(),
            sweep_secs: 0,
            all: default_all(),
            filter: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ChangesConfig::default();
        assert_eq!(config.poll_secs, 60);
        assert_eq!(config.sweep_secs, 0);
        assert!(config.all);
        assert!(config.filter.is_empty());
    }
}
