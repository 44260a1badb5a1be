use std::time::Duration;

use anyhow::Context;
use ot_api::{ClientOptions, OrthancClient};
use ot_config::{ConfigError, ToolConfig};

use crate::cli::GlobalFlags;

/// Load layered configuration and apply global flag overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ToolConfig> {
    let mut config = ToolConfig::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut ToolConfig, flags: &GlobalFlags) {
    if let Some(url) = &flags.orthanc {
        config.orthanc.url.clone_from(url);
    }
}

/// Build the Orthanc client from the `[orthanc]` section.
pub fn connect(config: &ToolConfig) -> anyhow::Result<OrthancClient> {
    let orthanc = &config.orthanc;
    if !orthanc.is_configured() {
        return Err(ConfigError::MissingUrl)
            .context("pass --orthanc <url> or set ORTHANCTOOL_ORTHANC__URL");
    }

    let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
    let options = ClientOptions {
        username: non_empty(&orthanc.username),
        password: non_empty(&orthanc.password),
        timeout: Duration::from_secs(orthanc.timeout_secs),
    };
    tracing::debug!(url = %orthanc.url, timeout_secs = orthanc.timeout_secs, "connecting");
    Ok(OrthancClient::new(&orthanc.url, options)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::OutputFormat;

    fn flags(orthanc: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            orthanc: orthanc.map(str::to_string),
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn flag_overrides_configured_url() {
        let mut config = ToolConfig::default();
        config.orthanc.url = "http://from-config:8042".into();
        apply_overrides(&mut config, &flags(Some("http://from-flag:8042")));
        assert_eq!(config.orthanc.url, "http://from-flag:8042");
    }

    #[test]
    fn missing_flag_keeps_configured_url() {
        let mut config = ToolConfig::default();
        config.orthanc.url = "http://from-config:8042".into();
        apply_overrides(&mut config, &flags(None));
        assert_eq!(config.orthanc.url, "http://from-config:8042");
    }

    #[test]
    fn connect_requires_url() {
        let err = connect(&ToolConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--orthanc"));
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingUrl)
        ));
    }

    #[test]
    fn connect_builds_client() {
        let mut config = ToolConfig::default();
        config.orthanc.url = "http://localhost:8042".into();
        let client = connect(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8042/");
    }
}
