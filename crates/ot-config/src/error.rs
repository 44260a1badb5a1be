use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or environment override could not be read or merged.
    #[error("could not load orthanctool settings: {0}")]
    Load(#[from] figment::Error),

    /// `[orthanc] url` is empty and nothing on the command line supplied it.
    #[error("no Orthanc server configured: [orthanc] url is empty")]
    MissingUrl,

    #[error("bad value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_setting() {
        assert!(ConfigError::MissingUrl.to_string().contains("[orthanc] url"));

        let err = ConfigError::InvalidValue {
            field: "orthanc.page_limit".into(),
            reason: "must be at least 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "bad value for `orthanc.page_limit`: must be at least 1"
        );
    }
}
