use {governance_polling::error::PollingError, thiserror::Error};

/// Governance polling CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    PollingError(#[from] PollingError),
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    YamlError(#[from] serde_yaml::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Value error: {0}")]
    ValueError(String),
}
