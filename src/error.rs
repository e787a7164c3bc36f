use thiserror::Error;

#[derive(Error, Debug)]
pub enum KickpadError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot start run: {0}")]
    Precondition(String),

    #[error("A run is already active")]
    RunActive,

    #[error("Failed to load target waveform: {0}")]
    TargetLoad(String),

    #[error("Search worker failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, KickpadError>;
