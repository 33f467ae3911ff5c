use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WideqlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Schema generation error: {0}")]
    SchemaGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<::config::ConfigError> for WideqlError {
    fn from(err: ::config::ConfigError) -> Self {
        WideqlError::Config(format!("Config load error: {}", err))
    }
}

impl From<toml::ser::Error> for WideqlError {
    fn from(err: toml::ser::Error) -> Self {
        WideqlError::Serialization(format!("TOML serialization error: {}", err))
    }
}

impl From<serde_json::Error> for WideqlError {
    fn from(err: serde_json::Error) -> Self {
        WideqlError::Serialization(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, WideqlError>;
