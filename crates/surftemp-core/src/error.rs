// crates/surftemp-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("malformed timestamp '{value}': {reason}")]
    MalformedTimestamp { value: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no matched pairs survived matching and filtering")]
    EmptyMatchSet,

    #[error("{label} value {value} is not finite")]
    NonFiniteValue { label: &'static str, value: f64 },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataframe error: {0}")]
    Frame(#[from] polars::prelude::PolarsError),
}

impl EngineError {
    pub(crate) fn malformed(value: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::MalformedTimestamp {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
