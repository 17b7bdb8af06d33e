use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetterFilterError {
    /// A declaration supplied more than one selection rule.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Unknown field '{field}' on model '{model}'")]
    UnknownField { model: String, field: String },

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Raised by a filter function that cannot transform its input.
    #[error("Filter error: {0}")]
    Filter(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config load error: {0}")]
    ConfigLoad(String),
}

pub type Result<T> = std::result::Result<T, SetterFilterError>;
