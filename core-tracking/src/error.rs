use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Event name cannot be empty")]
    EmptyEventName,

    #[error("Event id must be positive, got {0}")]
    InvalidEventId(i64),

    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("Currency code must be a three-letter ISO 4217 code, got '{0}'")]
    InvalidCurrencyCode(String),

    #[error("Attribute index must be between 1 and 5, got {0}")]
    InvalidAttributeIndex(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackingError>;
