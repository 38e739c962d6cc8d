//! Error kinds raised by the conversion core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConverterError {
    /// Transport failure or non-success HTTP status.
    #[error("Failed to fetch rates for {base}: {reason}")]
    Fetch { base: String, reason: String },

    /// The response did not carry a `rates` object.
    #[error("Malformed rate response for {base}: {reason}")]
    MalformedResponse { base: String, reason: String },

    /// A referenced currency has no usable rate in the table.
    #[error("No rate available for currency: {0}")]
    MissingRate(String),

    /// The conversion overflowed or otherwise produced no finite number.
    #[error("Conversion into {0} is not a finite number")]
    NonFinite(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ConverterError>;
