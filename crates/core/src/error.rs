//! Error types raised by the core crate.

use thiserror::Error;

/// Failure to turn an external payload into a [`Movie`](crate::models::Movie).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body had no content besides whitespace.
    #[error("body must not be empty")]
    Empty,
    /// The body was larger than the decoder accepts.
    #[error("body must not be larger than {limit} bytes")]
    TooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
    /// The body is not well-formed JSON.
    #[error("body contains badly-formed JSON (at line {line}, column {column})")]
    Syntax {
        /// One-based line of the offending character.
        line: usize,
        /// One-based column of the offending character.
        column: usize,
    },
    /// The body stopped in the middle of a JSON value.
    #[error("body contains badly-formed JSON (unexpected end of input)")]
    Truncated,
    /// More than one JSON value followed the first.
    #[error("body must only contain a single JSON value")]
    TrailingData,
    /// The top-level value was something other than an object.
    #[error("body must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },
    /// A field was present but held a value of the wrong type.
    #[error("body contains an invalid value for field {field:?}: {source}")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
        /// Underlying conversion error.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Wire name of the offending field, for errors tied to a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Failure to parse the `"<n> mins"` text form of a runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeFormatError {
    /// Text did not match `<integer> mins`.
    #[error("invalid runtime format {0:?}, expected text like \"102 mins\"")]
    Malformed(String),
    /// Minutes did not fit in a 32-bit integer.
    #[error("runtime {0:?} is out of range")]
    OutOfRange(String),
}

/// Failure to load or write application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layered sources could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    /// Default config file could not be written.
    #[error("failed to write default configuration to {path}: {source}")]
    Write {
        /// Target path.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A setting held a value the application cannot use.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
