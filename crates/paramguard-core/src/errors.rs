//! Error types for parameter filtering.
//!
//! `Missing`, `NotAMapping` and `Forbidden` describe a rejected request.
//! The remaining variants describe bad input from the host application
//! itself (schemas, bodies, configuration) and are never caused by request
//! data alone.

/// Parameter errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// A required key was absent or blank.
    #[error("key not found: {key}")]
    Missing { key: String },

    /// A required key holds something other than a single mapping.
    #[error("key is not a mapping: {key}")]
    NotAMapping { key: String },

    /// Strict validation found keys outside the schema.
    #[error("key forbidden: {}", keys.join(", "))]
    Forbidden { keys: Vec<String> },

    /// Filter list has an unsupported shape.
    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    /// Raw parameters could not be turned into a tree.
    #[error("invalid params: {message}")]
    InvalidParams { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ParamsError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    pub fn not_a_mapping(key: impl Into<String>) -> Self {
        Self::NotAMapping { key: key.into() }
    }

    /// Builds a `Forbidden` error; keys are reported sorted.
    pub fn forbidden(mut keys: Vec<String>) -> Self {
        keys.sort();
        Self::Forbidden { keys }
    }

    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the error rejects the request (as opposed to a host setup error).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Missing { .. } | Self::NotAMapping { .. } | Self::Forbidden { .. }
        )
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Rejected request
            Self::Missing { .. } => 1,
            Self::NotAMapping { .. } => 1,
            Self::Forbidden { .. } => 1,

            // Host input / setup
            Self::InvalidFilter { .. } => 2,
            Self::InvalidParams { .. } => 2,
            Self::Config { .. } => 2,
        }
    }
}

impl From<serde_yaml::Error> for ParamsError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

/// Result type for parameter operations.
pub type ParamsResult<T> = Result<T, ParamsError>;
