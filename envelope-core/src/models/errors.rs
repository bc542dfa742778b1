use std::fmt;
use thiserror::Error;

/// Failures raised while resolving an envelope descriptor from a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema resource unreadable: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("schema malformed during {pass}: {message}")]
    Malformed { pass: WalkPass, message: String },

    #[error("could not determine {element} element (root: '{root}', message: '{message}', wrapper: '{wrapper}')")]
    ElementNotFound {
        element: String,
        root: String,
        message: String,
        wrapper: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkPass {
    Structure,
    Wrapper,
}

impl fmt::Display for WalkPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkPass::Structure => write!(f, "structure pass"),
            WalkPass::Wrapper => write!(f, "wrapper pass"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("unsupported message kind: {0}")]
    UnsupportedMessageKind(String),

    #[error("type mismatch: handler for {expected} received a {found} message")]
    TypeMismatch { expected: String, found: String },

    #[error("validation failed: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid message json at '{path}': {message}")]
    Json { path: String, message: String },
}

impl ConversionError {
    pub fn validation(violations: Vec<String>) -> Self {
        ConversionError::Validation { violations }
    }

    pub fn violations(&self) -> &[String] {
        match self {
            ConversionError::Validation { violations } => violations,
            _ => &[],
        }
    }
}

impl From<quick_xml::DeError> for ConversionError {
    fn from(err: quick_xml::DeError) -> Self {
        ConversionError::Parse(err.to_string())
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ConversionError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        ConversionError::Json {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;
