use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Structured GraphQL error preserving individual error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQlError {
    pub message: String,
    pub code: Option<String>,
    pub path: Option<String>,
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (at {path})")?;
        }
        Ok(())
    }
}

fn format_graphql_errors(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum AerodeskError {
    // Transport errors
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    // Server-side rejections
    #[error("API error: {0}")]
    Api(String),

    #[error("API error: {}", format_graphql_errors(.errors))]
    GraphQlErrors {
        errors: Vec<GraphQlError>,
        partial_data: bool,
    },

    // Client-side validation
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("nothing to update: no field was changed")]
    NothingToUpdate,

    // Controller misuse
    #[error("{0} already in progress")]
    Busy(String),

    #[error("no form is open")]
    NoOpenForm,

    #[error("row {row} is not on the current page ({visible} rows visible)")]
    RowOutOfRange { row: usize, visible: usize },

    #[error("{0} not found")]
    RecordNotFound(String),

    #[error("{0} are not loaded")]
    NotLoaded(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error taxonomy used when reporting failures to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never reached the API or the response never came back
    Network,
    /// The API was reached but rejected the operation
    Api,
    /// Input was rejected before anything was sent
    Validation,
    /// Local misuse or environment problems (config, IO, state)
    Client,
}

impl AerodeskError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AerodeskError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AerodeskError::Network(_) | AerodeskError::Timeout(_) => ErrorKind::Network,
            AerodeskError::Api(_) | AerodeskError::GraphQlErrors { .. } => ErrorKind::Api,
            AerodeskError::Validation { .. } | AerodeskError::NothingToUpdate => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Client,
        }
    }
}

pub type Result<T> = std::result::Result<T, AerodeskError>;
