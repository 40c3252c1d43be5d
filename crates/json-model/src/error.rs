//! Error taxonomy and result shapes for the validation engine.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Classification of a single error or warning detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid schema declaration, detected while building the model tree.
    Configure,
    /// A modifier was invoked on a frozen model.
    ModelFrozen,
    /// A required object property is missing from the input.
    RequiredProperty,
    /// Value, type, length or range mismatch.
    FaultyValue,
    /// The model is a `none` placeholder and accepts nothing.
    NotConfigured,
    /// A non-taxonomy failure, e.g. a panicking custom validator.
    Unknown,
    /// Aggregates multiple details under one.
    Combined,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configure => "ConfigureError",
            Self::ModelFrozen => "ModelFrozenError",
            Self::RequiredProperty => "RequiredPropertyError",
            Self::FaultyValue => "FaultyValueError",
            Self::NotConfigured => "NotConfiguredError",
            Self::Unknown => "UnknownError",
            Self::Combined => "CombinedError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured error or warning report entry.
///
/// `property_path` is a dot-joined sequence of property names and bracketed
/// array indices rooted at `<root>`, e.g. `<root>.items[2].id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub property_path: String,
    pub property_name: Option<String>,
    pub message: String,
    /// Stringified offending value, when one exists.
    pub value: Option<String>,
    pub cause: Option<Box<ErrorDetail>>,
    pub errors: Vec<ErrorDetail>,
    pub warnings: Vec<ErrorDetail>,
}

impl ErrorDetail {
    pub fn new(kind: ErrorKind, property_path: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorDetail {
            kind,
            property_path: property_path.into(),
            property_name: None,
            message: message.into(),
            value: None,
            cause: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: &Value) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.property_name = name;
        self
    }

    /// Wraps a list of sibling details into a single one: `None` for an
    /// empty list, the sole entry for a singleton, a `Combined` otherwise.
    pub fn combine(mut details: Vec<ErrorDetail>, property_path: &str) -> Option<ErrorDetail> {
        match details.len() {
            0 => None,
            1 => details.pop(),
            n => {
                let mut combined = ErrorDetail::new(
                    ErrorKind::Combined,
                    property_path,
                    format!("{n} issues were reported"),
                );
                combined.errors = details;
                Some(combined)
            }
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.property_path, self.message)?;
        if let Some(value) = &self.value {
            write!(f, " (got {value})")?;
        }
        Ok(())
    }
}

/// Outcome of a `Model::validate` call.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Valid {
        value: Value,
        warning: Option<Box<ErrorDetail>>,
    },
    Invalid {
        error: Box<ErrorDetail>,
    },
}

impl Validated {
    pub fn is_ok(&self) -> bool {
        matches!(self, Validated::Valid { .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Validated::Valid { value, .. } => Some(value),
            Validated::Invalid { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Validated::Valid { value, .. } => Some(value),
            Validated::Invalid { .. } => None,
        }
    }

    pub fn warning(&self) -> Option<&ErrorDetail> {
        match self {
            Validated::Valid { warning, .. } => warning.as_deref(),
            Validated::Invalid { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            Validated::Valid { .. } => None,
            Validated::Invalid { error } => Some(error),
        }
    }
}

/// Hard-error surface for callers that want a `Result` instead of the
/// structured [`Validated`] report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid model configuration: {0}")]
    Configure(ErrorDetail),

    #[error("validation failed: {0}")]
    Validation(ErrorDetail),
}

impl ModelError {
    pub fn detail(&self) -> &ErrorDetail {
        match self {
            Self::Configure(d) | Self::Validation(d) => d,
        }
    }
}
