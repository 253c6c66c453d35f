//! Structured error types shared across the filter crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SogError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (line numbers, offsets, paths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the graph filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SogError {
    /// Malformed rule-set specification or unknown comparison keyword.
    #[error("specification error: {0}")]
    Specification(ErrorInfo),
    /// Malformed encoded graph line.
    #[error("decode error: {0}")]
    Decode(ErrorInfo),
    /// Internal consistency violation between a graph and its derived data.
    #[error("invariant violation: {0}")]
    Invariant(ErrorInfo),
    /// Image export failures.
    #[error("export error: {0}")]
    Export(ErrorInfo),
    /// Stream, ledger and filesystem failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Configuration loading and validation errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl SogError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SogError::Specification(info)
            | SogError::Decode(info)
            | SogError::Invariant(info)
            | SogError::Export(info)
            | SogError::Io(info)
            | SogError::Config(info) => info,
        }
    }

    /// Returns the stable code of the underlying payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Wraps an I/O error with a code and the path it occurred on.
    pub fn io(code: &str, err: &std::io::Error, path: &std::path::Path) -> Self {
        SogError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
    }

    /// Returns a copy of the error with an extra context entry.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            SogError::Specification(info) => {
                SogError::Specification(info.with_context(key, value))
            }
            SogError::Decode(info) => SogError::Decode(info.with_context(key, value)),
            SogError::Invariant(info) => SogError::Invariant(info.with_context(key, value)),
            SogError::Export(info) => SogError::Export(info.with_context(key, value)),
            SogError::Io(info) => SogError::Io(info.with_context(key, value)),
            SogError::Config(info) => SogError::Config(info.with_context(key, value)),
        }
    }
}
