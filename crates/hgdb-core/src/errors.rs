//! Structured error types shared across hgdb crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HgdbError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, paths).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the hypergraph index.
///
/// Precondition violations (`NotFound`, `DanglingVertex`, `InvalidEdgeShape`,
/// `MergeConflict`) are raised before any state changes. Codec failures are
/// reported through their own variants so callers can tell a damaged snapshot
/// apart from a malformed interchange document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HgdbError {
    /// A vertex or edge required by the operation does not exist.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// An edge specification names a vertex that is not stored.
    #[error("dangling vertex: {0}")]
    DanglingVertex(ErrorInfo),
    /// An edge specification does not describe a valid hyperedge.
    #[error("invalid edge shape: {0}")]
    InvalidEdgeShape(ErrorInfo),
    /// Re-keying an edge would collide with a distinct existing edge.
    #[error("merge conflict: {0}")]
    MergeConflict(ErrorInfo),
    /// A native snapshot could not be decoded or failed validation.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(ErrorInfo),
    /// An interchange document is structurally invalid.
    #[error("malformed interchange document: {0}")]
    MalformedInterchange(ErrorInfo),
    /// An attribute value cannot be represented in the interchange format.
    #[error("non-portable value: {0}")]
    NonPortableValue(ErrorInfo),
    /// Filesystem failures while reading or writing artifacts.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Configuration parsing errors.
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

impl HgdbError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HgdbError::NotFound(info)
            | HgdbError::DanglingVertex(info)
            | HgdbError::InvalidEdgeShape(info)
            | HgdbError::MergeConflict(info)
            | HgdbError::CorruptSnapshot(info)
            | HgdbError::MalformedInterchange(info)
            | HgdbError::NonPortableValue(info)
            | HgdbError::Io(info)
            | HgdbError::Config(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Adds a context entry to the payload, preserving the variant.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        let value = value.to_string();
        match self {
            HgdbError::NotFound(info) => HgdbError::NotFound(info.with_context(key, value)),
            HgdbError::DanglingVertex(info) => {
                HgdbError::DanglingVertex(info.with_context(key, value))
            }
            HgdbError::InvalidEdgeShape(info) => {
                HgdbError::InvalidEdgeShape(info.with_context(key, value))
            }
            HgdbError::MergeConflict(info) => {
                HgdbError::MergeConflict(info.with_context(key, value))
            }
            HgdbError::CorruptSnapshot(info) => {
                HgdbError::CorruptSnapshot(info.with_context(key, value))
            }
            HgdbError::MalformedInterchange(info) => {
                HgdbError::MalformedInterchange(info.with_context(key, value))
            }
            HgdbError::NonPortableValue(info) => {
                HgdbError::NonPortableValue(info.with_context(key, value))
            }
            HgdbError::Io(info) => HgdbError::Io(info.with_context(key, value)),
            HgdbError::Config(info) => HgdbError::Config(info.with_context(key, value)),
        }
    }

    /// Wraps a filesystem error, recording the path involved.
    pub fn io(code: impl Into<String>, err: &std::io::Error, path: &std::path::Path) -> Self {
        HgdbError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }
}
