use std::fs;
use std::path::{Path, PathBuf};

use hgdb_core::errors::{ErrorInfo, HgdbError};
use serde::{Deserialize, Serialize};

/// Default snapshot location used by [`HypergraphDb::open`](crate::HypergraphDb::open).
pub const DEFAULT_STORAGE_FILE: &str = "my_hypergraph.hgdb";

/// Configuration options that control the behaviour of [`HypergraphDb`](crate::HypergraphDb).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// Snapshot file loaded by `open` when it exists.
    pub storage_file: PathBuf,
    /// What happens when removing a vertex re-keys an edge onto an existing one.
    pub collision: CollisionPolicy,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            storage_file: PathBuf::from(DEFAULT_STORAGE_FILE),
            collision: CollisionPolicy::Reject,
        }
    }
}

impl DbConfig {
    /// Parses a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, HgdbError> {
        toml::from_str(contents)
            .map_err(|err| HgdbError::Config(ErrorInfo::new("parse-config", err.to_string())))
    }

    /// Reads and parses a TOML configuration file.
    pub fn from_path(path: &Path) -> Result<Self, HgdbError> {
        let contents =
            fs::read_to_string(path).map_err(|err| HgdbError::io("read-config", &err, path))?;
        Self::from_toml_str(&contents)
            .map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Returns a copy pointing at a different storage file.
    pub fn with_storage_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_file = path.into();
        self
    }
}

/// Policy applied when a shrunken hyperedge lands on the key of another edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Fail the removal with a merge conflict; nothing is modified.
    #[default]
    Reject,
    /// Keep the existing edge and its attributes; the shrunken payload is discarded.
    KeepExisting,
}
