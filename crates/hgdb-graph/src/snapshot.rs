use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use bincode::Options;
use hgdb_core::errors::{ErrorInfo, HgdbError};
use hgdb_core::{Attrs, EdgeKey, SchemaVersion, VertexId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DbConfig;
use crate::hash::canonical_hash;
use crate::hypergraph::HypergraphDb;

/// Leading bytes of every native snapshot.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"HGDB";

/// Schema version written into new snapshots.
pub const SNAPSHOT_VERSION: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the graph to the native snapshot format.
pub fn graph_to_bytes(graph: &HypergraphDb) -> Result<Vec<u8>, HgdbError> {
    let body = SnapshotRef {
        schema_version: SNAPSHOT_VERSION,
        content_hash: canonical_hash(graph)?,
        vertices: graph.vertices().collect(),
        edges: graph.edges().collect(),
    };
    let encoded = bincode::DefaultOptions::new()
        .serialize(&body)
        .map_err(|err| corrupt("serialize-bytes", err.to_string()))?;
    let mut bytes = Vec::with_capacity(SNAPSHOT_MAGIC.len() + encoded.len());
    bytes.extend_from_slice(SNAPSHOT_MAGIC);
    bytes.extend_from_slice(&encoded);
    Ok(bytes)
}

/// Restores a graph from the native snapshot format.
///
/// The incidence index is rebuilt from the decoded stores and the stored
/// content hash is verified against the rebuilt graph.
pub fn graph_from_bytes(bytes: &[u8], config: DbConfig) -> Result<HypergraphDb, HgdbError> {
    let payload = bytes
        .strip_prefix(SNAPSHOT_MAGIC.as_slice())
        .ok_or_else(|| corrupt("bad-magic", "file does not start with the snapshot magic"))?;
    let body: SnapshotBody = bincode::DefaultOptions::new()
        .with_limit(payload.len() as u64)
        .deserialize(payload)
        .map_err(|err| corrupt("deserialize-bytes", err.to_string()))?;

    if !SNAPSHOT_VERSION.reads(&body.schema_version) {
        return Err(corrupt("unsupported-version", "snapshot schema is not readable")
            .with_context("found", body.schema_version)
            .with_context("supported", SNAPSHOT_VERSION));
    }

    let vertex_count = body.vertices.len();
    let edge_count = body.edges.len();
    let vertices: BTreeMap<VertexId, Attrs> = body.vertices.into_iter().collect();
    let edges: BTreeMap<EdgeKey, Attrs> = body.edges.into_iter().collect();
    if vertices.len() != vertex_count || edges.len() != edge_count {
        return Err(corrupt("duplicate-entry", "snapshot lists an entry twice"));
    }

    let graph = HypergraphDb::from_parts(config, vertices, edges).map_err(|err| {
        let info = err.info().clone();
        HgdbError::CorruptSnapshot(info)
    })?;
    let actual = canonical_hash(&graph)?;
    if actual != body.content_hash {
        return Err(corrupt("checksum-mismatch", "snapshot content hash does not match")
            .with_context("expected", body.content_hash)
            .with_context("actual", actual));
    }
    Ok(graph)
}

impl HypergraphDb {
    /// Writes a native snapshot of the vertex and edge stores to `path`.
    ///
    /// The snapshot is written next to the target and renamed over it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HgdbError> {
        let path = path.as_ref();
        let bytes = graph_to_bytes(self)?;
        let staging = staging_path(path);
        fs::write(&staging, &bytes)
            .map_err(|err| HgdbError::io("write-snapshot", &err, &staging))?;
        if let Err(err) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(HgdbError::io("write-snapshot", &err, path));
        }
        info!(
            path = %path.display(),
            vertices = self.num_v(),
            edges = self.num_e(),
            bytes = bytes.len(),
            "saved snapshot"
        );
        Ok(())
    }

    /// Replaces the in-memory state with the snapshot stored at `path`.
    ///
    /// On failure the current state is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), HgdbError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| HgdbError::io("read-snapshot", &err, path))?;
        let loaded = graph_from_bytes(&bytes, self.config().clone())
            .map_err(|err| err.with_context("path", path.display()))?;
        info!(
            path = %path.display(),
            vertices = loaded.num_v(),
            edges = loaded.num_e(),
            "loaded snapshot"
        );
        self.replace_contents(loaded);
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn corrupt(code: &str, message: impl Into<String>) -> HgdbError {
    HgdbError::CorruptSnapshot(ErrorInfo::new(code, message))
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    schema_version: SchemaVersion,
    content_hash: String,
    vertices: Vec<(&'a VertexId, &'a Attrs)>,
    edges: Vec<(&'a EdgeKey, &'a Attrs)>,
}

#[derive(Deserialize)]
struct SnapshotBody {
    schema_version: SchemaVersion,
    content_hash: String,
    vertices: Vec<(VertexId, Attrs)>,
    edges: Vec<(EdgeKey, Attrs)>,
}
