use hgdb_core::errors::{ErrorInfo, HgdbError};
use hgdb_core::{Attrs, VertexId};
use sha2::{Digest, Sha256};

use crate::hypergraph::HypergraphDb;

/// Computes the canonical content hash for the provided graph.
///
/// Covers every vertex, every hyperedge, and their attribute payloads in
/// canonical order. Configuration and caches do not participate.
pub fn canonical_hash(graph: &HypergraphDb) -> Result<String, HgdbError> {
    let mut hasher = Sha256::new();

    hasher.update(b"vertices");
    hasher.update((graph.num_v() as u64).to_le_bytes());
    for (id, attrs) in graph.vertices() {
        encode_vertex(id, &mut hasher);
        encode_attrs(attrs, &mut hasher)?;
    }

    hasher.update(b"edges");
    hasher.update((graph.num_e() as u64).to_le_bytes());
    for (key, attrs) in graph.edges() {
        hasher.update((key.len() as u64).to_le_bytes());
        for member in key {
            encode_vertex(member, &mut hasher);
        }
        encode_attrs(attrs, &mut hasher)?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn encode_vertex(id: &VertexId, hasher: &mut Sha256) {
    match id {
        VertexId::Int(value) => {
            hasher.update(b"i");
            hasher.update(value.to_le_bytes());
        }
        VertexId::Text(value) => {
            hasher.update(b"s");
            update_bytes(value.as_bytes(), hasher);
        }
    }
}

fn encode_attrs(attrs: &Attrs, hasher: &mut Sha256) -> Result<(), HgdbError> {
    let bytes = bincode::serialize(attrs).map_err(|err| {
        HgdbError::CorruptSnapshot(ErrorInfo::new("hash-attributes", err.to_string()))
    })?;
    update_bytes(&bytes, hasher);
    Ok(())
}

fn update_bytes(bytes: &[u8], hasher: &mut Sha256) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
