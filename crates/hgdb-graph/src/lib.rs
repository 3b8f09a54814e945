#![deny(missing_docs)]

//! In-memory hypergraph index with attribute payloads.
//!
//! [`HypergraphDb`] stores vertices keyed by caller supplied ids and n-ary
//! hyperedges keyed by their canonical member set. An incidence index maps
//! every vertex to the edges containing it and is kept consistent by every
//! mutation, so degree and neighbour queries never scan the edge store.
//! Removing a vertex re-keys the edges that contained it while carrying their
//! attributes over to the new key.
//!
//! Two codecs are provided: a native binary snapshot ([`HypergraphDb::save`],
//! [`HypergraphDb::load`]) and the JSON interchange format
//! ([`HypergraphDb::to_hif`], [`HypergraphDb::load_from_hif`]).
//!
//! The engine is single threaded and performs no locking. Callers that share
//! an instance between threads wrap it in their own reader/writer lock.

mod cache;
mod config;
mod generators;
mod hash;
mod hif;
mod hypergraph;
mod query;
mod snapshot;
mod subgraph;

pub use config::{CollisionPolicy, DbConfig, DEFAULT_STORAGE_FILE};
pub use generators::gen_random;
pub use hash::canonical_hash;
pub use hif::{
    graph_from_hif, graph_to_hif, HifDocument, HifEdge, HifId, HifIncidence, HifNode, UNDIRECTED,
};
pub use hypergraph::HypergraphDb;
pub use query::matches_filters;
pub use snapshot::{graph_from_bytes, graph_to_bytes, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};

/// Re-export of the core types most callers need alongside the engine.
pub use hgdb_core::{
    attrs, encode, AttrValue, Attrs, EdgeKey, ErrorInfo, GraphStats, HgdbError, HypergraphView,
    SchemaVersion, VertexId,
};
