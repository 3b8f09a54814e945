#![deny(missing_docs)]
#![doc = "Core identifier, value, key, and error types for the hgdb hypergraph index."]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod key;
pub mod schema;
pub mod value;

pub use errors::{ErrorInfo, HgdbError};
pub use key::{encode, EdgeKey, MIN_EDGE_SIZE};
pub use schema::SchemaVersion;
pub use value::{attrs, attrs_from_json, attrs_to_json, AttrValue, Attrs, VertexId};

/// Read-only surface of a hypergraph.
///
/// This is everything an external viewer or request server needs. Holders of
/// a shared instance serialize writers themselves; implementations perform no
/// internal locking.
pub trait HypergraphView: Send + Sync {
    /// Number of stored vertices.
    fn num_v(&self) -> usize;

    /// Number of stored hyperedges.
    fn num_e(&self) -> usize;

    /// All vertex identifiers.
    fn all_v(&self) -> &BTreeSet<VertexId>;

    /// All hyperedge keys.
    fn all_e(&self) -> &BTreeSet<EdgeKey>;

    /// Attribute record of a vertex, if stored.
    fn v(&self, id: &VertexId) -> Option<&Attrs>;

    /// Whether the vertex is stored.
    fn has_v(&self, id: &VertexId) -> bool;

    /// Number of hyperedges incident to the vertex.
    fn degree_v(&self, id: &VertexId) -> Result<usize, HgdbError>;

    /// Hyperedges incident to the vertex.
    fn nbr_e_of_v(&self, id: &VertexId) -> Result<&BTreeSet<EdgeKey>, HgdbError>;

    /// Attribute record of a hyperedge; fails when a member is unknown.
    fn e(&self, members: &[VertexId]) -> Result<Option<&Attrs>, HgdbError>;
}

/// Summary statistics for a hypergraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GraphStats {
    /// Number of vertices.
    pub num_vertices: usize,
    /// Number of hyperedges.
    pub num_edges: usize,
    /// Number of (edge, member) pairs.
    pub num_incidences: usize,
    /// Smallest vertex degree, if any vertex exists.
    pub min_vertex_degree: Option<usize>,
    /// Largest vertex degree, if any vertex exists.
    pub max_vertex_degree: Option<usize>,
    /// Largest hyperedge size, if any edge exists.
    pub max_edge_size: Option<usize>,
    /// Vertices without incident hyperedges.
    pub isolated_vertices: usize,
}

impl GraphStats {
    /// Computes statistics through the read-only surface.
    pub fn collect(view: &dyn HypergraphView) -> Result<Self, HgdbError> {
        let mut stats = GraphStats {
            num_vertices: view.num_v(),
            num_edges: view.num_e(),
            ..GraphStats::default()
        };
        for id in view.all_v() {
            let degree = view.degree_v(id)?;
            stats.min_vertex_degree =
                Some(stats.min_vertex_degree.map_or(degree, |v| v.min(degree)));
            stats.max_vertex_degree =
                Some(stats.max_vertex_degree.map_or(degree, |v| v.max(degree)));
            if degree == 0 {
                stats.isolated_vertices += 1;
            }
        }
        for key in view.all_e() {
            stats.num_incidences += key.len();
            stats.max_edge_size = Some(stats.max_edge_size.map_or(key.len(), |v| v.max(key.len())));
        }
        Ok(stats)
    }
}
