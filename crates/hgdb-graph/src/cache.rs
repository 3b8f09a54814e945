use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use hgdb_core::{Attrs, EdgeKey, VertexId};

/// Lazily materialized key sets, cleared by every structural mutation.
///
/// A cleared slot is recomputed on the next read, so callers never observe a
/// set that predates the last `add_*` or `remove_*`.
#[derive(Debug, Clone, Default)]
pub(crate) struct AggregateCache {
    all_v: OnceLock<BTreeSet<VertexId>>,
    all_e: OnceLock<BTreeSet<EdgeKey>>,
}

impl AggregateCache {
    pub(crate) fn invalidate(&mut self) {
        self.all_v.take();
        self.all_e.take();
    }

    pub(crate) fn all_v(&self, vertices: &BTreeMap<VertexId, Attrs>) -> &BTreeSet<VertexId> {
        self.all_v.get_or_init(|| vertices.keys().cloned().collect())
    }

    pub(crate) fn all_e(&self, edges: &BTreeMap<EdgeKey, Attrs>) -> &BTreeSet<EdgeKey> {
        self.all_e.get_or_init(|| edges.keys().cloned().collect())
    }

    #[cfg(test)]
    pub(crate) fn is_warm(&self) -> bool {
        self.all_v.get().is_some() || self.all_e.get().is_some()
    }
}
