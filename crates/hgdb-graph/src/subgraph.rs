use std::collections::BTreeSet;

use hgdb_core::errors::HgdbError;
use hgdb_core::VertexId;
use tracing::debug;

use crate::hypergraph::{vertex_not_found, HypergraphDb};

impl HypergraphDb {
    /// Induced sub-hypergraph over `vertex_ids`.
    ///
    /// The result is an independent instance holding copies of the requested
    /// vertices and of every edge whose members all lie inside the set. Edges
    /// that only partially overlap are left out, never truncated. Unknown ids
    /// fail with [`HgdbError::NotFound`].
    pub fn sub(
        &self,
        vertex_ids: impl IntoIterator<Item = impl Into<VertexId>>,
    ) -> Result<HypergraphDb, HgdbError> {
        let wanted: BTreeSet<VertexId> = vertex_ids.into_iter().map(Into::into).collect();
        let mut sub = HypergraphDb::with_config(self.config().clone());
        for id in &wanted {
            let record = self.v(id).ok_or_else(|| vertex_not_found(id))?;
            sub.add_v(id, record.clone());
        }
        for id in &wanted {
            for key in self.incident(id)? {
                if sub.has_e(key) || !key.is_subset_of(&wanted) {
                    continue;
                }
                let record = self.e(key)?.cloned().unwrap_or_default();
                sub.insert_edge(key.clone(), record);
            }
        }
        debug!(
            vertices = sub.num_v(),
            edges = sub.num_e(),
            "extracted induced sub-hypergraph"
        );
        Ok(sub)
    }

    /// Sub-hypergraph reachable from `start` within `depth` vertex hops.
    ///
    /// Hop `k` adds every unvisited vertex that shares an edge with a vertex
    /// first reached at hop `k - 1`. The visited set is then passed to
    /// [`HypergraphDb::sub`], so only edges fully inside it are kept.
    pub fn sub_from_v(
        &self,
        start: impl Into<VertexId>,
        depth: usize,
    ) -> Result<HypergraphDb, HgdbError> {
        let start = start.into();
        self.incident(&start)?;
        let mut visited: BTreeSet<VertexId> = BTreeSet::from([start.clone()]);
        let mut frontier = vec![start];
        for _ in 0..depth {
            let mut next = Vec::new();
            for id in &frontier {
                for key in self.incident(id)? {
                    for member in key {
                        if visited.insert(member.clone()) {
                            next.push(member.clone());
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        self.sub(visited)
    }
}
