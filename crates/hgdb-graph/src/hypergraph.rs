use std::collections::{BTreeMap, BTreeSet};

use hgdb_core::errors::{ErrorInfo, HgdbError};
use hgdb_core::{Attrs, EdgeKey, GraphStats, HypergraphView, VertexId};
use tracing::debug;

use crate::cache::AggregateCache;
use crate::config::{CollisionPolicy, DbConfig};

/// In-memory hypergraph with attribute payloads and an incremental incidence index.
///
/// Vertices are addressed by caller supplied [`VertexId`]s, hyperedges by their
/// canonical [`EdgeKey`]. Every mutation keeps the incidence index equal to what
/// a full scan of the edge store would produce, and clears the aggregate cache
/// whenever the key sets change.
#[derive(Debug, Clone)]
pub struct HypergraphDb {
    config: DbConfig,
    vertices: BTreeMap<VertexId, Attrs>,
    edges: BTreeMap<EdgeKey, Attrs>,
    incidence: BTreeMap<VertexId, BTreeSet<EdgeKey>>,
    cache: AggregateCache,
}

/// Planned fate of one edge touched by a vertex removal.
enum Rekey {
    Shrink { from: EdgeKey, to: EdgeKey },
    Absorb { from: EdgeKey, into: EdgeKey },
    Drop { from: EdgeKey },
}

impl HypergraphDb {
    /// Creates an empty hypergraph with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DbConfig::default())
    }

    /// Creates an empty hypergraph with the provided configuration.
    pub fn with_config(config: DbConfig) -> Self {
        Self {
            config,
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            incidence: BTreeMap::new(),
            cache: AggregateCache::default(),
        }
    }

    /// Creates a hypergraph, loading `config.storage_file` when it exists.
    pub fn open(config: DbConfig) -> Result<Self, HgdbError> {
        let path = config.storage_file.clone();
        let mut db = Self::with_config(config);
        if path.exists() {
            db.load(&path)?;
        }
        Ok(db)
    }

    /// Returns the configuration used by this graph.
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Builds a graph from complete stores, rebuilding the incidence index by scanning.
    ///
    /// Fails with [`HgdbError::DanglingVertex`] if an edge names an absent vertex.
    pub(crate) fn from_parts(
        config: DbConfig,
        vertices: BTreeMap<VertexId, Attrs>,
        edges: BTreeMap<EdgeKey, Attrs>,
    ) -> Result<Self, HgdbError> {
        let mut incidence: BTreeMap<VertexId, BTreeSet<EdgeKey>> = vertices
            .keys()
            .map(|id| (id.clone(), BTreeSet::new()))
            .collect();
        for key in edges.keys() {
            for member in key {
                incidence
                    .get_mut(member)
                    .ok_or_else(|| dangling(key, member))?
                    .insert(key.clone());
            }
        }
        Ok(Self {
            config,
            vertices,
            edges,
            incidence,
            cache: AggregateCache::default(),
        })
    }

    /// Swaps in the stores of `other`, keeping this instance's configuration.
    pub(crate) fn replace_contents(&mut self, other: HypergraphDb) {
        self.vertices = other.vertices;
        self.edges = other.edges;
        self.incidence = other.incidence;
        self.cache.invalidate();
    }

    /// All vertex identifiers.
    pub fn all_v(&self) -> &BTreeSet<VertexId> {
        self.cache.all_v(&self.vertices)
    }

    /// All hyperedge keys.
    pub fn all_e(&self) -> &BTreeSet<EdgeKey> {
        self.cache.all_e(&self.edges)
    }

    /// Number of vertices.
    pub fn num_v(&self) -> usize {
        self.vertices.len()
    }

    /// Number of hyperedges.
    pub fn num_e(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over vertices and their attributes in store order.
    pub fn vertices(&self) -> impl Iterator<Item = (&VertexId, &Attrs)> + '_ {
        self.vertices.iter()
    }

    /// Iterates over hyperedges and their attributes in store order.
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &Attrs)> + '_ {
        self.edges.iter()
    }

    /// Adds a vertex. Returns `false` and leaves attributes untouched if it already exists.
    pub fn add_v(&mut self, id: impl Into<VertexId>, attrs: Attrs) -> bool {
        let id = id.into();
        if self.vertices.contains_key(&id) {
            return false;
        }
        debug!(vertex = %id, "adding vertex");
        self.incidence.insert(id.clone(), BTreeSet::new());
        self.vertices.insert(id, attrs);
        self.cache.invalidate();
        true
    }

    /// Adds a hyperedge over the given vertices and returns its canonical key.
    ///
    /// Every member must already exist. Adding an edge that is already stored
    /// is a no-op that keeps the stored attributes.
    pub fn add_e(
        &mut self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
        attrs: Attrs,
    ) -> Result<EdgeKey, HgdbError> {
        let key = self.checked_key(spec)?;
        if self.edges.contains_key(&key) {
            return Ok(key);
        }
        debug!(edge = %key, "adding hyperedge");
        self.attach(&key);
        self.edges.insert(key.clone(), attrs);
        self.cache.invalidate();
        Ok(key)
    }

    /// Removes a vertex and cascades into every edge containing it.
    ///
    /// Each such edge is re-keyed over its remaining members and keeps its
    /// attributes. Edges left with fewer than two members are dropped. A
    /// re-keyed edge landing on an existing key is resolved by the configured
    /// [`CollisionPolicy`]; under `Reject` nothing is modified.
    pub fn remove_v(&mut self, id: impl Into<VertexId>) -> Result<(), HgdbError> {
        let id = id.into();
        let touching = self
            .incidence
            .get(&id)
            .ok_or_else(|| vertex_not_found(&id))?;
        let plan = self.plan_rekey(&id, touching)?;

        self.incidence.remove(&id);
        self.vertices.remove(&id);
        for step in plan {
            match step {
                Rekey::Shrink { from, to } => {
                    let payload = self.take_edge(&from);
                    debug!(vertex = %id, from = %from, to = %to, "re-keying hyperedge");
                    self.attach(&to);
                    self.edges.insert(to, payload);
                }
                Rekey::Absorb { from, into } => {
                    self.take_edge(&from);
                    debug!(
                        vertex = %id,
                        from = %from,
                        into = %into,
                        "hyperedge absorbed by existing edge"
                    );
                }
                Rekey::Drop { from } => {
                    self.take_edge(&from);
                    debug!(vertex = %id, edge = %from, "dropping hyperedge below minimum size");
                }
            }
        }
        debug!(vertex = %id, "removed vertex");
        self.cache.invalidate();
        Ok(())
    }

    fn plan_rekey(
        &self,
        id: &VertexId,
        touching: &BTreeSet<EdgeKey>,
    ) -> Result<Vec<Rekey>, HgdbError> {
        // Distinct keys sharing `id` stay distinct without it, so only edges
        // that never contained `id` can collide.
        let mut plan = Vec::with_capacity(touching.len());
        for from in touching {
            let step = match from.without(id) {
                None => Rekey::Drop { from: from.clone() },
                Some(to) if self.edges.contains_key(&to) => match self.config.collision {
                    CollisionPolicy::Reject => {
                        return Err(HgdbError::MergeConflict(
                            ErrorInfo::new(
                                "rekey-collision",
                                "removing the vertex would merge two hyperedges",
                            )
                            .with_context("vertex", id.to_string())
                            .with_context("from", from.to_string())
                            .with_context("to", to.to_string())
                            .with_hint("remove one of the edges first or use keep-existing"),
                        ));
                    }
                    CollisionPolicy::KeepExisting => Rekey::Absorb {
                        from: from.clone(),
                        into: to,
                    },
                },
                Some(to) => Rekey::Shrink {
                    from: from.clone(),
                    to,
                },
            };
            plan.push(step);
        }
        Ok(plan)
    }

    /// Removes a hyperedge.
    pub fn remove_e(
        &mut self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
    ) -> Result<(), HgdbError> {
        let key = self.existing_key(spec)?;
        self.take_edge(&key);
        debug!(edge = %key, "removed hyperedge");
        self.cache.invalidate();
        Ok(())
    }

    /// Merges `attrs` into a vertex's record; supplied keys overwrite, others persist.
    pub fn update_v(&mut self, id: impl Into<VertexId>, attrs: Attrs) -> Result<(), HgdbError> {
        let id = id.into();
        let record = self
            .vertices
            .get_mut(&id)
            .ok_or_else(|| vertex_not_found(&id))?;
        record.extend(attrs);
        debug!(vertex = %id, "updated vertex");
        Ok(())
    }

    /// Merges `attrs` into a hyperedge's record; supplied keys overwrite, others persist.
    pub fn update_e(
        &mut self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
        attrs: Attrs,
    ) -> Result<(), HgdbError> {
        let key = self.existing_key(spec)?;
        if let Some(record) = self.edges.get_mut(&key) {
            record.extend(attrs);
        }
        debug!(edge = %key, "updated hyperedge");
        Ok(())
    }

    /// Attribute record of a vertex; `None` when absent.
    pub fn v(&self, id: impl Into<VertexId>) -> Option<&Attrs> {
        self.vertices.get(&id.into())
    }

    /// Attribute record of a hyperedge.
    ///
    /// Fails with [`HgdbError::DanglingVertex`] when any member is unknown, even
    /// though no such edge could exist; returns `None` when every member exists
    /// but the edge is not stored.
    pub fn e(
        &self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
    ) -> Result<Option<&Attrs>, HgdbError> {
        let key = self.checked_key(spec)?;
        Ok(self.edges.get(&key))
    }

    /// Whether the vertex exists.
    pub fn has_v(&self, id: impl Into<VertexId>) -> bool {
        self.vertices.contains_key(&id.into())
    }

    /// Whether the hyperedge exists. Never fails; malformed specifications are simply absent.
    pub fn has_e(&self, spec: impl IntoIterator<Item = impl Into<VertexId>>) -> bool {
        EdgeKey::encode(spec)
            .map(|key| self.edges.contains_key(&key))
            .unwrap_or(false)
    }

    /// Number of hyperedges containing the vertex.
    pub fn degree_v(&self, id: impl Into<VertexId>) -> Result<usize, HgdbError> {
        Ok(self.incident(&id.into())?.len())
    }

    /// Number of members of the hyperedge.
    pub fn degree_e(
        &self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
    ) -> Result<usize, HgdbError> {
        Ok(self.existing_key(spec)?.len())
    }

    /// Hyperedges containing the vertex.
    pub fn nbr_e_of_v(&self, id: impl Into<VertexId>) -> Result<&BTreeSet<EdgeKey>, HgdbError> {
        self.incident(&id.into())
    }

    /// Members of the hyperedge.
    pub fn nbr_v_of_e(
        &self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
    ) -> Result<BTreeSet<VertexId>, HgdbError> {
        Ok(self.existing_key(spec)?.iter().cloned().collect())
    }

    /// Vertices sharing at least one hyperedge with `id`.
    ///
    /// `id` itself is left out when `exclude_self` is set; an isolated vertex
    /// has no neighbours either way.
    pub fn nbr_v(
        &self,
        id: impl Into<VertexId>,
        exclude_self: bool,
    ) -> Result<BTreeSet<VertexId>, HgdbError> {
        let id = id.into();
        let mut neighbours: BTreeSet<VertexId> = self
            .incident(&id)?
            .iter()
            .flat_map(|key| key.iter().cloned())
            .collect();
        if exclude_self {
            neighbours.remove(&id);
        }
        Ok(neighbours)
    }

    /// Summary statistics over the read-only surface.
    pub fn stats(&self) -> Result<GraphStats, HgdbError> {
        GraphStats::collect(self)
    }

    pub(crate) fn incident(&self, id: &VertexId) -> Result<&BTreeSet<EdgeKey>, HgdbError> {
        self.incidence.get(id).ok_or_else(|| vertex_not_found(id))
    }

    /// Inserts an edge whose members are known to exist.
    pub(crate) fn insert_edge(&mut self, key: EdgeKey, attrs: Attrs) {
        self.attach(&key);
        self.edges.insert(key, attrs);
        self.cache.invalidate();
    }

    fn checked_key(
        &self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
    ) -> Result<EdgeKey, HgdbError> {
        let key = EdgeKey::encode(spec)?;
        if let Some(missing) = self.missing_member(&key) {
            return Err(dangling(&key, missing));
        }
        Ok(key)
    }

    fn existing_key(
        &self,
        spec: impl IntoIterator<Item = impl Into<VertexId>>,
    ) -> Result<EdgeKey, HgdbError> {
        let key = EdgeKey::encode(spec)?;
        if let Some(missing) = self.missing_member(&key) {
            return Err(vertex_not_found(missing).with_context("edge", &key));
        }
        if !self.edges.contains_key(&key) {
            return Err(HgdbError::NotFound(
                ErrorInfo::new("unknown-edge", "hyperedge does not exist")
                    .with_context("edge", key.to_string()),
            ));
        }
        Ok(key)
    }

    fn missing_member<'a>(&self, key: &'a EdgeKey) -> Option<&'a VertexId> {
        key.iter().find(|member| !self.vertices.contains_key(*member))
    }

    fn attach(&mut self, key: &EdgeKey) {
        for member in key {
            self.incidence
                .entry(member.clone())
                .or_default()
                .insert(key.clone());
        }
    }

    fn detach(&mut self, key: &EdgeKey) {
        for member in key {
            if let Some(edges) = self.incidence.get_mut(member) {
                edges.remove(key);
            }
        }
    }

    fn take_edge(&mut self, key: &EdgeKey) -> Attrs {
        self.detach(key);
        self.edges.remove(key).unwrap_or_default()
    }
}

impl Default for HypergraphDb {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for HypergraphDb {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.edges == other.edges
    }
}

impl HypergraphView for HypergraphDb {
    fn num_v(&self) -> usize {
        self.vertices.len()
    }

    fn num_e(&self) -> usize {
        self.edges.len()
    }

    fn all_v(&self) -> &BTreeSet<VertexId> {
        self.cache.all_v(&self.vertices)
    }

    fn all_e(&self) -> &BTreeSet<EdgeKey> {
        self.cache.all_e(&self.edges)
    }

    fn v(&self, id: &VertexId) -> Option<&Attrs> {
        self.vertices.get(id)
    }

    fn has_v(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    fn degree_v(&self, id: &VertexId) -> Result<usize, HgdbError> {
        Ok(self.incident(id)?.len())
    }

    fn nbr_e_of_v(&self, id: &VertexId) -> Result<&BTreeSet<EdgeKey>, HgdbError> {
        self.incident(id)
    }

    fn e(&self, members: &[VertexId]) -> Result<Option<&Attrs>, HgdbError> {
        let key = self.checked_key(members)?;
        Ok(self.edges.get(&key))
    }
}

pub(crate) fn vertex_not_found(id: &VertexId) -> HgdbError {
    HgdbError::NotFound(
        ErrorInfo::new("unknown-vertex", "vertex does not exist")
            .with_context("vertex", id.to_string()),
    )
}

fn dangling(key: &EdgeKey, member: &VertexId) -> HgdbError {
    HgdbError::DanglingVertex(
        ErrorInfo::new("dangling-vertex", "hyperedge names a vertex that does not exist")
            .with_context("vertex", member.to_string())
            .with_context("edge", key.to_string()),
    )
}
