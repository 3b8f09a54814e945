use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use hgdb_core::errors::{ErrorInfo, HgdbError};
use hgdb_core::{attrs_from_json, attrs_to_json, AttrValue, Attrs, EdgeKey, VertexId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::DbConfig;
use crate::hypergraph::HypergraphDb;

/// The only network type this index can represent.
pub const UNDIRECTED: &str = "undirected";

/// Node or edge identifier inside an interchange document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HifId {
    /// JSON integer identifier.
    Int(i64),
    /// JSON string identifier.
    Text(String),
}

impl From<&VertexId> for HifId {
    fn from(id: &VertexId) -> Self {
        match id {
            VertexId::Int(value) => HifId::Int(*value),
            VertexId::Text(value) => HifId::Text(value.clone()),
        }
    }
}

impl From<HifId> for VertexId {
    fn from(id: HifId) -> Self {
        match id {
            HifId::Int(value) => VertexId::Int(value),
            HifId::Text(value) => VertexId::Text(value),
        }
    }
}

impl std::fmt::Display for HifId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HifId::Int(value) => write!(f, "{value}"),
            HifId::Text(value) => write!(f, "{value}"),
        }
    }
}

/// Hypergraph interchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HifDocument {
    /// Always `"undirected"` for documents produced here.
    #[serde(rename = "network-type", default = "default_network_type")]
    pub network_type: String,
    /// One entry per (edge, member) pair.
    #[serde(default)]
    pub incidences: Vec<HifIncidence>,
    /// Vertex records.
    #[serde(default)]
    pub nodes: Vec<HifNode>,
    /// Hyperedge records.
    #[serde(default)]
    pub edges: Vec<HifEdge>,
}

/// Membership of one node in one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HifIncidence {
    /// Edge identifier.
    pub edge: HifId,
    /// Node identifier.
    pub node: HifId,
    /// Optional incidence weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Node record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HifNode {
    /// Node identifier.
    pub node: HifId,
    /// Attribute payload.
    #[serde(default)]
    pub attrs: Map<String, Value>,
    /// Optional node weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Edge record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HifEdge {
    /// Synthetic edge identifier, unrelated to the canonical key.
    pub edge: HifId,
    /// Attribute payload.
    #[serde(default)]
    pub attrs: Map<String, Value>,
    /// Optional edge weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

fn default_network_type() -> String {
    UNDIRECTED.to_owned()
}

/// Exports the graph as an interchange document.
///
/// Edges are numbered `0..num_e` in store order. Fails with
/// [`HgdbError::NonPortableValue`] if an attribute cannot be expressed in JSON.
pub fn graph_to_hif(graph: &HypergraphDb) -> Result<HifDocument, HgdbError> {
    let mut nodes = Vec::with_capacity(graph.num_v());
    for (id, attrs) in graph.vertices() {
        let attrs = attrs_to_json(attrs).map_err(|err| err.with_context("node", id))?;
        nodes.push(HifNode {
            node: HifId::from(id),
            attrs,
            weight: None,
        });
    }

    let mut edges = Vec::with_capacity(graph.num_e());
    let mut incidences = Vec::new();
    for (index, (key, attrs)) in graph.edges().enumerate() {
        let edge = HifId::Int(index as i64);
        let attrs = attrs_to_json(attrs).map_err(|err| err.with_context("edge", key))?;
        for member in key {
            incidences.push(HifIncidence {
                edge: edge.clone(),
                node: HifId::from(member),
                weight: None,
            });
        }
        edges.push(HifEdge {
            edge,
            attrs,
            weight: None,
        });
    }

    Ok(HifDocument {
        network_type: default_network_type(),
        incidences,
        nodes,
        edges,
    })
}

/// Builds a graph from an interchange document.
///
/// Canonical keys are reconstructed by grouping incidences by edge id. Nodes
/// and edges that only appear in incidences receive empty attributes.
pub fn graph_from_hif(doc: &HifDocument, config: DbConfig) -> Result<HypergraphDb, HgdbError> {
    if doc.network_type != UNDIRECTED {
        return Err(malformed(
            "unsupported-network-type",
            "only undirected hypergraphs are supported",
        )
        .with_context("network-type", &doc.network_type));
    }

    let mut vertices: BTreeMap<VertexId, Attrs> = BTreeMap::new();
    for record in &doc.nodes {
        let mut attrs = attrs_from_json(record.attrs.clone());
        fold_weight(&mut attrs, record.weight);
        if vertices.insert(record.node.clone().into(), attrs).is_some() {
            return Err(malformed("duplicate-node", "node is listed twice")
                .with_context("node", &record.node));
        }
    }

    let mut members: BTreeMap<&HifId, BTreeSet<VertexId>> = BTreeMap::new();
    let mut dropped_weights = 0usize;
    for incidence in &doc.incidences {
        let vertex = VertexId::from(incidence.node.clone());
        vertices.entry(vertex.clone()).or_default();
        members.entry(&incidence.edge).or_default().insert(vertex);
        if incidence.weight.is_some() {
            dropped_weights += 1;
        }
    }
    if dropped_weights > 0 {
        warn!(count = dropped_weights, "ignoring incidence weights");
    }

    let mut edge_attrs: BTreeMap<&HifId, Attrs> = BTreeMap::new();
    for record in &doc.edges {
        let mut attrs = attrs_from_json(record.attrs.clone());
        fold_weight(&mut attrs, record.weight);
        if edge_attrs.insert(&record.edge, attrs).is_some() {
            return Err(malformed("duplicate-edge-id", "edge is listed twice")
                .with_context("edge", &record.edge));
        }
    }

    let mut edges: BTreeMap<EdgeKey, Attrs> = BTreeMap::new();
    for (edge_id, group) in members {
        let key = EdgeKey::encode(group).map_err(|err| {
            HgdbError::MalformedInterchange(err.info().clone()).with_context("edge", edge_id)
        })?;
        let attrs = edge_attrs.remove(edge_id).unwrap_or_default();
        if edges.contains_key(&key) {
            return Err(malformed("duplicate-edge", "two edges share the same members")
                .with_context("edge", edge_id)
                .with_context("members", &key));
        }
        edges.insert(key, attrs);
    }
    if let Some(edge_id) = edge_attrs.keys().next() {
        return Err(malformed("edge-without-incidences", "edge record has no incidences")
            .with_context("edge", edge_id));
    }

    HypergraphDb::from_parts(config, vertices, edges)
        .map_err(|err| HgdbError::MalformedInterchange(err.info().clone()))
}

fn fold_weight(attrs: &mut Attrs, weight: Option<f64>) {
    if let Some(weight) = weight {
        attrs
            .entry("weight".to_owned())
            .or_insert(AttrValue::Float(weight));
    }
}

fn malformed(code: &str, message: &str) -> HgdbError {
    HgdbError::MalformedInterchange(ErrorInfo::new(code, message))
}

impl HypergraphDb {
    /// Exports the graph as an interchange document.
    pub fn to_hif(&self) -> Result<HifDocument, HgdbError> {
        graph_to_hif(self)
    }

    /// Exports the graph as interchange JSON text.
    pub fn to_hif_json(&self) -> Result<String, HgdbError> {
        let doc = self.to_hif()?;
        serde_json::to_string_pretty(&doc)
            .map_err(|err| malformed("serialize-json", &err.to_string()))
    }

    /// Replaces the in-memory state with the contents of `doc`.
    ///
    /// The document is fully validated before anything is replaced.
    pub fn load_from_hif(&mut self, doc: &HifDocument) -> Result<(), HgdbError> {
        let loaded = graph_from_hif(doc, self.config().clone())?;
        info!(
            vertices = loaded.num_v(),
            edges = loaded.num_e(),
            "loaded interchange document"
        );
        self.replace_contents(loaded);
        Ok(())
    }

    /// Replaces the in-memory state with interchange JSON text.
    pub fn load_from_hif_json(&mut self, json: &str) -> Result<(), HgdbError> {
        let doc: HifDocument = serde_json::from_str(json)
            .map_err(|err| malformed("deserialize-json", &err.to_string()))?;
        self.load_from_hif(&doc)
    }

    /// Writes the interchange document to `path`.
    pub fn save_hif(&self, path: impl AsRef<Path>) -> Result<(), HgdbError> {
        let path = path.as_ref();
        let json = self.to_hif_json()?;
        fs::write(path, json).map_err(|err| HgdbError::io("write-hif", &err, path))?;
        info!(path = %path.display(), "saved interchange document");
        Ok(())
    }

    /// Replaces the in-memory state with the interchange document at `path`.
    pub fn load_hif(&mut self, path: impl AsRef<Path>) -> Result<(), HgdbError> {
        let path = path.as_ref();
        let json =
            fs::read_to_string(path).map_err(|err| HgdbError::io("read-hif", &err, path))?;
        self.load_from_hif_json(&json)
            .map_err(|err| err.with_context("path", path.display()))
    }
}
