use hgdb_core::errors::{ErrorInfo, HgdbError};
use hgdb_core::{attrs, AttrValue, VertexId, MIN_EDGE_SIZE};
use rand::seq::index::sample;
use rand::Rng;

use crate::hypergraph::HypergraphDb;

const LABELS: [&str; 4] = ["knows", "study", "works", "lives"];

/// Generates a random hypergraph over integer vertices `0..num_vertices`.
///
/// Up to `num_edges` edges are drawn with arity in `2..=max_arity`; draws that
/// repeat an existing member set are skipped, so the result may hold fewer
/// edges. Every vertex carries an `index` attribute and every edge a
/// `relation` label and a float `weight`.
pub fn gen_random<R: Rng>(
    num_vertices: usize,
    num_edges: usize,
    max_arity: usize,
    rng: &mut R,
) -> Result<HypergraphDb, HgdbError> {
    if num_edges > 0 && (num_vertices < MIN_EDGE_SIZE || max_arity < MIN_EDGE_SIZE) {
        return Err(HgdbError::InvalidEdgeShape(
            ErrorInfo::new(
                "generator-arity",
                "edges need at least two vertices and an arity of at least two",
            )
            .with_context("vertices", num_vertices.to_string())
            .with_context("max_arity", max_arity.to_string()),
        ));
    }

    let mut graph = HypergraphDb::new();
    for index in 0..num_vertices {
        graph.add_v(vertex(index), attrs([("index", AttrValue::Int(index as i64))]));
    }

    let arity_cap = max_arity.min(num_vertices);
    for _ in 0..num_edges {
        let arity = rng.gen_range(MIN_EDGE_SIZE..=arity_cap);
        let members = sample(rng, num_vertices, arity).into_iter().map(vertex);
        let relation = LABELS[rng.gen_range(0..LABELS.len())];
        let weight: f64 = rng.gen();
        graph.add_e(
            members,
            attrs([
                ("relation", AttrValue::from(relation)),
                ("weight", AttrValue::Float(weight)),
            ]),
        )?;
    }

    Ok(graph)
}

fn vertex(index: usize) -> VertexId {
    VertexId::Int(index as i64)
}
