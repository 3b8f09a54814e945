use hgdb_core::{AttrValue, Attrs, EdgeKey, VertexId};

use crate::hypergraph::HypergraphDb;

/// Returns whether `record` carries every `(key, value)` pair in `filters`.
///
/// Integers and floats compare numerically, so a filter of `1` matches a
/// stored `1.0`. An empty filter matches every record.
pub fn matches_filters(record: &Attrs, filters: &Attrs) -> bool {
    filters.iter().all(|(key, expected)| {
        record
            .get(key)
            .is_some_and(|actual| values_match(actual, expected))
    })
}

fn values_match(actual: &AttrValue, expected: &AttrValue) -> bool {
    match (actual, expected) {
        (AttrValue::Int(_), AttrValue::Float(_)) | (AttrValue::Float(_), AttrValue::Int(_)) => {
            actual.as_f64() == expected.as_f64()
        }
        (AttrValue::List(left), AttrValue::List(right)) => {
            left.len() == right.len()
                && left.iter().zip(right).all(|(a, b)| values_match(a, b))
        }
        (AttrValue::Map(left), AttrValue::Map(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, a)| right.get(key).is_some_and(|b| values_match(a, b)))
        }
        _ => actual == expected,
    }
}

impl HypergraphDb {
    /// Vertices whose attributes equal every entry of `filters`, in store order.
    pub fn query_v(&self, filters: &Attrs) -> Vec<VertexId> {
        self.vertices()
            .filter(|(_, record)| matches_filters(record, filters))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Hyperedges whose attributes equal every entry of `filters`, in store order.
    pub fn query_e(&self, filters: &Attrs) -> Vec<EdgeKey> {
        self.edges()
            .filter(|(_, record)| matches_filters(record, filters))
            .map(|(key, _)| key.clone())
            .collect()
    }
}
