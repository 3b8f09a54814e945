#![allow(dead_code)]

use std::collections::BTreeSet;

use hgdb_graph::{attrs, EdgeKey, HypergraphDb, VertexId};

/// Six people and six relations used across the integration tests.
pub fn fixture() -> HypergraphDb {
    let mut hg = HypergraphDb::new();
    for (id, name) in [
        (1, "Alice"),
        (2, "Bob"),
        (3, "Charlie"),
        (4, "David"),
        (5, "Eve"),
        (6, "Frank"),
    ] {
        hg.add_v(id, attrs([("name", name)]));
    }
    hg.add_e([1, 2], attrs([("relation", "knows")])).unwrap();
    hg.add_e([1, 3], attrs([("relation", "knows")])).unwrap();
    hg.add_e([2, 3, 4], attrs([("relation", "knows")])).unwrap();
    hg.add_e([3, 4, 1, 5], attrs([("relation", "study")])).unwrap();
    hg.add_e([6, 5, 4], attrs([("relation", "study")])).unwrap();
    hg.add_e([1, 5, 6], attrs([("relation", "study")])).unwrap();
    hg
}

pub fn ids(values: &[i64]) -> BTreeSet<VertexId> {
    values.iter().copied().map(VertexId::Int).collect()
}

pub fn key(values: &[i64]) -> EdgeKey {
    EdgeKey::encode(values.iter().copied()).unwrap()
}

pub fn keys(groups: &[&[i64]]) -> BTreeSet<EdgeKey> {
    groups.iter().map(|group| key(group)).collect()
}

/// Recomputes every vertex's incident edges from the edge store and compares
/// them with the maintained index.
pub fn assert_incidence_consistent(hg: &HypergraphDb) {
    for id in hg.all_v() {
        let scanned: BTreeSet<EdgeKey> = hg
            .all_e()
            .iter()
            .filter(|key| key.contains(id))
            .cloned()
            .collect();
        assert_eq!(hg.nbr_e_of_v(id).unwrap(), &scanned, "vertex {id}");
    }
}
