mod common;

use std::collections::BTreeSet;

use common::{fixture, ids, keys};
use hgdb_graph::{attrs, AttrValue, Attrs, HgdbError, HypergraphDb, VertexId};

fn typed_graph() -> HypergraphDb {
    let mut hg = HypergraphDb::new();
    hg.add_v("alice", attrs([("entity_type", "person"), ("team", "core")]));
    hg.add_v("bob", attrs([("entity_type", "person"), ("team", "infra")]));
    hg.add_v("hgdb", attrs([("entity_type", "project")]));
    hg.add_v("carol", attrs([("entity_type", "person")]));
    hg.add_e(["alice", "hgdb"], attrs([("relation", "maintains")])).unwrap();
    hg.add_e(["alice", "bob", "hgdb"], attrs([("relation", "reviews")])).unwrap();
    hg
}

#[test]
fn query_v_matches_every_filter() {
    let hg = typed_graph();
    let people: BTreeSet<VertexId> = hg
        .query_v(&attrs([("entity_type", "person")]))
        .into_iter()
        .collect();
    assert_eq!(
        people,
        ["alice", "bob", "carol"]
            .into_iter()
            .map(VertexId::from)
            .collect::<BTreeSet<_>>()
    );

    let core = hg.query_v(&attrs([("entity_type", "person"), ("team", "core")]));
    assert_eq!(core, vec![VertexId::from("alice")]);

    assert!(hg.query_v(&attrs([("unknown", "x")])).is_empty());
    assert!(hg
        .query_v(&attrs([("entity_type", AttrValue::Int(1))]))
        .is_empty());
    assert_eq!(hg.query_v(&Attrs::new()).len(), 4);
}

#[test]
fn query_e_matches_edge_attributes() {
    let hg = fixture();
    let studies = hg.query_e(&attrs([("relation", "study")]));
    assert_eq!(
        studies.into_iter().collect::<BTreeSet<_>>(),
        keys(&[&[1, 3, 4, 5], &[4, 5, 6], &[1, 5, 6]])
    );
    assert!(hg.query_e(&attrs([("relation", "enemies")])).is_empty());
}

#[test]
fn numeric_filters_ignore_int_float_split() {
    let mut hg = HypergraphDb::new();
    hg.add_v("a", attrs([("w", AttrValue::Float(1.0))]));
    hg.add_v("b", attrs([("w", AttrValue::Int(1))]));
    hg.add_v("c", attrs([("w", AttrValue::Float(1.5))]));
    hg.add_v(
        "d",
        attrs([("tags", AttrValue::List(vec![AttrValue::Int(2), AttrValue::from("x")]))]),
    );

    let ones: BTreeSet<VertexId> = hg
        .query_v(&attrs([("w", AttrValue::Int(1))]))
        .into_iter()
        .collect();
    assert_eq!(
        ones,
        ["a", "b"].into_iter().map(VertexId::from).collect::<BTreeSet<_>>()
    );
    assert_eq!(
        hg.query_v(&attrs([("w", AttrValue::Float(1.0))])).len(),
        2
    );
    assert!(hg.query_v(&attrs([("w", AttrValue::from("1"))])).is_empty());

    let tagged = hg.query_v(&attrs([(
        "tags",
        AttrValue::List(vec![AttrValue::Float(2.0), AttrValue::from("x")]),
    )]));
    assert_eq!(tagged, vec![VertexId::from("d")]);
}

#[test]
fn sub_keeps_only_fully_contained_edges() {
    let hg = fixture();
    let sub = hg.sub([1, 3, 4, 5]).unwrap();
    assert_eq!(sub.all_v(), &ids(&[1, 3, 4, 5]));
    assert_eq!(sub.all_e(), &keys(&[&[1, 3], &[1, 3, 4, 5]]));
    assert_eq!(sub.v(3), hg.v(3));
    assert_eq!(sub.e([1, 3, 4, 5]).unwrap(), hg.e([1, 3, 4, 5]).unwrap());
    assert_eq!(sub.degree_v(4).unwrap(), 1);
    common::assert_incidence_consistent(&sub);
}

#[test]
fn sub_is_independent_of_its_source() {
    let hg = fixture();
    let mut sub = hg.sub([1, 2, 3]).unwrap();
    sub.update_v(1, attrs([("name", "Changed")])).unwrap();
    sub.remove_v(2).unwrap();
    assert_eq!(hg.v(1), Some(&attrs([("name", "Alice")])));
    assert!(hg.has_e([1, 2]));
    assert_eq!(hg.num_v(), 6);
}

#[test]
fn sub_rejects_unknown_vertices() {
    let hg = fixture();
    let err = hg.sub([1, 9]).unwrap_err();
    assert!(matches!(err, HgdbError::NotFound(ref info) if info.code == "unknown-vertex"));
}

#[test]
fn sub_from_v_expands_by_vertex_hops() {
    let mut hg = fixture();
    let one_hop = hg.sub_from_v(1, 1).unwrap();
    assert_eq!(one_hop.all_v(), &ids(&[1, 2, 3, 4, 5, 6]));
    assert_eq!(one_hop.num_e(), 6);

    let zero_hop = hg.sub_from_v(1, 0).unwrap();
    assert_eq!(zero_hop.all_v(), &ids(&[1]));
    assert_eq!(zero_hop.num_e(), 0);

    hg.add_v(7, Attrs::new());
    hg.add_v(8, Attrs::new());
    hg.add_e([2, 7], Attrs::new()).unwrap();
    hg.add_e([7, 8], Attrs::new()).unwrap();

    let from_eight = hg.sub_from_v(8, 1).unwrap();
    assert_eq!(from_eight.all_v(), &ids(&[7, 8]));
    assert_eq!(from_eight.all_e(), &keys(&[&[7, 8]]));

    let two_hops = hg.sub_from_v(8, 2).unwrap();
    assert_eq!(two_hops.all_v(), &ids(&[2, 7, 8]));
    assert_eq!(two_hops.all_e(), &keys(&[&[2, 7], &[7, 8]]));

    let everything = hg.sub_from_v(8, 10).unwrap();
    assert_eq!(everything, hg);

    assert!(matches!(hg.sub_from_v(99, 1), Err(HgdbError::NotFound(_))));
}
