mod common;

use common::{assert_incidence_consistent, fixture, key};
use hgdb_graph::{attrs, Attrs, CollisionPolicy, DbConfig, HgdbError, HypergraphDb};

fn colliding(policy: CollisionPolicy) -> HypergraphDb {
    let config = DbConfig {
        collision: policy,
        ..DbConfig::default()
    };
    let mut hg = HypergraphDb::with_config(config);
    for id in 1..=4 {
        hg.add_v(id, Attrs::new());
    }
    hg.add_e([1, 2], attrs([("relation", "pair")])).unwrap();
    hg.add_e([1, 2, 3], attrs([("relation", "triple")])).unwrap();
    hg.add_e([3, 4], attrs([("relation", "tail")])).unwrap();
    hg
}

#[test]
fn collision_is_rejected_without_side_effects() {
    let mut hg = colliding(CollisionPolicy::Reject);
    let before = hg.clone();
    let err = hg.remove_v(3).unwrap_err();
    match err {
        HgdbError::MergeConflict(info) => {
            assert_eq!(info.code, "rekey-collision");
            assert_eq!(info.context.get("from"), Some(&"(1, 2, 3)".to_string()));
            assert_eq!(info.context.get("to"), Some(&"(1, 2)".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(hg, before);
    assert!(hg.has_v(3));
    assert!(hg.has_e([3, 4]));
    assert_eq!(hg.all_v().len(), 4);
    assert_incidence_consistent(&hg);
}

#[test]
fn keep_existing_discards_the_shrunken_payload() {
    let mut hg = colliding(CollisionPolicy::KeepExisting);
    hg.remove_v(3).unwrap();
    assert!(!hg.has_v(3));
    assert_eq!(hg.num_e(), 1);
    assert_eq!(hg.e([1, 2]).unwrap(), Some(&attrs([("relation", "pair")])));
    assert!(!hg.has_e([3, 4]));
    assert_eq!(hg.degree_v(4).unwrap(), 0);
    assert_incidence_consistent(&hg);
}

#[test]
fn edges_below_two_members_are_dropped() {
    let mut hg = fixture();
    hg.remove_v(2).unwrap();
    assert!(!hg.has_e([1, 2]));
    assert_eq!(hg.degree_v(1).unwrap(), 3);
    assert_eq!(hg.e([3, 4]).unwrap(), Some(&attrs([("relation", "knows")])));
    assert_incidence_consistent(&hg);
}

#[test]
fn repeated_removals_keep_rekeying_the_same_payload() {
    let mut hg = fixture();
    hg.update_e([1, 3, 4, 5], attrs([("weight", 0.25)])).unwrap();
    hg.remove_v(5).unwrap();
    let expected = attrs([
        ("relation", hgdb_graph::AttrValue::from("study")),
        ("weight", hgdb_graph::AttrValue::Float(0.25)),
    ]);
    assert_eq!(hg.e([1, 3, 4]).unwrap(), Some(&expected));

    // (1, 3, 4) would shrink onto the existing (1, 3).
    let err = hg.remove_v(4).unwrap_err();
    assert!(matches!(err, HgdbError::MergeConflict(_)));
    assert!(hg.has_v(4));
    assert_eq!(hg.e([1, 3, 4]).unwrap(), Some(&expected));
    assert_eq!(hg.e([1, 3]).unwrap(), Some(&attrs([("relation", "knows")])));
    assert_incidence_consistent(&hg);
}

#[test]
fn neighbour_sets_follow_the_rekey() {
    let mut hg = fixture();
    hg.remove_v(6).unwrap();
    assert!(hg.nbr_e_of_v(1).unwrap().contains(&key(&[1, 5])));
    assert!(hg.nbr_e_of_v(5).unwrap().contains(&key(&[4, 5])));
    assert_eq!(hg.degree_v(5).unwrap(), 3);
    assert_eq!(hg.nbr_v(5, true).unwrap(), common::ids(&[1, 3, 4]));
}
