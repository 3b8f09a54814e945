mod common;

use std::collections::BTreeSet;

use common::assert_incidence_consistent;
use hgdb_graph::{
    attrs, canonical_hash, gen_random, CollisionPolicy, DbConfig, HypergraphDb, VertexId,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
enum Op {
    AddV(i64),
    AddE(Vec<i64>),
    RemoveV(i64),
    RemoveE(Vec<i64>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i64..12).prop_map(Op::AddV),
        prop::collection::vec(0i64..12, 2..5).prop_map(Op::AddE),
        (0i64..12).prop_map(Op::RemoveV),
        prop::collection::vec(0i64..12, 2..5).prop_map(Op::RemoveE),
    ]
}

proptest! {
    #[test]
    fn incidence_index_matches_edge_scan(
        ops in prop::collection::vec(op(), 1..60),
        keep in any::<bool>(),
    ) {
        let policy = if keep { CollisionPolicy::KeepExisting } else { CollisionPolicy::Reject };
        let mut hg = HypergraphDb::with_config(DbConfig {
            collision: policy,
            ..DbConfig::default()
        });
        for op in ops {
            let before = hg.clone();
            let result = match op {
                Op::AddV(id) => {
                    hg.add_v(id, attrs([("id", id)]));
                    Ok(())
                }
                Op::AddE(members) => {
                    let size = members.len() as i64;
                    hg.add_e(members, attrs([("size", size)])).map(|_| ())
                }
                Op::RemoveV(id) => hg.remove_v(id),
                Op::RemoveE(members) => hg.remove_e(members),
            };
            if result.is_err() {
                prop_assert_eq!(&hg, &before);
            }
            assert_incidence_consistent(&hg);
            for key in hg.all_e() {
                prop_assert!(key.len() >= 2);
                for member in key {
                    prop_assert!(hg.has_v(member));
                }
            }
            prop_assert_eq!(hg.num_v(), hg.all_v().len());
            prop_assert_eq!(hg.num_e(), hg.all_e().len());
        }
    }

    #[test]
    fn removal_preserves_payloads_of_surviving_edges(seed in any::<u64>(), victim in 0i64..15) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut hg = gen_random(15, 25, 4, &mut rng).unwrap();
        let before = hg.clone();
        let victim = VertexId::from(victim);
        if hg.remove_v(victim.clone()).is_ok() {
            for (key, record) in before.edges() {
                if !key.contains(&victim) {
                    prop_assert_eq!(hg.e(key).unwrap(), Some(record));
                } else if let Some(target) = key.without(&victim) {
                    prop_assert_eq!(hg.e(&target).unwrap(), Some(record));
                }
            }
            assert_incidence_consistent(&hg);
        }
    }

    #[test]
    fn has_e_is_total(members in prop::collection::vec(-3i64..20, 0..6)) {
        let mut rng = StdRng::seed_from_u64(7);
        let hg = gen_random(10, 12, 3, &mut rng).unwrap();
        let expected = hg.all_e().iter().any(|key| {
            let wanted: BTreeSet<i64> = members.iter().copied().collect();
            key.len() == wanted.len() && wanted.iter().all(|m| key.contains(&(*m).into()))
        });
        prop_assert_eq!(hg.has_e(members), expected);
    }

    #[test]
    fn generated_graphs_round_trip_through_both_codecs(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let hg = gen_random(12, 20, 5, &mut rng).unwrap();

        let bytes = hgdb_graph::graph_to_bytes(&hg).unwrap();
        let from_snapshot = hgdb_graph::graph_from_bytes(&bytes, DbConfig::default()).unwrap();
        prop_assert_eq!(canonical_hash(&hg).unwrap(), canonical_hash(&from_snapshot).unwrap());

        let mut from_hif = HypergraphDb::new();
        from_hif.load_from_hif(&hg.to_hif().unwrap()).unwrap();
        prop_assert_eq!(from_hif.all_v(), hg.all_v());
        prop_assert_eq!(from_hif.all_e(), hg.all_e());
        for (key, record) in hg.edges() {
            prop_assert_eq!(
                from_hif.e(key).unwrap().and_then(|attrs| attrs.get("relation")),
                record.get("relation")
            );
        }
    }
}
