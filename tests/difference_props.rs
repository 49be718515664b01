use adoc_relations::query::sorted_difference;
use proptest::prelude::*;
use std::collections::BTreeSet;

// The merge difference agrees with set difference on sorted, deduplicated input
proptest! {
    #[test]
    fn merge_difference_matches_set_difference(
        a in proptest::collection::btree_set(0u16..500, 0..80),
        b in proptest::collection::btree_set(0u16..500, 0..80),
    ) {
        let av: Vec<u16> = a.iter().copied().collect();
        let bv: Vec<u16> = b.iter().copied().collect();
        let got = sorted_difference(&av, &bv);
        let want: Vec<u16> = a.difference(&b).copied().collect();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn difference_is_sorted_and_disjoint_from_right(
        a in proptest::collection::btree_set("[a-z]{1,6}", 0..40),
        b in proptest::collection::btree_set("[a-z]{1,6}", 0..40),
    ) {
        let av: Vec<String> = a.into_iter().collect();
        let bv: Vec<String> = b.iter().cloned().collect();
        let got = sorted_difference(&av, &bv);
        prop_assert!(got.windows(2).all(|w| w[0] < w[1]));
        let right: BTreeSet<&String> = b.iter().collect();
        prop_assert!(got.iter().all(|s| !right.contains(s)));
    }
}
