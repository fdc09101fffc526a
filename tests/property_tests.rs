//! Property-based tests for radix routing, insertion paths and ordering.

use lexbucket::prelude::*;
use lexbucket::radix::radix;
use lexbucket::BUCKET_COUNT;
use proptest::prelude::*;

// =============================================================================
// PROPERTY TEST GENERATORS
// =============================================================================

/// ASCII-letter keys, including the empty key.
fn letter_key_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![prop::num::u8::ANY.prop_map(|b| b'a' + b % 26), (b'A'..=b'Z')],
        0..=max_len,
    )
}

/// Texts drawn from a small alphabet, so suffixes share long prefixes.
fn narrow_text_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abAB".to_vec()), 0..=max_len)
}

fn config() -> ProptestConfig {
    ProptestConfig::with_cases(64)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn prop_radix_in_domain(key in prop::collection::vec(any::<u8>(), 0..8)) {
        prop_assert!((radix(&key) as usize) < BUCKET_COUNT);
    }

    #[test]
    fn prop_radix_depends_on_first_three_bytes(
        prefix in letter_key_strategy(3),
        a in prop::collection::vec(any::<u8>(), 0..6),
        b in prop::collection::vec(any::<u8>(), 0..6),
    ) {
        prop_assume!(prefix.len() == 3);
        let mut ka = prefix.clone();
        ka.extend_from_slice(&a);
        let mut kb = prefix;
        kb.extend_from_slice(&b);
        prop_assert_eq!(radix(&ka), radix(&kb));
    }

    #[test]
    fn prop_radix_is_monotone(
        a in prop::collection::vec(any::<u8>(), 0..6),
        b in prop::collection::vec(any::<u8>(), 0..6),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(radix(&lo) <= radix(&hi));
    }

    #[test]
    fn prop_single_insert_sorts_and_preserves_keys(
        keys in prop::collection::vec(letter_key_strategy(6), 0..300)
    ) {
        let mut index = BucketIndex::new(keys.len()).unwrap();
        for k in &keys {
            index.add(k).unwrap();
        }
        index.sort();

        let actual: Vec<&[u8]> = index.iter().collect();
        let mut expected: Vec<&[u8]> = keys.iter().map(|k| k.as_slice()).collect();
        expected.sort_unstable();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_bulk_and_single_paths_agree(text in narrow_text_strategy(400)) {
        let mut bulk = BucketIndex::new(text.len()).unwrap();
        bulk.add_suffixes(&text).unwrap();
        bulk.sort();

        let mut single = BucketIndex::new(text.len()).unwrap();
        for i in 0..text.len() {
            single.add(&text[i..]).unwrap();
        }
        single.sort();

        let from_bulk: Vec<&[u8]> = bulk.iter().collect();
        let from_single: Vec<&[u8]> = single.iter().collect();
        prop_assert_eq!(&from_bulk, &from_single);
        prop_assert!(from_bulk.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(from_bulk.len(), text.len());
    }

    #[test]
    fn prop_suffix_sort_matches_comparison_sort(
        text in prop::collection::vec(any::<u8>(), 0..300)
    ) {
        let mut expected: Vec<usize> = (0..text.len()).collect();
        expected.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        prop_assert_eq!(suffix_sort(&text).unwrap(), expected);
    }

    #[test]
    fn prop_worker_count_does_not_change_output(
        text in narrow_text_strategy(200),
        workers in 1usize..6,
    ) {
        let config = IndexConfig::new(text.len())
            .with_workers(workers)
            .with_arena_sizing(ArenaSizing::Exact);
        let mut index = BucketIndex::with_config(config).unwrap();
        index.add_suffixes(&text).unwrap();
        index.sort();

        let offsets: Vec<usize> = index.iter().map(|s| text.len() - s.len()).collect();
        prop_assert_eq!(offsets, suffix_sort(&text).unwrap());
    }
}
