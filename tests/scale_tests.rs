use lexbucket::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

fn random_letters(len: usize, seed: u64) -> Vec<u8> {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| LETTERS[rng.random_range(0..LETTERS.len())])
        .collect()
}

fn check_suffixes(len: usize) {
    println!("Generating {} random letters...", len);
    let text = random_letters(len, 7);

    let start = Instant::now();
    let config = IndexConfig::new(text.len()).with_arena_sizing(ArenaSizing::Exact);
    let mut index = BucketIndex::with_config(config).unwrap();
    index.add_suffixes(&text).unwrap();
    index.sort();
    println!("Bucket sorted {} suffixes in {:?}", len, start.elapsed());

    let stats = index.stats();
    assert_eq!(stats.escaped_buckets, 0);
    assert_eq!(stats.arena_used, len);

    let start = Instant::now();
    let mut expected: Vec<&[u8]> = (0..text.len()).map(|i| &text[i..]).collect();
    expected.sort_unstable();
    println!("sort_unstable took {:?}", start.elapsed());

    let mut iter = index.iter();
    for (i, want) in expected.iter().enumerate() {
        let got = iter.next().unwrap_or_else(|| panic!("ran out at index {}", i));
        // Same suffix means same start pointer.
        assert_eq!(got.as_ptr(), want.as_ptr(), "Inconsistency at index {}", i);
    }
    assert!(iter.next().is_none());
}

#[test]
fn test_suffixes_1m() {
    check_suffixes(1024 * 1024);
}

#[test]
#[ignore]
fn test_suffixes_16m() {
    // Needs roughly 1GB of RAM for the index and the reference sort.
    check_suffixes(16 * 1024 * 1024);
}

#[test]
fn test_discrete_keys_1m() {
    let count = 1_000_000;
    let mut rng = rand::rng();
    let input: Vec<Vec<u8>> = (0..count)
        .map(|_| {
            let len = rng.random_range(1..12);
            (0..len).map(|_| rng.random_range(b'a'..=b'z')).collect()
        })
        .collect();

    let start = Instant::now();
    let mut index = BucketIndex::new(count).unwrap();
    for key in &input {
        index.add(key).unwrap();
    }
    index.sort();
    println!("Sorted 1M keys in {:?}", start.elapsed());

    assert_eq!(index.len(), count);
    let sorted: Vec<&[u8]> = index.iter().collect();
    assert_eq!(sorted.len(), count);
    for i in 0..count - 1 {
        assert!(sorted[i] <= sorted[i + 1], "Sort failed at index {}", i);
    }
}
