use lexbucket::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Keys of arbitrary bytes share coarse buckets; full iteration must still
// match a byte-wise sort.
#[test]
fn test_arbitrary_bytes() {
    let mut rng = StdRng::seed_from_u64(42);

    for _iter in 0..10 {
        let len = rng.random_range(2000..5000);
        let mut input: Vec<Vec<u8>> = Vec::new();

        for _ in 0..len {
            let row_len = rng.random_range(0..5); // Keep short to hit terminator digits
            let mut row = vec![0u8; row_len];
            rng.fill(&mut row[..]);
            input.push(row);
        }

        let actual = bucket_sort(&input).unwrap();

        let mut expected: Vec<&[u8]> = input.iter().map(|r| r.as_slice()).collect();
        expected.sort_unstable();

        if actual != expected {
            // Find first mismatch
            for (i, (a, b)) in actual.iter().zip(expected.iter()).enumerate() {
                if a != b {
                    panic!("Mismatch at index {}: Got {:?}, Expected {:?}", i, a, b);
                }
            }
            panic!(
                "Lengths differ? Actual: {}, Expected: {}",
                actual.len(),
                expected.len()
            );
        }
    }
}

#[test]
fn test_punctuation_between_cases() {
    let text = b"a_b a[b a`b aZb azb a{b a~b";
    let offsets = suffix_sort(text).unwrap();

    let mut expected: Vec<usize> = (0..text.len()).collect();
    expected.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
    assert_eq!(offsets, expected);
}
