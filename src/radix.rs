//! Prefix radix of a key.
//!
//! Each byte maps to a 6-bit digit through [`DIGITS`]; the first
//! [`CHARS_IN_HASH`] digits form a base-64 number. Absent characters and
//! every byte below `'A'` map to digit 0, so a shorter key lands in a lower
//! bucket than any longer key sharing its prefix. Hashing stops after the
//! first digit that is not a letter; later positions read as 0.
//!
//! The table is monotone over all 256 byte values:
//!
//! | bytes            | digit    |
//! |------------------|----------|
//! | end, `..'A'`     | 0        |
//! | `'A'..='Z'`      | 1..=26   |
//! | `'['..='\x60'`   | 27       |
//! | `'a'..='z'`      | 28..=53  |
//! | `'{'..`          | 54       |
//!
//! Since `a <= b` byte-wise implies `DIGITS[a] <= DIGITS[b]`, bucket order
//! never contradicts lexicographic order, whatever bytes a key contains.
//! Non-letters only make buckets coarser.

use crate::core::{BUCKET_COUNT, CHARS_IN_HASH, DIGIT_BITS};

/// Digit of a byte that acts as the end of the hashed prefix.
pub const TERMINATOR_DIGIT: u8 = 0;

/// Digit shared by the bytes between `'Z'` and `'a'`.
const MID_PUNCT_DIGIT: u8 = 27;

/// Digit shared by every byte above `'z'`.
const HIGH_DIGIT: u8 = 54;

const fn build_digits() -> [u8; 256] {
    let mut table = [TERMINATOR_DIGIT; 256];
    let mut b = 0usize;
    while b < 256 {
        let ch = b as u8;
        table[b] = if ch < b'A' {
            TERMINATOR_DIGIT
        } else if ch <= b'Z' {
            ch - b'A' + 1
        } else if ch < b'a' {
            MID_PUNCT_DIGIT
        } else if ch <= b'z' {
            ch - b'a' + MID_PUNCT_DIGIT + 1
        } else {
            HIGH_DIGIT
        };
        b += 1;
    }
    table
}

/// Byte-to-digit lookup table, evaluated at compile time.
pub static DIGITS: [u8; 256] = build_digits();

/// Digit of a single byte.
#[inline(always)]
pub fn digit(byte: u8) -> u8 {
    DIGITS[byte as usize]
}

/// Returns `true` when `digit` identifies exactly one byte (an ASCII letter).
#[inline(always)]
pub(crate) fn is_letter_digit(digit: u8) -> bool {
    digit != TERMINATOR_DIGIT && digit != MID_PUNCT_DIGIT && digit != HIGH_DIGIT
}

/// Computes the bucket index of `key` from its first [`CHARS_IN_HASH`] bytes.
///
/// The result is always in `[0, BUCKET_COUNT)`. Empty keys and keys starting
/// below `'A'` go to bucket 0.
///
/// # Examples
///
/// ```
/// use lexbucket::radix::radix;
///
/// assert_eq!(radix(b""), 0);
/// assert!(radix(b"a") < radix(b"aa"));
/// assert!(radix(b"aZ") < radix(b"aa"));
/// assert_eq!(radix(b"banana"), radix(b"ban"));
/// ```
#[inline(always)]
pub fn radix(key: &[u8]) -> u32 {
    let mut res = 0u32;
    for pos in 0..CHARS_IN_HASH {
        let d = key.get(pos).map_or(TERMINATOR_DIGIT, |&b| digit(b));
        res = (res << DIGIT_BITS) | d as u32;
        if !is_letter_digit(d) {
            // Bytes behind a shared digit must not refine the bucket.
            return res << (DIGIT_BITS * (CHARS_IN_HASH - 1 - pos) as u32);
        }
    }
    debug_assert!((res as usize) < BUCKET_COUNT);
    res
}

/// Number of leading bytes that every key in bucket `radix` has in common.
///
/// Letter digits pin down their byte exactly; the first non-letter digit
/// (terminator or shared punctuation digit) ends the known prefix.
pub(crate) fn shared_prefix_len(radix: u32) -> usize {
    let mask = (1u32 << DIGIT_BITS) - 1;
    (0..CHARS_IN_HASH)
        .take_while(|&pos| {
            let shift = DIGIT_BITS * (CHARS_IN_HASH - 1 - pos) as u32;
            is_letter_digit(((radix >> shift) & mask) as u8)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_keep_their_order() {
        let letters: Vec<u8> = (b'A'..=b'Z').chain(b'a'..=b'z').collect();
        let digits: Vec<u8> = letters.iter().map(|&b| digit(b)).collect();
        assert_eq!(digits.first(), Some(&1));
        assert_eq!(digits.last(), Some(&53));
        assert!(digits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn table_is_monotone() {
        assert!(DIGITS.windows(2).all(|w| w[0] <= w[1]));
        assert!(DIGITS.iter().all(|&d| (d as u32) < (1 << DIGIT_BITS)));
    }

    #[test]
    fn short_keys_sort_first() {
        assert_eq!(radix(b"B"), 2 << 12);
        assert_eq!(radix(b"BA"), (2 << 12) | (1 << 6));
        assert!(radix(b"B") < radix(b"BA"));
        assert!(radix(b"BA") < radix(b"BAA"));
        assert_eq!(radix(b"BAA"), radix(b"BAAzz"));
    }

    #[test]
    fn non_letter_lead_goes_to_bucket_zero() {
        assert_eq!(radix(b""), 0);
        assert_eq!(radix(b"0abc"), 0);
        assert_eq!(radix(b" zz"), 0);
    }

    #[test]
    fn terminator_digit_ends_prefix() {
        assert_eq!(radix(b"a1z"), radix(b"a"));
        assert_eq!(radix(b"ab-"), radix(b"ab"));
    }

    #[test]
    fn coarse_digit_ends_prefix() {
        assert_eq!(radix(b"A{z"), radix(b"A|"));
        assert_eq!(radix(b"a[z"), radix(b"a_"));
        assert!(radix(b"a") < radix(b"a_"));
        assert!(radix(b"a_") < radix(b"aa"));
    }

    #[test]
    fn shared_prefix_follows_letters() {
        assert_eq!(shared_prefix_len(radix(b"abc")), 3);
        assert_eq!(shared_prefix_len(radix(b"ab")), 2);
        assert_eq!(shared_prefix_len(radix(b"a_c")), 1);
        assert_eq!(shared_prefix_len(radix(b"")), 0);
        assert_eq!(shared_prefix_len(radix(b"~ab")), 0);
    }
}
