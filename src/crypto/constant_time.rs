//! Comparisons between secret-derived and attacker-influenced bytes.
//!
//! Running time depends only on the requested length. Slice lengths are
//! treated as public; byte values never influence control flow.

use subtle::{Choice, ConstantTimeEq};

/// Compare the first `length` bytes of `a` and `b`.
///
/// Returns `false` if either slice is shorter than `length`.
pub fn equals(a: &[u8], b: &[u8], length: usize) -> bool {
    equals_choice(a, b, length).into()
}

/// Like [`equals`] but keeps the result as a [`Choice`] so it can be combined
/// with other secret conditions without branching.
pub fn equals_choice(a: &[u8], b: &[u8], length: usize) -> Choice {
    if a.len() < length || b.len() < length {
        return Choice::from(0);
    }
    a[..length].ct_eq(&b[..length])
}
