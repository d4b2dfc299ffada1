//! Polynomial rolling hash over token windows.
//!
//! `h = sum(s[i] * P^(w-1-i)) mod M` with `P = 31` and `M = 10^9 + 9`.
//! Sliding the window is O(1): drop the leading symbol's contribution,
//! multiply by `P`, add the trailing symbol. Collisions are tolerated; the
//! anchor verifier re-checks symbol equality before accepting a match.

use crate::intern::Token;

const BASE: u64 = 31;
const MODULUS: u64 = 1_000_000_009;

/// Hash of a full window, computed directly.
pub(crate) fn window_hash(window: &[Token]) -> u64 {
    window
        .iter()
        .fold(0, |hash, &token| (hash * BASE + u64::from(token.0)) % MODULUS)
}

/// Incrementally maintained hash of a fixed-width window.
///
/// All intermediate products stay below `(M - 1) * P + M`, well within `u64`.
pub(crate) struct RollingHash {
    hash: u64,
    /// `P^(width-1) mod M`, the weight of the window's leading symbol.
    lead_weight: u64,
}

impl RollingHash {
    /// Seeds the hash with the first `window`.
    pub(crate) fn new(window: &[Token]) -> RollingHash {
        let mut lead_weight = 1;
        for _ in 1..window.len() {
            lead_weight = lead_weight * BASE % MODULUS;
        }
        RollingHash {
            hash: window_hash(window),
            lead_weight,
        }
    }

    /// Slides the window one symbol forward: `leading` leaves, `trailing`
    /// enters.
    pub(crate) fn slide(&mut self, leading: Token, trailing: Token) {
        let dropped = u64::from(leading.0) * self.lead_weight % MODULUS;
        self.hash = ((self.hash + MODULUS - dropped) * BASE + u64::from(trailing.0)) % MODULUS;
    }

    pub(crate) fn value(&self) -> u64 {
        self.hash
    }
}
