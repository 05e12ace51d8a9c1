//! Round execution module.
//!
//! Everything needed to run a single wager round: the deterministic RNG
//! that fixes the crash point at start, the elapsed-time multiplier
//! curve, and the tiered crash-point draw.

mod curve;
mod outcome;

pub use curve::multiplier_at_bp;
pub use outcome::crash_point_bp;

use commonware_cryptography::{
    sha256::{Digest, Sha256},
    Hasher,
};

/// Deterministic random number generator for round outcomes.
///
/// Uses SHA256 hash chains to derive the crash point and salt from the
/// entropy captured when the round starts, so the outcome is fixed
/// before the round begins ticking.
#[derive(Clone)]
pub struct RoundRng {
    state: [u8; 32],
    index: usize,
}

impl RoundRng {
    /// Create a new RNG from round entropy and a session ID.
    pub fn new(entropy: &[u8; 32], session_id: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(entropy);
        hasher.update(&session_id.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    /// Get the next random byte.
    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u64 value.
    pub fn next_u64(&mut self) -> u64 {
        let mut value = 0u64;
        for _ in 0..8 {
            value = (value << 8) | self.next_byte() as u64;
        }
        value
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        // Simple rejection sampling for unbiased distribution
        let limit = u64::MAX - (u64::MAX % max);
        loop {
            let value = self.next_u64();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Draw a fresh salt for the round commitment.
    pub fn salt(&mut self) -> Digest {
        let mut bytes = [0u8; 32];
        for byte in bytes.iter_mut() {
            *byte = self.next_byte();
        }
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hasher.finalize()
    }
}

/// Compute the commitment published when a round starts:
/// sha256(session_id || crash_point_bp || salt).
///
/// Revealing the crash point and salt at settlement lets anyone check
/// the outcome was fixed before the round began.
pub fn commitment(session_id: u64, crash_point_bp: u64, salt: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(&session_id.to_be_bytes());
    hasher.update(&crash_point_bp.to_be_bytes());
    hasher.update(salt);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let entropy = [7u8; 32];
        let mut a = RoundRng::new(&entropy, 1);
        let mut b = RoundRng::new(&entropy, 1);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rng_session_separation() {
        let entropy = [7u8; 32];
        let mut a = RoundRng::new(&entropy, 1);
        let mut b = RoundRng::new(&entropy, 2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_bounded_in_range() {
        let mut rng = RoundRng::new(&[3u8; 32], 9);
        for _ in 0..1_000 {
            assert!(rng.next_bounded(37) < 37);
        }
        assert_eq!(rng.next_bounded(0), 0);
    }

    #[test]
    fn test_commitment_binds_inputs() {
        let mut rng = RoundRng::new(&[5u8; 32], 4);
        let salt = rng.salt();
        let base = commitment(4, 12_345, &salt);
        assert_eq!(base, commitment(4, 12_345, &salt));
        assert_ne!(base, commitment(5, 12_345, &salt));
        assert_ne!(base, commitment(4, 12_346, &salt));

        let other_salt = rng.salt();
        assert_ne!(salt, other_salt);
        assert_ne!(base, commitment(4, 12_345, &other_salt));
    }
}
