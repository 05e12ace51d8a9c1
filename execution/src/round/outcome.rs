use super::RoundRng;
use liftoff_types::game::{MAX_MULTIPLIER_BP, MIN_CRASH_BP};

/// Crash-point tiers: (cumulative weight out of 10_000, low bp, high bp).
/// Within a tier the crash point is uniform over [low, high).
const TIERS: [(u64, u64, u64); 4] = [
    // 70%: bust territory, 1.00x - 1.50x
    (7_000, MIN_CRASH_BP, 15_000),
    // 20%: 1.50x - 2.50x
    (9_000, 15_000, 25_000),
    // 7%: 2.50x - 5.00x
    (9_700, 25_000, 50_000),
    // 3%: 5.00x - 15.00x
    (10_000, 50_000, MAX_MULTIPLIER_BP),
];

/// Draw the crash point (in basis points) for a round.
pub fn crash_point_bp(rng: &mut RoundRng) -> u64 {
    let roll = rng.next_bounded(10_000);
    for (weight, low, high) in TIERS {
        if roll < weight {
            return low + rng.next_bounded(high - low);
        }
    }
    unreachable!("roll is bounded by the last tier weight");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_point_in_range() {
        let mut rng = RoundRng::new(&[1u8; 32], 0);
        for _ in 0..10_000 {
            let crash = crash_point_bp(&mut rng);
            assert!((MIN_CRASH_BP..MAX_MULTIPLIER_BP).contains(&crash));
        }
    }

    #[test]
    fn test_crash_point_deterministic() {
        let entropy = [2u8; 32];
        let mut a = RoundRng::new(&entropy, 42);
        let mut b = RoundRng::new(&entropy, 42);
        for _ in 0..100 {
            assert_eq!(crash_point_bp(&mut a), crash_point_bp(&mut b));
        }
    }

    #[test]
    fn test_tier_distribution() {
        let mut rng = RoundRng::new(&[9u8; 32], 7);
        let mut counts = [0usize; 4];
        for _ in 0..10_000 {
            let crash = crash_point_bp(&mut rng);
            let tier = match crash {
                c if c < 15_000 => 0,
                c if c < 25_000 => 1,
                c if c < 50_000 => 2,
                _ => 3,
            };
            counts[tier] += 1;
        }

        // Generous bounds around the 70/20/7/3 split
        assert!((6_800..7_200).contains(&counts[0]), "{counts:?}");
        assert!((1_800..2_200).contains(&counts[1]), "{counts:?}");
        assert!((560..840).contains(&counts[2]), "{counts:?}");
        assert!((215..385).contains(&counts[3]), "{counts:?}");
    }
}
