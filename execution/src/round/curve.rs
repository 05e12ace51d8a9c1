use liftoff_types::game::{BASIS_POINTS, MAX_MULTIPLIER_BP};

/// Multiplier (in basis points) at `elapsed_ms` milliseconds into a round.
///
/// The curve is 1 + 0.05t + 0.005t^2 for t in seconds, expressed in
/// integer basis points: 10_000 + elapsed_ms / 2 + elapsed_ms^2 / 20_000.
/// It starts at exactly 1.00x, reaches 2.00x at 10s and 7.00x at 30s,
/// and is clamped at [MAX_MULTIPLIER_BP] (15.00x, around 48s in).
pub fn multiplier_at_bp(elapsed_ms: u64) -> u64 {
    let t = elapsed_ms as u128;
    let raw = BASIS_POINTS as u128 + t / 2 + (t * t) / 20_000;
    if raw >= MAX_MULTIPLIER_BP as u128 {
        MAX_MULTIPLIER_BP
    } else {
        raw as u64
    }
}
