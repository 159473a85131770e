//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before poll number `attempt` (0-based).
///
/// The first poll goes out after `base_ms`; each later one doubles, capped
/// at `max_ms`, plus up to 10% jitter so concurrent sessions spread out.
pub fn poll_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let factor = 2u64.saturating_pow(attempt.min(32));
    let capped = base_ms.saturating_mul(factor).min(max_ms);

    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}
