//! Bounded exponential backoff with jitter, expressed as a tail-recursive
//! loop with an explicit attempt counter rather than exception-propagated
//! retry.

use rand::Rng;
use std::time::Duration;

/// Base delays for attempts 1..=4: 2s, 4s, 8s, 16s.
const BASE_DELAYS_SECS: [u64; 4] = [2, 4, 8, 16];

/// Delay before retry attempt `attempt` (1-indexed), with up to 1s of
/// jitter added so concurrently-throttled callers don't retry in lockstep.
pub fn backoff_delay(attempt: u32) -> Duration {
    let index = (attempt.saturating_sub(1) as usize).min(BASE_DELAYS_SECS.len() - 1);
    let base = BASE_DELAYS_SECS[index];
    let jitter_ms = rand::thread_rng().gen_range(0..1000);
    Duration::from_secs(base) + Duration::from_millis(jitter_ms)
}
