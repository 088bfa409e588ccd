// crates/queue/src/backoff.rs
//! `backoff(attempts) = min(ceiling, base * 2^attempts) + jitter`,
//! jitter drawn uniformly from `[0, base)` so retries of the same job
//! don't all wake at the same instant.

use rand::Rng;
use std::time::Duration;

pub fn backoff(attempts: u32, base_seconds: u64, ceiling_seconds: u64) -> Duration {
    let exp = attempts.min(20);
    let scaled = base_seconds.saturating_mul(1u64 << exp);
    let bounded = scaled.min(ceiling_seconds);
    let jitter = rand::thread_rng().gen_range(0..base_seconds.max(1));
    Duration::from_secs(bounded.saturating_add(jitter).min(ceiling_seconds + base_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_never_exceeds_ceiling_plus_base_jitter() {
        for attempts in 0..30 {
            let d = backoff(attempts, 1, 300);
            assert!(d.as_secs() <= 300 + 1, "attempts={attempts} produced {d:?}");
        }
    }

    #[test]
    fn backoff_grows_with_attempts_until_the_ceiling() {
        let early = backoff(1, 1, 300).as_secs();
        let later = backoff(6, 1, 300).as_secs();
        assert!(later >= early);
    }

    #[test]
    fn backoff_saturates_at_ceiling_for_large_attempt_counts() {
        let d = backoff(63, 1, 300);
        assert!(d.as_secs() <= 301);
    }

    #[test]
    fn zero_attempts_is_roughly_base() {
        let d = backoff(0, 1, 300);
        assert!(d.as_secs() <= 2);
    }
}
