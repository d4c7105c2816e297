//! Quantized duration nudges.
//!
//! Minute-scale nudges snap the total to whole minutes, fine nudges snap it
//! to the 30-second grid. Rounding is half-up (ties go toward +inf).

const COARSE_THRESHOLD_MS: u64 = 60_000;

/// New total after nudging `current_total_ms` by `delta_ms`, floored at 0.
pub fn adjusted_total_ms(current_total_ms: u64, delta_ms: i64) -> u64 {
    let current_secs = i64::try_from(current_total_ms / 1000).unwrap_or(i64::MAX);

    let new_secs = if delta_ms.unsigned_abs() >= COARSE_THRESHOLD_MS {
        let minutes = round_half_up(current_secs, 60);
        let delta_minutes = round_half_up(delta_ms, 60_000);
        minutes.saturating_add(delta_minutes).saturating_mul(60)
    } else {
        let snapped = round_half_up(current_secs, 30).saturating_mul(30);
        let delta_snapped = round_half_up(delta_ms, 30_000).saturating_mul(30);
        snapped.saturating_add(delta_snapped)
    };

    u64::try_from(new_secs.max(0))
        .unwrap_or(0)
        .saturating_mul(1000)
}

/// `n / d` rounded to the nearest integer, ties upward. `d` must be positive.
fn round_half_up(n: i64, d: i64) -> i64 {
    n.saturating_mul(2).saturating_add(d).div_euclid(2 * d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn minute_nudge_rounds_then_adds() {
        // 1:30 rounds up to 2:00, plus one minute.
        assert_eq!(adjusted_total_ms(90_000, 60_000), 180_000);
        assert_eq!(adjusted_total_ms(300_000, -60_000), 240_000);
    }

    #[test]
    fn minute_nudge_floors_at_zero() {
        assert_eq!(adjusted_total_ms(20_000, -60_000), 0);
        assert_eq!(adjusted_total_ms(0, -300_000), 0);
    }

    #[test]
    fn half_minute_nudge() {
        assert_eq!(adjusted_total_ms(60_000, 30_000), 90_000);
        assert_eq!(adjusted_total_ms(100_000, -30_000), 60_000);
    }

    #[test]
    fn small_nudge_only_snaps() {
        assert_eq!(adjusted_total_ms(60_000, 10_000), 60_000);
        assert_eq!(adjusted_total_ms(70_000, -10_000), 60_000);
        assert_eq!(adjusted_total_ms(75_000, 10_000), 90_000);
    }

    #[test]
    fn ties_round_upward() {
        assert_eq!(round_half_up(-90_000, 60_000), -1);
        assert_eq!(round_half_up(90, 60), 2);
        assert_eq!(round_half_up(15_000, 30_000), 1);
    }

    proptest! {
        #[test]
        fn coarse_results_are_whole_minutes(total in 0u64..100_000_000, delta in 60_000i64..10_000_000, down in any::<bool>()) {
            let delta = if down { -delta } else { delta };
            prop_assert_eq!(adjusted_total_ms(total, delta) % 60_000, 0);
        }

        #[test]
        fn fine_results_sit_on_half_minute_grid(total in 0u64..100_000_000, delta in -59_999i64..60_000) {
            prop_assert_eq!(adjusted_total_ms(total, delta) % 30_000, 0);
        }
    }
}
