//! Time and duration conversion utilities.
//!
//! Media elements report positions as floating seconds, while the rest of the
//! crate works in [`Duration`]. These helpers do the conversion with explicit
//! behavior for values a `Duration` cannot hold.

use std::time::Duration;

/// Extension trait for safe Duration conversions.
pub trait DurationExt {
    /// Convert duration to milliseconds as u64, saturating at `u64::MAX`.
    fn as_millis_u64(&self) -> u64;

    /// Fraction of `total` covered by this duration, clamped to `0.0..=1.0`.
    ///
    /// A zero `total` is treated as one second so the result is always finite.
    fn fraction_of(&self, total: Duration) -> f64;
}

impl DurationExt for Duration {
    fn as_millis_u64(&self) -> u64 {
        u64::try_from(self.as_millis()).unwrap_or(u64::MAX)
    }

    fn fraction_of(&self, total: Duration) -> f64 {
        let total = if total.is_zero() {
            Duration::from_secs(1)
        } else {
            total
        };
        (self.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Convert floating seconds reported by a media element into a [`Duration`].
///
/// Returns `None` for negative, NaN or infinite input. Browsers report an
/// unknown media duration as NaN, which this maps to `None`.
#[must_use]
pub fn duration_from_secs_f64(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_millis_u64() {
        let duration = Duration::from_millis(1234);
        assert_eq!(duration.as_millis_u64(), 1234);
    }

    #[test]
    fn test_as_millis_u64_zero() {
        assert_eq!(Duration::ZERO.as_millis_u64(), 0);
    }

    #[test]
    fn test_fraction_of() {
        let position = Duration::from_secs(30);
        let fraction = position.fraction_of(Duration::from_secs(120));
        assert!((fraction - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fraction_of_zero_total_uses_one_second() {
        let half = Duration::from_millis(500).fraction_of(Duration::ZERO);
        assert!((half - 0.5).abs() < f64::EPSILON);

        let past = Duration::from_secs(5).fraction_of(Duration::ZERO);
        assert!((past - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fraction_of_clamped() {
        let over = Duration::from_secs(200).fraction_of(Duration::from_secs(100));
        assert!((over - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duration_from_secs_f64() {
        assert_eq!(duration_from_secs_f64(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(duration_from_secs_f64(0.0), Some(Duration::ZERO));
    }

    #[test]
    fn test_duration_from_secs_f64_invalid() {
        assert_eq!(duration_from_secs_f64(-1.0), None);
        assert_eq!(duration_from_secs_f64(f64::NAN), None);
        assert_eq!(duration_from_secs_f64(f64::INFINITY), None);
    }
}
