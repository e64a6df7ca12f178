//! Sampling density for ground tracks
//!
//! Low orbits sweep across the map quickly and need many points per day;
//! high orbits barely move relative to the ground. This is a plotting knob,
//! not an integration accuracy requirement: the integrator picks its own
//! steps regardless of how many output samples are requested.

const BASE_STEPS_PER_DAY: f64 = 96.0;
const ALTITUDE_SCALE_KM: f64 = 2000.0;
const MIN_STEPS_PER_DAY: u32 = 6;

/// Ground-track samples per day for an orbit at `altitude_km`
///
/// `max(6, round(96 / (1 + altitude / 2000)))`. Negative (or NaN) altitudes
/// are treated as zero.
pub fn steps_per_day(altitude_km: f64) -> u32 {
    let altitude = altitude_km.max(0.0);
    let steps = (BASE_STEPS_PER_DAY / (1.0 + altitude / ALTITUDE_SCALE_KM)).round() as u32;
    steps.max(MIN_STEPS_PER_DAY)
}

/// Samples to request for a span of `duration_days` at `altitude_km`
///
/// Never fewer than two, so the span's end points are always present.
pub fn recommended_sample_count(altitude_km: f64, duration_days: f64) -> usize {
    let samples = (steps_per_day(altitude_km) as f64 * duration_days.abs()).ceil();
    if samples.is_finite() {
        (samples as usize).max(2)
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 96)]
    #[case(2000.0, 48)]
    #[case(400.0, 80)]
    #[case(20_200.0, 9)]
    #[case(35_786.0, 6)]
    #[case(400_000.0, 6)]
    #[case(-50.0, 96)]
    fn test_steps_per_day(#[case] altitude: f64, #[case] expected: u32) {
        assert_eq!(steps_per_day(altitude), expected);
    }

    #[test]
    fn test_steps_per_day_is_non_increasing() {
        let mut previous = steps_per_day(0.0);
        for i in 1..=5000 {
            let current = steps_per_day(i as f64 * 10.0);
            assert!(current <= previous, "increase at {} km", i * 10);
            assert!(current >= 6);
            previous = current;
        }
    }

    #[test]
    fn test_recommended_sample_count() {
        assert_eq!(recommended_sample_count(0.0, 1.0), 96);
        assert_eq!(recommended_sample_count(2000.0, 2.5), 120);
        assert_eq!(recommended_sample_count(2000.0, -2.5), 120);
        assert_eq!(recommended_sample_count(35_786.0, 0.01), 2);
        assert_eq!(recommended_sample_count(400.0, f64::NAN), 2);
    }
}
