//! Geodetic latitude/longitude on the reference ellipsoid

use serde::{Deserialize, Serialize};

/// Sub-satellite point in geodetic coordinates
///
/// Latitude lies in [-90, 90] degrees. Longitude is reported in
/// [-180, 180] degrees; [`GeodeticPoint::wrapped`] reduces it to the
/// half-open range [-180, 180) used for ground-track plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    /// Geodetic latitude in degrees
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive
    pub longitude_deg: f64,
}

impl GeodeticPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        GeodeticPoint {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Same point with its longitude reduced to [-180, 180)
    pub fn wrapped(&self) -> Self {
        GeodeticPoint {
            latitude_deg: self.latitude_deg,
            longitude_deg: wrap_longitude(self.longitude_deg),
        }
    }

    /// Latitude in radians
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    /// Longitude in radians
    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

/// Reduce a longitude in degrees to [-180, 180)
pub fn wrap_longitude(longitude_deg: f64) -> f64 {
    let wrapped = (longitude_deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(179.5, 179.5)]
    #[case(180.0, -180.0)]
    #[case(-180.0, -180.0)]
    #[case(190.0, -170.0)]
    #[case(-190.0, 170.0)]
    #[case(725.0, 5.0)]
    fn test_wrap_longitude(#[case] input: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(wrap_longitude(input), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_wrapped_keeps_latitude() {
        let p = GeodeticPoint::new(51.6, 200.0).wrapped();
        assert_eq!(p.latitude_deg, 51.6);
        assert_abs_diff_eq!(p.longitude_deg, -160.0, epsilon = 1e-9);
    }
}
