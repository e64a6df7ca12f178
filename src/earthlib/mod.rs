//! Earth model: reference ellipsoid, gravity constants and geodetic conversions
//!
//! The ellipsoid is WGS84 (equatorial radius and flattening). All functions
//! here are stateless; the constants are process-wide and never change.

use crate::constants::{EARTH_FLATTENING, EARTH_J2, EARTH_MASS_KG, EARTH_RADIUS_EQ_KM, G_KM};
use crate::coordinates::GeodeticPoint;
use nalgebra::Vector3;

/// Earth's gravitational parameter (G * M) in km^3/s^2
pub const MU_EARTH: f64 = G_KM * EARTH_MASS_KG;

/// First eccentricity squared of the reference ellipsoid
pub const ECCENTRICITY_SQUARED: f64 = 2.0 * EARTH_FLATTENING - EARTH_FLATTENING * EARTH_FLATTENING;

/// Number of latitude refinements performed by [`ecef_to_geodetic`]
pub const GEODETIC_ITERATIONS: usize = 5;

/// Earth's gravitational parameter in km^3/s^2
pub fn gravitational_parameter() -> f64 {
    MU_EARTH
}

/// Second zonal harmonic coefficient
pub fn j2() -> f64 {
    EARTH_J2
}

/// Prime-vertical radius of curvature at a latitude (radians), in km
///
/// `Req / sqrt(1 - e² sin²(lat))`. The propagator uses this as the reference
/// radius of the J2 term, evaluated at the satellite's geocentric latitude.
/// It is not the distance from the geocenter to the ellipsoid surface.
pub fn geodetic_radius(latitude_rad: f64) -> f64 {
    let sin_lat = latitude_rad.sin();
    EARTH_RADIUS_EQ_KM / (1.0 - ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt()
}

/// Convert an Earth-fixed position (km) to geodetic latitude/longitude
///
/// Longitude comes straight from `atan2(y, x)` and lies in (-180, 180].
/// Latitude is seeded with `atan2(z, p (1 - e²))` and refined a fixed
/// [`GEODETIC_ITERATIONS`] times; no convergence test is made. Each pass
/// shrinks the error by roughly a factor e² (~0.0067), so five passes are far
/// below a micro-degree anywhere outside the polar axis. On the axis itself
/// (`p == 0`) the latitude is ±90 and the longitude is meaningless. Non-finite
/// inputs propagate to non-finite outputs instead of raising.
pub fn ecef_to_geodetic(position: &Vector3<f64>) -> GeodeticPoint {
    let (x, y, z) = (position.x, position.y, position.z);

    let longitude = y.atan2(x);

    let p = (x * x + y * y).sqrt();
    let mut latitude = z.atan2(p * (1.0 - ECCENTRICITY_SQUARED));
    for _ in 0..GEODETIC_ITERATIONS {
        let n = geodetic_radius(latitude);
        latitude = (z + ECCENTRICITY_SQUARED * n * latitude.sin()).atan2(p);
    }

    GeodeticPoint::new(latitude.to_degrees(), longitude.to_degrees())
}

/// Convert geodetic coordinates and ellipsoidal height (km) to an Earth-fixed position (km)
pub fn geodetic_to_ecef(point: &GeodeticPoint, altitude_km: f64) -> Vector3<f64> {
    let lat = point.latitude_rad();
    let lon = point.longitude_rad();
    let n = geodetic_radius(lat);

    Vector3::new(
        (n + altitude_km) * lat.cos() * lon.cos(),
        (n + altitude_km) * lat.cos() * lon.sin(),
        (n * (1.0 - ECCENTRICITY_SQUARED) + altitude_km) * lat.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;

    #[test]
    fn test_gravitational_parameter() {
        // G * M with the constants above, close to the WGS84 398600.4418
        assert_relative_eq!(gravitational_parameter(), 398_589.2, max_relative = 1e-6);
        assert_relative_eq!(gravitational_parameter(), 398_600.4418, max_relative = 1e-4);
    }

    #[test]
    fn test_geodetic_radius() {
        assert_relative_eq!(geodetic_radius(0.0), EARTH_RADIUS_EQ_KM, epsilon = 1e-12);

        // At the pole the prime-vertical radius is a / sqrt(1 - e²) ≈ 6399.594 km
        let polar = geodetic_radius(std::f64::consts::FRAC_PI_2);
        assert_abs_diff_eq!(polar, 6_399.593_6, epsilon = 1e-3);

        // Symmetric in latitude and increasing toward the poles
        assert_relative_eq!(geodetic_radius(0.7), geodetic_radius(-0.7), epsilon = 1e-12);
        assert!(geodetic_radius(0.7) > geodetic_radius(0.3));
    }

    #[test]
    fn test_equator_and_prime_meridian() {
        let p = ecef_to_geodetic(&Vector3::new(EARTH_RADIUS_EQ_KM, 0.0, 0.0));
        assert_abs_diff_eq!(p.latitude_deg, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.longitude_deg, 0.0, epsilon = 1e-12);

        let p = ecef_to_geodetic(&Vector3::new(0.0, 7000.0, 0.0));
        assert_abs_diff_eq!(p.longitude_deg, 90.0, epsilon = 1e-12);

        let p = ecef_to_geodetic(&Vector3::new(-7000.0, -1e-9, 0.0));
        assert_abs_diff_eq!(p.longitude_deg.abs(), 180.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(-89.0, -170.0, 0.0)]
    #[case(-45.0, -60.0, 0.0)]
    #[case(0.0, 0.0, 0.0)]
    #[case(12.5, 100.0, 0.0)]
    #[case(51.6, -0.1, 0.0)]
    #[case(89.0, 179.0, 0.0)]
    #[case(-60.0, 45.0, 420.0)]
    #[case(33.3, -120.0, 420.0)]
    #[case(75.0, 10.0, 35_786.0)]
    fn test_geodetic_round_trip(#[case] lat: f64, #[case] lon: f64, #[case] alt: f64) {
        let ecef = geodetic_to_ecef(&GeodeticPoint::new(lat, lon), alt);
        let back = ecef_to_geodetic(&ecef);
        assert_abs_diff_eq!(back.latitude_deg, lat, epsilon = 1e-7);
        assert_abs_diff_eq!(back.longitude_deg, lon, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_degrades_silently() {
        let p = ecef_to_geodetic(&Vector3::new(f64::NAN, 0.0, 0.0));
        assert!(p.latitude_deg.is_nan());
    }
}
