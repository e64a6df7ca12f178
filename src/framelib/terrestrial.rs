//! Rotation from the inertial (ECI) frame to the Earth-fixed (ECEF) frame
//!
//! The Earth's orientation is reduced to a single angle about the polar
//! axis: Greenwich Mean Sidereal Time from the secular polynomial in
//! centuries since J2000. Polar motion, precession and nutation are not
//! modeled. The resulting frame is good for drawing ground tracks and is
//! not suitable for precision geodesy.

use crate::time::JulianDate;
use nalgebra::{Matrix3, Rotation3, Vector3};

const GMST_AT_J2000_DEG: f64 = 280.460_618_37;
const GMST_RATE_DEG_PER_DAY: f64 = 360.985_647_366_29;
const GMST_T2_DEG: f64 = 0.000_387_933;
const GMST_T3_DIVISOR: f64 = 38_710_000.0;

/// Greenwich Mean Sidereal Time in degrees, reduced to [0, 360)
pub fn gmst_degrees(jd: JulianDate) -> f64 {
    let days = jd.days_since_j2000();
    let t = jd.centuries_since_j2000();

    let gmst = GMST_AT_J2000_DEG + GMST_RATE_DEG_PER_DAY * days + GMST_T2_DEG * t * t
        - t * t * t / GMST_T3_DIVISOR;
    gmst.rem_euclid(360.0)
}

/// Greenwich Mean Sidereal Time in radians, reduced to [0, 2π)
pub fn gmst_radians(jd: JulianDate) -> f64 {
    gmst_degrees(jd).to_radians()
}

/// Rotation taking ECI vectors to ECEF vectors at the given instant
pub fn eci_to_ecef_rotation(jd: JulianDate) -> Rotation3<f64> {
    // The Earth-fixed frame leads the inertial one by GMST, so vectors rotate by -GMST
    Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst_radians(jd))
}

/// 3x3 matrix form of [`eci_to_ecef_rotation`]
pub fn eci_to_ecef_matrix(jd: JulianDate) -> Matrix3<f64> {
    eci_to_ecef_rotation(jd).into_inner()
}

/// Rotate an ECI position into the ECEF frame
pub fn eci_to_ecef(position: &Vector3<f64>, jd: JulianDate) -> Vector3<f64> {
    eci_to_ecef_rotation(jd) * position
}
