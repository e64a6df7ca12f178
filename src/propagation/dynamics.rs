//! Equations of motion for an Earth satellite
//!
//! The state is the six-vector `[x, y, z, vx, vy, vz]` in km and km/s.
//! Its derivative is `[v, a(r)]` where the acceleration is point-mass
//! gravity plus, optionally, the J2 oblateness correction.

use crate::constants::MIN_POSITION_NORM_KM;
use crate::earthlib::{self, MU_EARTH};
use crate::{Result, SkytrackError};
use nalgebra::{Vector3, Vector6};

/// Right-hand side of a first-order ODE in six variables
///
/// Implementations must be pure: the same `(t, y)` always yields the same
/// derivative. `Send + Sync` so independent propagations can run on
/// separate threads.
pub trait EquationsOfMotion: Send + Sync {
    /// Time derivative of `y` at elapsed time `t` (seconds)
    fn derivative(&self, t: f64, y: &Vector6<f64>) -> Result<Vector6<f64>>;
}

/// Earth gravity: point mass with an optional J2 term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthGravity {
    j2_enabled: bool,
}

impl EarthGravity {
    /// Gravity model with the J2 term switched on or off
    pub fn new(j2_enabled: bool) -> Self {
        Self { j2_enabled }
    }

    /// Pure two-body gravity
    pub fn point_mass() -> Self {
        Self::new(false)
    }

    /// Point mass plus J2
    pub fn with_j2() -> Self {
        Self::new(true)
    }

    pub fn j2_enabled(&self) -> bool {
        self.j2_enabled
    }

    /// Total gravitational acceleration at an ECI position (km/s²)
    pub fn acceleration(&self, position: &Vector3<f64>) -> Result<Vector3<f64>> {
        let r = position.norm();
        if !(r >= MIN_POSITION_NORM_KM) {
            return Err(SkytrackError::InvalidState(format!(
                "position magnitude {:.3e} km is at the geocenter",
                r
            )));
        }

        let mut accel = point_mass_acceleration(position, r);
        if self.j2_enabled {
            accel += j2_acceleration(position, r);
        }
        Ok(accel)
    }
}

impl Default for EarthGravity {
    fn default() -> Self {
        Self::with_j2()
    }
}

impl EquationsOfMotion for EarthGravity {
    fn derivative(&self, _t: f64, y: &Vector6<f64>) -> Result<Vector6<f64>> {
        let position = Vector3::new(y[0], y[1], y[2]);
        let accel = self.acceleration(&position)?;

        let dy = Vector6::new(y[3], y[4], y[5], accel.x, accel.y, accel.z);
        if dy.iter().any(|v| !v.is_finite()) {
            return Err(SkytrackError::DivergedIntegration(format!(
                "non-finite derivative at r={:?}",
                position
            )));
        }
        Ok(dy)
    }
}

/// Point-mass acceleration `-μ r / |r|³`
fn point_mass_acceleration(position: &Vector3<f64>, r: f64) -> Vector3<f64> {
    -MU_EARTH / (r * r * r) * position
}

/// J2 acceleration correction
///
/// The reference radius is the prime-vertical radius of curvature at the
/// satellite's geocentric latitude `asin(z / r)`, not the equatorial radius.
fn j2_acceleration(position: &Vector3<f64>, r: f64) -> Vector3<f64> {
    let (x, y, z) = (position.x, position.y, position.z);

    let latitude = (z / r).asin();
    let re = earthlib::geodetic_radius(latitude);

    let r2 = r * r;
    let r5 = r2 * r2 * r;
    let r7 = r5 * r2;
    let z2 = z * z;

    // (1/2) μ J2 Re²
    let factor = 0.5 * MU_EARTH * earthlib::j2() * re * re;

    Vector3::new(
        factor * (15.0 * x * z2 / r7 - 3.0 * x / r5),
        factor * (15.0 * y * z2 / r7 - 3.0 * y / r5),
        factor * (15.0 * z2 * z / r7 - 9.0 * z / r5),
    )
}
