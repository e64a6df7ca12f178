//! Inertial state vectors and the orbital quantities derived from them

use crate::constants::{EARTH_RADIUS_EQ_KM, MIN_POSITION_NORM_KM, TAU};
use crate::earthlib::MU_EARTH;
use crate::{Result, SkytrackError};
use nalgebra::{Vector3, Vector6};
use serde::{Deserialize, Serialize};

/// Position and velocity of a satellite in the Earth-centered inertial frame
///
/// Position is in km and velocity in km/s. The value is immutable once
/// built; propagation produces new states rather than updating this one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// ECI position (km)
    pub position: Vector3<f64>,
    /// ECI velocity (km/s)
    pub velocity: Vector3<f64>,
}

impl StateVector {
    /// Create a new state vector
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    /// Create from plain `[x, y, z]` / `[vx, vy, vz]` arrays
    pub fn from_arrays(position: [f64; 3], velocity: [f64; 3]) -> Self {
        Self {
            position: Vector3::from(position),
            velocity: Vector3::from(velocity),
        }
    }

    /// Stack into the six-element integration state `[x, y, z, vx, vy, vz]`
    pub fn to_vector6(&self) -> Vector6<f64> {
        Vector6::new(
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        )
    }

    /// Split a six-element integration state back into position and velocity
    pub fn from_vector6(y: &Vector6<f64>) -> Self {
        Self {
            position: y.fixed_rows::<3>(0).into_owned(),
            velocity: y.fixed_rows::<3>(3).into_owned(),
        }
    }

    /// Check that the state can be used as an initial condition
    ///
    /// Non-finite components are an `InvalidArgument`; a position at (or
    /// within a meter of) the geocenter is an `InvalidState`.
    pub fn validate(&self) -> Result<()> {
        if !self.position.iter().chain(self.velocity.iter()).all(|v| v.is_finite()) {
            return Err(SkytrackError::InvalidArgument(format!(
                "state vector has non-finite components: r={:?} v={:?}",
                self.position, self.velocity
            )));
        }
        if self.radius() < MIN_POSITION_NORM_KM {
            return Err(SkytrackError::InvalidState(format!(
                "position magnitude {:.3e} km is at the geocenter",
                self.radius()
            )));
        }
        Ok(())
    }

    /// Distance from the geocenter (km)
    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    /// Orbital speed (km/s)
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Specific mechanical energy (km²/s²), vis-viva
    pub fn specific_energy(&self) -> f64 {
        0.5 * self.velocity.norm_squared() - MU_EARTH / self.radius()
    }

    /// Specific angular momentum vector r × v (km²/s)
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }

    /// Magnitude of the specific angular momentum (km²/s)
    pub fn angular_momentum_norm(&self) -> f64 {
        self.angular_momentum().norm()
    }

    /// Semi-major axis (km), negative for hyperbolic states
    pub fn semi_major_axis(&self) -> f64 {
        -MU_EARTH / (2.0 * self.specific_energy())
    }

    /// Two-body orbital period (s)
    ///
    /// Only bound (elliptical) states have a period; anything else is an
    /// `InvalidState`.
    pub fn period(&self) -> Result<f64> {
        let a = self.semi_major_axis();
        if self.specific_energy() >= 0.0 || !a.is_finite() || a <= 0.0 {
            return Err(SkytrackError::InvalidState(format!(
                "state is not bound (energy {:.6} km²/s²), no orbital period",
                self.specific_energy()
            )));
        }
        Ok(TAU * (a.powi(3) / MU_EARTH).sqrt())
    }

    /// Semi-major axis minus the equatorial radius (km)
    ///
    /// This is the altitude used to pick a ground-track sampling density.
    pub fn mean_altitude(&self) -> f64 {
        self.semi_major_axis() - EARTH_RADIUS_EQ_KM
    }
}
