//! Skytrack: satellite orbit propagation and ground tracks
//!
//! This crate integrates a satellite's inertial state vector under Earth
//! gravity (point mass plus the J2 oblateness term), rotates the resulting
//! trajectory into the Earth-fixed frame and reduces it to geodetic ground
//! track segments that are safe to draw on an equirectangular map.
//!
//! ```rust
//! use nalgebra::Vector3;
//! use skytrack::{PropagationSettings, Propagator, StateVector};
//!
//! let state = StateVector::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::new(0.0, 7.546, 0.0));
//! let propagator = Propagator::new(PropagationSettings::default()).unwrap();
//! let trajectory = propagator.propagate(&state, 600.0, 11).unwrap();
//! assert_eq!(trajectory.len(), 11);
//! ```

use thiserror::Error;

pub mod constants;
pub mod coordinates;
pub mod earthlib;
pub mod framelib;
pub mod groundtrack;
pub mod propagation;
pub mod time;

// Re-export commonly used types
pub use coordinates::GeodeticPoint;
pub use groundtrack::{GroundTrack, GroundTrackBuilder, GroundTrackSegment};
pub use propagation::{
    PropagationDirection, PropagationSettings, PropagationWindow, Propagator, StateVector,
    Trajectory,
};
pub use time::JulianDate;

/// Main error type for the skytrack library
#[derive(Debug, Error)]
pub enum SkytrackError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Propagation span of {requested_days:.3} days exceeds the {max_days} day limit")]
    OutOfRange { requested_days: f64, max_days: f64 },

    #[error("Integration diverged: {0}")]
    DivergedIntegration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for skytrack operations
pub type Result<T> = std::result::Result<T, SkytrackError>;
