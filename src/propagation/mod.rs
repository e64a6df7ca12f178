//! Numerical orbit propagation
//!
//! State vectors are in an Earth-centered inertial frame, positions in km and
//! velocities in km/s. Time is counted in seconds elapsed from the epoch of
//! the initial state.

mod dynamics;
mod integrator;
mod propagator;
mod settings;
mod state;
mod trajectory;
mod window;

pub use dynamics::{EarthGravity, EquationsOfMotion};
pub use integrator::{DormandPrince54, Integration, IntegrationStats, IntegratorConfig};
pub use propagator::Propagator;
pub use settings::PropagationSettings;
pub use state::StateVector;
pub use trajectory::{Trajectory, TrajectorySample};
pub use window::{PropagationDirection, PropagationWindow};
