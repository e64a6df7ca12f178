//! Reference frame transformations

pub mod terrestrial;

pub use terrestrial::{eci_to_ecef, eci_to_ecef_matrix, eci_to_ecef_rotation, gmst_degrees};
