//! Constants module for orbit propagation and ground-track calculations

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Days in a Julian century
pub const JULIAN_CENTURY_DAYS: f64 = 36_525.0;
/// Offset between Modified Julian Date and Julian Date
pub const MJD_TO_JD: f64 = 2_400_000.5;
/// Julian date of the Unix epoch (1970-01-01T00:00:00Z)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

// Angles
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Physics
/// Newtonian constant of gravitation in km^3/(kg s^2)
pub const G_KM: f64 = 6.6743e-20;

// Earth constants
/// Earth's mass in kg
pub const EARTH_MASS_KG: f64 = 5.972e24;
/// Earth's equatorial radius in km (WGS84)
pub const EARTH_RADIUS_EQ_KM: f64 = 6_378.137;
/// WGS84 Earth flattening
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Second zonal harmonic of Earth's gravity field
pub const EARTH_J2: f64 = 0.001_082_635;

// Propagation
/// Longest propagation span (days from epoch) inside the supported accuracy envelope
pub const MAX_PROPAGATION_DAYS: f64 = 30.0;
/// Smallest position magnitude (km) accepted as a physical state
pub const MIN_POSITION_NORM_KM: f64 = 1.0e-3;
