//! Time module for propagation epochs
//!
//! Epochs are carried as Julian dates. A Julian date is continuous and
//! monotonic, which makes it usable both as the origin of an integration
//! and as the argument of the sidereal-time model that orients the Earth.

use crate::constants::{DAY_S, J2000, JULIAN_CENTURY_DAYS, MJD_TO_JD, UNIX_EPOCH_JD};
use crate::{Result, SkytrackError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point in time expressed as a Julian date (days)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDate(f64);

impl JulianDate {
    /// The J2000.0 epoch
    pub const J2000: JulianDate = JulianDate(J2000);

    /// Create a Julian date from a raw day count
    pub fn new(jd: f64) -> Self {
        JulianDate(jd)
    }

    /// Create a Julian date from a Modified Julian Date
    pub fn from_mjd(mjd: f64) -> Self {
        JulianDate(mjd + MJD_TO_JD)
    }

    /// Create a Julian date from a Gregorian calendar date and time of day (UTC)
    pub fn from_calendar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Self {
        let jdn = julian_day_number(year, month as i32, day as i32) as f64;
        let day_fraction = (hour as f64 * 3600.0 + minute as f64 * 60.0 + second) / DAY_S;
        // Julian day numbers start at noon
        JulianDate(jdn - 0.5 + day_fraction)
    }

    /// Create a Julian date from a UTC timestamp
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
        JulianDate(UNIX_EPOCH_JD + seconds / DAY_S)
    }

    /// Convert back to a UTC timestamp
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let seconds = (self.0 - UNIX_EPOCH_JD) * DAY_S;
        if !seconds.is_finite() {
            return Err(SkytrackError::InvalidArgument(format!(
                "Julian date {} has no calendar representation",
                self.0
            )));
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos).ok_or_else(|| {
            SkytrackError::InvalidArgument(format!("Julian date {} is out of range", self.0))
        })
    }

    /// Raw Julian date in days
    pub fn jd(&self) -> f64 {
        self.0
    }

    /// Modified Julian Date
    pub fn mjd(&self) -> f64 {
        self.0 - MJD_TO_JD
    }

    /// Days elapsed since J2000.0
    pub fn days_since_j2000(&self) -> f64 {
        self.0 - J2000
    }

    /// Julian centuries elapsed since J2000.0
    pub fn centuries_since_j2000(&self) -> f64 {
        self.days_since_j2000() / JULIAN_CENTURY_DAYS
    }

    /// Shift by a (signed) number of seconds
    pub fn add_seconds(&self, seconds: f64) -> Self {
        JulianDate(self.0 + seconds / DAY_S)
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `self` is earlier)
    pub fn seconds_since(&self, earlier: JulianDate) -> f64 {
        (self.0 - earlier.0) * DAY_S
    }

    /// True when the underlying day count is finite
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}

impl From<DateTime<Utc>> for JulianDate {
    fn from(dt: DateTime<Utc>) -> Self {
        JulianDate::from_datetime(dt)
    }
}

// Add days to a Julian date
impl Add<f64> for JulianDate {
    type Output = JulianDate;

    fn add(self, days: f64) -> Self::Output {
        JulianDate(self.0 + days)
    }
}

// Subtract days from a Julian date
impl Sub<f64> for JulianDate {
    type Output = JulianDate;

    fn sub(self, days: f64) -> Self::Output {
        JulianDate(self.0 - days)
    }
}

// Difference between two Julian dates in days
impl Sub<JulianDate> for JulianDate {
    type Output = f64;

    fn sub(self, other: JulianDate) -> Self::Output {
        self.0 - other.0
    }
}

/// Convert (year, month, day) to a Julian day number
///
/// Uses the proleptic Gregorian calendar. The number refers to noon of the
/// given civil date.
pub fn julian_day_number(year: i32, month: i32, day: i32) -> i32 {
    let janfeb = month < 3;

    1461 * (year + 4800 - if janfeb { 1 } else { 0 }) / 4
        + 367 * (month - 2 + if janfeb { 12 } else { 0 }) / 12
        - 3 * ((year + 4900 - if janfeb { 1 } else { 0 }) / 100) / 4
        - 32075
        + day
}
