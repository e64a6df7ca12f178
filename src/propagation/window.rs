//! Time windows for ground-track requests
//!
//! A window is anchored at a reference (observation) time and extends some
//! seconds before and after it. Integration always starts at the state's
//! epoch, so the window also remembers that epoch to check how far from it
//! the request reaches.

use crate::constants::DAY_S;
use crate::time::JulianDate;
use crate::{Result, SkytrackError};
use serde::{Deserialize, Serialize};

/// Which side of the reference time a window covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropagationDirection {
    /// From the reference time onward
    Forward,
    /// Up to the reference time
    Backward,
    /// Split evenly around the reference time
    Centered,
}

/// Span of a ground-track request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropagationWindow {
    /// Epoch of the initial state vector
    pub epoch: JulianDate,
    /// Reference (observation) time
    pub reference: JulianDate,
    /// Seconds covered before the reference time (>= 0)
    pub before_s: f64,
    /// Seconds covered after the reference time (>= 0)
    pub after_s: f64,
}

impl PropagationWindow {
    /// Window spanning a number of orbital periods around the reference time
    pub fn from_periods(
        epoch: JulianDate,
        reference: JulianDate,
        period_s: f64,
        periods: f64,
        direction: PropagationDirection,
    ) -> Result<Self> {
        check_times(epoch, reference)?;
        if !(period_s.is_finite() && period_s > 0.0) {
            return Err(SkytrackError::InvalidArgument(format!(
                "orbital period must be positive and finite, got {}",
                period_s
            )));
        }
        if !(periods.is_finite() && periods >= 0.0) {
            return Err(SkytrackError::InvalidArgument(format!(
                "number of periods must be non-negative and finite, got {}",
                periods
            )));
        }

        let span = period_s * periods;
        let (before_s, after_s) = match direction {
            PropagationDirection::Forward => (0.0, span),
            PropagationDirection::Backward => (span, 0.0),
            PropagationDirection::Centered => (0.5 * span, 0.5 * span),
        };
        Ok(Self {
            epoch,
            reference,
            before_s,
            after_s,
        })
    }

    /// Window covering the whole interval between the epoch and the reference time
    pub fn between(epoch: JulianDate, reference: JulianDate) -> Result<Self> {
        check_times(epoch, reference)?;
        let offset = reference.seconds_since(epoch);
        let (before_s, after_s) = if offset >= 0.0 {
            (offset, 0.0)
        } else {
            (0.0, -offset)
        };
        Ok(Self {
            epoch,
            reference,
            before_s,
            after_s,
        })
    }

    /// Signed seconds from the epoch to the reference time
    pub fn reference_offset_s(&self) -> f64 {
        self.reference.seconds_since(self.epoch)
    }

    /// Signed seconds from the epoch to the start of the window
    pub fn start_offset_s(&self) -> f64 {
        self.reference_offset_s() - self.before_s
    }

    /// Signed seconds from the epoch to the end of the window
    pub fn end_offset_s(&self) -> f64 {
        self.reference_offset_s() + self.after_s
    }

    /// Julian date at the start of the window
    pub fn start(&self) -> JulianDate {
        self.reference.add_seconds(-self.before_s)
    }

    /// Julian date at the end of the window
    pub fn end(&self) -> JulianDate {
        self.reference.add_seconds(self.after_s)
    }

    /// Total length of the window (seconds)
    pub fn length_s(&self) -> f64 {
        self.before_s + self.after_s
    }

    /// Furthest the window reaches from the epoch, in days
    pub fn reach_days(&self) -> f64 {
        self.start_offset_s().abs().max(self.end_offset_s().abs()) / DAY_S
    }
}

fn check_times(epoch: JulianDate, reference: JulianDate) -> Result<()> {
    if !epoch.is_finite() || !reference.is_finite() {
        return Err(SkytrackError::InvalidArgument(format!(
            "window times must be finite, got epoch {} and reference {}",
            epoch, reference
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const EPOCH: f64 = 2_460_600.0;

    #[rstest]
    #[case(PropagationDirection::Forward, 0.0, 12_000.0)]
    #[case(PropagationDirection::Backward, 12_000.0, 0.0)]
    #[case(PropagationDirection::Centered, 6_000.0, 6_000.0)]
    fn test_from_periods(
        #[case] direction: PropagationDirection,
        #[case] before: f64,
        #[case] after: f64,
    ) {
        let epoch = JulianDate::new(EPOCH);
        let reference = epoch + 1.0;
        let window = PropagationWindow::from_periods(epoch, reference, 6000.0, 2.0, direction).unwrap();

        assert_relative_eq!(window.before_s, before);
        assert_relative_eq!(window.after_s, after);
        assert_relative_eq!(window.length_s(), 12_000.0);
        assert_relative_eq!(window.reference_offset_s(), DAY_S, epsilon = 1e-4);
        assert_relative_eq!(window.start_offset_s(), DAY_S - before, epsilon = 1e-4);
        assert_relative_eq!(window.end_offset_s(), DAY_S + after, epsilon = 1e-4);
    }

    #[test]
    fn test_between_forward_and_backward() {
        let epoch = JulianDate::new(EPOCH);

        let later = PropagationWindow::between(epoch, epoch + 2.0).unwrap();
        assert_relative_eq!(later.start_offset_s(), 0.0, epsilon = 1e-4);
        assert_relative_eq!(later.end_offset_s(), 2.0 * DAY_S, epsilon = 1e-4);
        assert_relative_eq!(later.reach_days(), 2.0, epsilon = 1e-9);

        let earlier = PropagationWindow::between(epoch, epoch - 3.0).unwrap();
        assert_relative_eq!(earlier.start_offset_s(), -3.0 * DAY_S, epsilon = 1e-4);
        assert_relative_eq!(earlier.end_offset_s(), 0.0, epsilon = 1e-4);
        assert_relative_eq!(earlier.reach_days(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reach_of_centered_window_before_epoch() {
        let epoch = JulianDate::new(EPOCH);
        let window = PropagationWindow::from_periods(
            epoch,
            epoch - 10.0,
            DAY_S,
            4.0,
            PropagationDirection::Centered,
        )
        .unwrap();
        // Window is [-12, -8] days from the epoch
        assert_relative_eq!(window.reach_days(), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_inputs() {
        let epoch = JulianDate::new(EPOCH);
        let fwd = PropagationDirection::Forward;
        assert!(PropagationWindow::from_periods(epoch, epoch, 0.0, 1.0, fwd).is_err());
        assert!(PropagationWindow::from_periods(epoch, epoch, 5000.0, -1.0, fwd).is_err());
        assert!(PropagationWindow::from_periods(epoch, epoch, f64::NAN, 1.0, fwd).is_err());
        assert!(PropagationWindow::between(JulianDate::new(f64::NAN), epoch).is_err());
    }

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&PropagationDirection::Centered).unwrap();
        assert_eq!(json, "\"centered\"");
    }
}
