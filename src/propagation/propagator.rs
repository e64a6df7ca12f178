//! Propagation entry points
//!
//! Ties the equations of motion, the integrator and the ground-track
//! builder together, enforcing the propagation ceiling before any
//! integration work starts.

use super::dynamics::EarthGravity;
use super::integrator::{DormandPrince54, IntegrationStats};
use super::settings::PropagationSettings;
use super::state::StateVector;
use super::trajectory::{Trajectory, TrajectorySample};
use super::window::PropagationWindow;
use crate::constants::DAY_S;
use crate::groundtrack::{GroundTrackBuilder, GroundTrackReport};
use crate::time::JulianDate;
use crate::{Result, SkytrackError};
use log::{debug, warn};

/// Numerical orbit propagator (point mass, optionally J2)
///
/// Holds only immutable configuration, so one instance can serve any
/// number of independent requests, including from several threads.
#[derive(Debug, Clone)]
pub struct Propagator {
    settings: PropagationSettings,
    gravity: EarthGravity,
    integrator: DormandPrince54,
}

impl Propagator {
    /// Create a propagator, validating the settings
    pub fn new(settings: PropagationSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            gravity: EarthGravity::new(settings.j2_enabled),
            integrator: DormandPrince54::new(settings.integrator),
            settings,
        })
    }

    pub fn settings(&self) -> &PropagationSettings {
        &self.settings
    }

    /// Reject spans beyond the configured ceiling
    pub fn check_span(&self, span_days: f64) -> Result<()> {
        let max_days = self.settings.max_propagation_days;
        if span_days.abs() > max_days {
            warn!(
                "rejecting propagation of {:.3} days (limit {} days)",
                span_days, max_days
            );
            return Err(SkytrackError::OutOfRange {
                requested_days: span_days.abs(),
                max_days,
            });
        }
        Ok(())
    }

    /// Propagate `state` over a signed `duration_s` into `samples` evenly spaced states
    ///
    /// The first sample is `state` itself at elapsed time zero and the last
    /// one is at `duration_s`.
    pub fn propagate(
        &self,
        state: &StateVector,
        duration_s: f64,
        samples: usize,
    ) -> Result<Trajectory> {
        self.propagate_with_stats(state, duration_s, samples)
            .map(|(trajectory, _)| trajectory)
    }

    /// Like [`Propagator::propagate`], also returning the solver counters
    pub fn propagate_with_stats(
        &self,
        state: &StateVector,
        duration_s: f64,
        samples: usize,
    ) -> Result<(Trajectory, IntegrationStats)> {
        if samples == 0 {
            return Err(SkytrackError::InvalidArgument(
                "sample count must be positive".to_string(),
            ));
        }
        if !duration_s.is_finite() {
            return Err(SkytrackError::InvalidArgument(format!(
                "propagation duration must be finite, got {}",
                duration_s
            )));
        }
        self.check_span(duration_s / DAY_S)?;
        state.validate()?;
        self.integrate(state, duration_s, samples)
    }

    /// Integrate without the ceiling check, for spans already vetted by the caller
    fn integrate(
        &self,
        state: &StateVector,
        duration_s: f64,
        samples: usize,
    ) -> Result<(Trajectory, IntegrationStats)> {
        let integration =
            self.integrator
                .integrate(&self.gravity, state.to_vector6(), duration_s, samples)?;

        let samples = integration
            .samples
            .iter()
            .map(|(t, y)| TrajectorySample {
                elapsed_s: *t,
                state: StateVector::from_vector6(y),
            })
            .collect();
        Ok((Trajectory::from_samples(samples), integration.stats))
    }

    /// State at `duration_s` seconds from `state`
    pub fn state_at(&self, state: &StateVector, duration_s: f64) -> Result<StateVector> {
        let trajectory = self.propagate(state, duration_s, 2)?;
        trajectory
            .last()
            .map(|s| s.state)
            .ok_or_else(|| SkytrackError::DivergedIntegration("empty trajectory".to_string()))
    }

    /// Ground track of `state` (valid at `epoch`) over a window
    ///
    /// The state is carried from its epoch to the window's reference time,
    /// then propagated across the window: backward for the part before the
    /// reference time, forward for the part after. `samples` points are
    /// spread over the whole window; a window extending on both sides of the
    /// reference time needs at least three. Only the window's reach from the
    /// epoch is held to the ceiling, not the length of each leg.
    pub fn ground_track(
        &self,
        state: &StateVector,
        epoch: JulianDate,
        window: &PropagationWindow,
        samples: usize,
    ) -> Result<GroundTrackReport> {
        if samples == 0 {
            return Err(SkytrackError::InvalidArgument(
                "sample count must be positive".to_string(),
            ));
        }
        if epoch != window.epoch {
            return Err(SkytrackError::InvalidArgument(format!(
                "state epoch {} does not match window epoch {}",
                epoch, window.epoch
            )));
        }
        let two_sided = window.before_s > 0.0 && window.after_s > 0.0;
        if two_sided && samples < 3 {
            return Err(SkytrackError::InvalidArgument(format!(
                "a window on both sides of the reference time needs at least 3 samples, got {}",
                samples
            )));
        }
        // Reject before any leg is integrated
        self.check_span(window.reach_days())?;
        state.validate()?;

        let (to_reference, _) = self.integrate(state, window.reference_offset_s(), 2)?;
        let reference_state = to_reference
            .last()
            .map(|s| s.state)
            .ok_or_else(|| SkytrackError::DivergedIntegration("empty trajectory".to_string()))?;

        let (back_n, fwd_n) = match (window.before_s > 0.0, window.after_s > 0.0) {
            (true, true) => (samples / 2 + 1, samples - samples / 2),
            (true, false) => (samples, 0),
            (false, true) => (0, samples),
            (false, false) => (0, 1),
        };

        let mut track_samples: Vec<TrajectorySample> = Vec::with_capacity(samples);
        if back_n > 0 {
            let (backward, _) = self.integrate(&reference_state, -window.before_s, back_n)?;
            track_samples.extend(backward.iter().rev());
        }
        if fwd_n > 0 {
            let (forward, _) = self.integrate(&reference_state, window.after_s, fwd_n)?;
            // The reference sample is already present when a backward leg ran
            let skip = usize::from(back_n > 0);
            track_samples.extend(forward.iter().skip(skip));
        }

        let builder = GroundTrackBuilder::new(window.reference);
        let reference_point = builder.geodetic_point(&reference_state, 0.0);
        let track = builder.build(&track_samples);

        debug!(
            "ground track {} .. {}: {} samples in {} segments",
            window.start(),
            window.end(),
            track_samples.len(),
            track.segments().len()
        );

        Ok(GroundTrackReport {
            window: *window,
            reference_point,
            sample_count: track_samples.len(),
            track,
        })
    }
}

impl Default for Propagator {
    fn default() -> Self {
        let settings = PropagationSettings::default();
        Self {
            gravity: EarthGravity::new(settings.j2_enabled),
            integrator: DormandPrince54::new(settings.integrator),
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::PropagationDirection;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn leo() -> StateVector {
        StateVector::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::new(0.0, 7.546, 0.0))
    }

    #[test]
    fn test_trajectory_shape() {
        let propagator = Propagator::default();
        let trajectory = propagator.propagate(&leo(), 3000.0, 31).unwrap();

        assert_eq!(trajectory.len(), 31);
        assert_eq!(trajectory.first().unwrap().state, leo());
        assert_eq!(trajectory.first().unwrap().elapsed_s, 0.0);
        assert_eq!(trajectory.duration(), 3000.0);
        assert_relative_eq!(trajectory.samples()[1].elapsed_s, 100.0, epsilon = 1e-9);
        assert!(!trajectory.is_backward());
    }

    #[test]
    fn test_backward_then_forward_returns_home() {
        let propagator = Propagator::default();
        let back = propagator.state_at(&leo(), -4000.0).unwrap();
        let home = propagator.state_at(&back, 4000.0).unwrap();
        assert_relative_eq!(home.position, leo().position, epsilon = 1e-4);
        assert_relative_eq!(home.velocity, leo().velocity, epsilon = 1e-7);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let propagator = Propagator::default();
        let err = propagator.propagate(&leo(), 45.0 * DAY_S, 10).unwrap_err();
        match err {
            SkytrackError::OutOfRange {
                requested_days,
                max_days,
            } => {
                assert_relative_eq!(requested_days, 45.0);
                assert_eq!(max_days, 30.0);
            }
            other => panic!("unexpected error {:?}", other),
        }

        // Backward spans are limited the same way
        assert!(propagator.propagate(&leo(), -31.0 * DAY_S, 10).is_err());
    }

    #[test]
    fn test_invalid_requests() {
        let propagator = Propagator::default();
        assert!(matches!(
            propagator.propagate(&leo(), 100.0, 0),
            Err(SkytrackError::InvalidArgument(_))
        ));
        assert!(matches!(
            propagator.propagate(&leo(), f64::NAN, 10),
            Err(SkytrackError::InvalidArgument(_))
        ));

        let origin = StateVector::new(Vector3::zeros(), Vector3::new(0.0, 7.5, 0.0));
        assert!(matches!(
            propagator.propagate(&origin, 100.0, 10),
            Err(SkytrackError::InvalidState(_))
        ));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = PropagationSettings {
            max_propagation_days: 0.0,
            ..PropagationSettings::default()
        };
        assert!(Propagator::new(settings).is_err());
    }

    #[test]
    fn test_ground_track_sample_split() {
        let propagator = Propagator::new(PropagationSettings::two_body()).unwrap();
        let epoch = JulianDate::new(2_460_600.5);
        let period = leo().period().unwrap();

        for (direction, samples) in [
            (PropagationDirection::Forward, 100),
            (PropagationDirection::Backward, 101),
            (PropagationDirection::Centered, 100),
            (PropagationDirection::Centered, 101),
        ] {
            let window =
                PropagationWindow::from_periods(epoch, epoch + 0.25, period, 1.0, direction)
                    .unwrap();
            let report = propagator.ground_track(&leo(), epoch, &window, samples).unwrap();
            assert_eq!(report.sample_count, samples, "{:?}", direction);
            assert_eq!(report.track.point_count(), samples);
        }
    }

    #[test]
    fn test_ground_track_legs_not_held_to_ceiling() {
        // Backward leg of 0.8 days ends 0.3 days before the epoch: reach is 0.5 days
        let settings = PropagationSettings {
            max_propagation_days: 0.6,
            ..PropagationSettings::two_body()
        };
        let propagator = Propagator::new(settings).unwrap();
        let epoch = JulianDate::new(2_460_600.5);
        let window = PropagationWindow::from_periods(
            epoch,
            epoch + 0.5,
            DAY_S,
            0.8,
            PropagationDirection::Backward,
        )
        .unwrap();
        assert_relative_eq!(window.reach_days(), 0.5, epsilon = 1e-6);

        let report = propagator.ground_track(&leo(), epoch, &window, 50).unwrap();
        assert_eq!(report.sample_count, 50);

        // Pushing the reach past the ceiling is still refused
        let far = PropagationWindow::from_periods(
            epoch,
            epoch + 0.5,
            DAY_S,
            0.4,
            PropagationDirection::Forward,
        )
        .unwrap();
        assert!(matches!(
            propagator.ground_track(&leo(), epoch, &far, 50),
            Err(SkytrackError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_centered_window_covers_both_ends() {
        let propagator = Propagator::new(PropagationSettings::two_body()).unwrap();
        let epoch = JulianDate::new(2_460_600.5);
        let period = leo().period().unwrap();
        let window = PropagationWindow::from_periods(
            epoch,
            epoch + 0.1,
            period,
            1.0,
            PropagationDirection::Centered,
        )
        .unwrap();

        for samples in [1, 2] {
            assert!(matches!(
                propagator.ground_track(&leo(), epoch, &window, samples),
                Err(SkytrackError::InvalidArgument(_))
            ));
        }

        let report = propagator.ground_track(&leo(), epoch, &window, 3).unwrap();
        let points: Vec<_> = report.track.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], report.reference_point);

        // First and last points are the window's ends
        let reference_state = propagator.state_at(&leo(), window.reference_offset_s()).unwrap();
        let builder = GroundTrackBuilder::new(window.reference);
        let start = propagator.state_at(&reference_state, -window.before_s).unwrap();
        let end = propagator.state_at(&reference_state, window.after_s).unwrap();
        assert_eq!(points[0], builder.geodetic_point(&start, -window.before_s));
        assert_eq!(points[2], builder.geodetic_point(&end, window.after_s));
    }

    #[test]
    fn test_ground_track_epoch_mismatch() {
        let propagator = Propagator::default();
        let epoch = JulianDate::new(2_460_600.5);
        let window = PropagationWindow::between(epoch, epoch + 0.1).unwrap();
        let err = propagator
            .ground_track(&leo(), epoch + 1.0, &window, 10)
            .unwrap_err();
        assert!(matches!(err, SkytrackError::InvalidArgument(_)));
    }
}
