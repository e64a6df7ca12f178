//! Adaptive Dormand-Prince 5(4) integrator
//!
//! The solver advances with its own error-controlled step size and lands
//! exactly on each requested output time, so the spacing of the returned
//! samples is independent of the internal steps. The fifth-order solution
//! is propagated (local extrapolation) and the embedded fourth-order
//! solution only feeds the error estimate. The last stage of an accepted
//! step is reused as the first stage of the next one (FSAL).

use super::dynamics::EquationsOfMotion;
use crate::{Result, SkytrackError};
use log::{debug, trace};
use nalgebra::Vector6;
use serde::{Deserialize, Serialize};

/// Dormand-Prince 5(4) Butcher tableau
mod dp54 {
    pub const C2: f64 = 1.0 / 5.0;
    pub const C3: f64 = 3.0 / 10.0;
    pub const C4: f64 = 4.0 / 5.0;
    pub const C5: f64 = 8.0 / 9.0;

    pub const A21: f64 = 1.0 / 5.0;

    pub const A31: f64 = 3.0 / 40.0;
    pub const A32: f64 = 9.0 / 40.0;

    pub const A41: f64 = 44.0 / 45.0;
    pub const A42: f64 = -56.0 / 15.0;
    pub const A43: f64 = 32.0 / 9.0;

    pub const A51: f64 = 19372.0 / 6561.0;
    pub const A52: f64 = -25360.0 / 2187.0;
    pub const A53: f64 = 64448.0 / 6561.0;
    pub const A54: f64 = -212.0 / 729.0;

    pub const A61: f64 = 9017.0 / 3168.0;
    pub const A62: f64 = -355.0 / 33.0;
    pub const A63: f64 = 46732.0 / 5247.0;
    pub const A64: f64 = 49.0 / 176.0;
    pub const A65: f64 = -5103.0 / 18656.0;

    // Fifth-order weights (also the seventh stage row)
    pub const B1: f64 = 35.0 / 384.0;
    pub const B3: f64 = 500.0 / 1113.0;
    pub const B4: f64 = 125.0 / 192.0;
    pub const B5: f64 = -2187.0 / 6784.0;
    pub const B6: f64 = 11.0 / 84.0;

    // Fifth minus fourth order weights
    pub const E1: f64 = 71.0 / 57600.0;
    pub const E3: f64 = -71.0 / 16695.0;
    pub const E4: f64 = 71.0 / 1920.0;
    pub const E5: f64 = -17253.0 / 339200.0;
    pub const E6: f64 = 22.0 / 525.0;
    pub const E7: f64 = -1.0 / 40.0;
}

/// Step-size control settings for [`DormandPrince54`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Relative tolerance
    pub rtol: f64,
    /// Absolute tolerance (km for position, km/s for velocity)
    pub atol: f64,
    /// First trial step (seconds)
    pub initial_step: f64,
    /// Smallest step before the integration is declared diverged (seconds)
    pub min_step: f64,
    /// Largest step (seconds)
    pub max_step: f64,
    /// Attempted steps (accepted + rejected) before giving up
    pub max_steps: usize,
    /// Safety factor on the optimal step
    pub safety: f64,
    /// Largest step growth after an accepted step
    pub max_growth: f64,
    /// Largest step shrink after a rejected step
    pub max_shrink: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-10,
            atol: 1e-9,
            initial_step: 10.0,
            min_step: 1e-6,
            max_step: 600.0,
            max_steps: 2_000_000,
            safety: 0.9,
            max_growth: 10.0,
            max_shrink: 0.2,
        }
    }
}

impl IntegratorConfig {
    /// Reject settings the step controller cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("rtol", self.rtol),
            ("atol", self.atol),
            ("initial_step", self.initial_step),
            ("min_step", self.min_step),
            ("max_step", self.max_step),
            ("safety", self.safety),
            ("max_shrink", self.max_shrink),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SkytrackError::InvalidArgument(format!(
                    "integrator {} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if self.min_step > self.max_step {
            return Err(SkytrackError::InvalidArgument(format!(
                "integrator min_step {} exceeds max_step {}",
                self.min_step, self.max_step
            )));
        }
        if !(self.max_growth.is_finite() && self.max_growth >= 1.0) || self.max_shrink >= 1.0 {
            return Err(SkytrackError::InvalidArgument(format!(
                "integrator growth/shrink limits must straddle 1, got {} / {}",
                self.max_growth, self.max_shrink
            )));
        }
        if self.max_steps == 0 {
            return Err(SkytrackError::InvalidArgument(
                "integrator max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters from one integration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    /// Steps that met the tolerance
    pub accepted_steps: usize,
    /// Steps retried with a smaller size
    pub rejected_steps: usize,
    /// Right-hand side evaluations
    pub evaluations: usize,
}

/// Output of [`DormandPrince54::integrate`]
#[derive(Debug, Clone)]
pub struct Integration {
    /// `(elapsed_seconds, state)` at each requested output time
    pub samples: Vec<(f64, Vector6<f64>)>,
    /// Solver counters
    pub stats: IntegrationStats,
}

/// Result of one trial step
struct TrialStep {
    y: Vector6<f64>,
    /// Derivative at the end of the step (first stage of the next one)
    k_end: Vector6<f64>,
    /// Scaled RMS error; accept when <= 1
    error: f64,
}

/// Explicit embedded Runge-Kutta 5(4) solver with adaptive steps
#[derive(Debug, Clone, Default)]
pub struct DormandPrince54 {
    config: IntegratorConfig,
}

impl DormandPrince54 {
    /// Create a solver with the given step-size control
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Output times for `samples` evenly spaced points spanning `[0, duration]`
    ///
    /// A single sample is the initial time alone.
    pub fn output_times(duration: f64, samples: usize) -> Vec<f64> {
        if samples == 1 {
            return vec![0.0];
        }
        let last = (samples - 1) as f64;
        (0..samples)
            .map(|i| if i + 1 == samples { duration } else { duration * i as f64 / last })
            .collect()
    }

    /// Integrate `y0` from elapsed time 0 over a signed `duration` (seconds)
    ///
    /// Returns `samples` states evenly spaced in time, the first being `y0`
    /// and the last the state at `duration`. A negative duration integrates
    /// backward.
    pub fn integrate<E: EquationsOfMotion + ?Sized>(
        &self,
        eom: &E,
        y0: Vector6<f64>,
        duration: f64,
        samples: usize,
    ) -> Result<Integration> {
        if samples == 0 {
            return Err(SkytrackError::InvalidArgument(
                "sample count must be positive".to_string(),
            ));
        }
        if !duration.is_finite() {
            return Err(SkytrackError::InvalidArgument(format!(
                "propagation duration must be finite, got {}",
                duration
            )));
        }
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(SkytrackError::InvalidArgument(
                "initial state has non-finite components".to_string(),
            ));
        }

        let cfg = &self.config;
        let direction = if duration < 0.0 { -1.0 } else { 1.0 };
        let times = Self::output_times(duration, samples);

        let mut stats = IntegrationStats::default();
        let mut out = Vec::with_capacity(samples);

        let mut t = 0.0;
        let mut y = y0;
        let mut k1 = eom.derivative(t, &y)?;
        stats.evaluations += 1;
        let mut h = direction * cfg.initial_step.min(cfg.max_step);

        out.push((0.0, y0));
        for &target in times.iter().skip(1) {
            while direction * (target - t) > 0.0 {
                if stats.accepted_steps + stats.rejected_steps >= cfg.max_steps {
                    return Err(SkytrackError::DivergedIntegration(format!(
                        "no convergence after {} steps at t={:.3} s",
                        cfg.max_steps, t
                    )));
                }

                let remaining = target - t;
                let clipped = h.abs() >= remaining.abs();
                let h_try = if clipped { remaining } else { h };

                // A stage that cannot be evaluated rejects the step like an oversized error
                let (trial, error) = match self.step(eom, t, &y, &k1, h_try) {
                    Ok(trial) => {
                        let error = trial.error;
                        (Some(trial), error)
                    }
                    Err(err) => {
                        trace!("stage failed with h={:.4} s at t={:.3} s: {}", h_try, t, err);
                        (None, f64::INFINITY)
                    }
                };
                stats.evaluations += 6;

                match trial.filter(|_| error <= 1.0) {
                    Some(trial) => {
                        t = if clipped { target } else { t + h_try };
                        y = trial.y;
                        k1 = trial.k_end;
                        stats.accepted_steps += 1;

                        let h_next = h_try * self.growth_factor(error);
                        // A step shortened to hit an output time says little about the natural size
                        let h_abs = if clipped { h.abs().max(h_next.abs()) } else { h_next.abs() };
                        h = direction * h_abs.min(cfg.max_step);
                        trace!("accepted h={:.4} s at t={:.3} s (err {:.3e})", h_try, t, error);
                    }
                    None => {
                        stats.rejected_steps += 1;
                        h = h_try * self.shrink_factor(error);
                        trace!("rejected h={:.4} s at t={:.3} s (err {:.3e})", h_try, t, error);
                        if h.abs() < cfg.min_step {
                            return Err(SkytrackError::DivergedIntegration(format!(
                                "step size {:.3e} s fell below the {:.3e} s minimum at t={:.3} s",
                                h.abs(),
                                cfg.min_step,
                                t
                            )));
                        }
                    }
                }
            }
            out.push((target, y));
        }

        debug!(
            "integrated {:.1} s into {} samples: {} accepted, {} rejected, {} evaluations",
            duration,
            out.len(),
            stats.accepted_steps,
            stats.rejected_steps,
            stats.evaluations
        );

        Ok(Integration {
            samples: out,
            stats,
        })
    }

    fn growth_factor(&self, error: f64) -> f64 {
        let cfg = &self.config;
        if error <= 0.0 {
            cfg.max_growth
        } else {
            (cfg.safety * error.powf(-0.2)).clamp(cfg.max_shrink, cfg.max_growth)
        }
    }

    fn shrink_factor(&self, error: f64) -> f64 {
        let cfg = &self.config;
        if error.is_finite() {
            (cfg.safety * error.powf(-0.2)).clamp(cfg.max_shrink, 1.0)
        } else {
            cfg.max_shrink
        }
    }

    /// One Dormand-Prince step of size `h` from `(t, y)` with `k1 = f(t, y)`
    fn step<E: EquationsOfMotion + ?Sized>(
        &self,
        eom: &E,
        t: f64,
        y: &Vector6<f64>,
        k1: &Vector6<f64>,
        h: f64,
    ) -> Result<TrialStep> {
        use dp54::*;

        let k2 = eom.derivative(t + C2 * h, &(y + h * (A21 * k1)))?;
        let k3 = eom.derivative(t + C3 * h, &(y + h * (A31 * k1 + A32 * k2)))?;
        let k4 = eom.derivative(t + C4 * h, &(y + h * (A41 * k1 + A42 * k2 + A43 * k3)))?;
        let k5 = eom.derivative(
            t + C5 * h,
            &(y + h * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4)),
        )?;
        let k6 = eom.derivative(
            t + h,
            &(y + h * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5)),
        )?;

        let y_new = y + h * (B1 * k1 + B3 * k3 + B4 * k4 + B5 * k5 + B6 * k6);
        let k7 = eom.derivative(t + h, &y_new)?;

        let err = h * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);

        let cfg = &self.config;
        let sum_sq: f64 = (0..6)
            .map(|i| {
                let scale = cfg.atol + cfg.rtol * y[i].abs().max(y_new[i].abs());
                (err[i] / scale).powi(2)
            })
            .sum();

        Ok(TrialStep {
            y: y_new,
            k_end: k7,
            error: (sum_sq / 6.0).sqrt(),
        })
    }
}
