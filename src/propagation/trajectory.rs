//! Time-stamped propagation output

use super::state::StateVector;
use serde::{Deserialize, Serialize};

/// One propagated state, stamped with seconds elapsed since the start state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Signed seconds from the start of the propagation
    pub elapsed_s: f64,
    /// ECI state at that time
    pub state: StateVector,
}

/// Ordered samples of a single propagation
///
/// The first sample is at elapsed time zero and the elapsed times are
/// strictly monotonic: increasing for forward propagation, decreasing for
/// backward. A trajectory is never modified after it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub(crate) fn from_samples(samples: Vec<TrajectorySample>) -> Self {
        Self { samples }
    }

    /// All samples in propagation order
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    /// Sample at elapsed time zero
    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    /// Sample at the end of the propagation span
    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// Signed length of the propagation span (seconds)
    pub fn duration(&self) -> f64 {
        self.last().map(|s| s.elapsed_s).unwrap_or(0.0)
    }

    /// True when the propagation ran backward in time
    pub fn is_backward(&self) -> bool {
        self.duration() < 0.0
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
