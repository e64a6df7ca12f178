//! Configuration for propagation requests

use super::integrator::IntegratorConfig;
use crate::constants::MAX_PROPAGATION_DAYS;
use crate::{Result, SkytrackError};
use serde::{Deserialize, Serialize};

/// Settings shared by every propagation a [`Propagator`](super::Propagator) runs
///
/// Missing fields in a JSON document fall back to the defaults:
///
/// ```rust
/// use skytrack::PropagationSettings;
///
/// let settings = PropagationSettings::from_json_str(r#"{ "j2_enabled": false }"#).unwrap();
/// assert!(!settings.j2_enabled);
/// assert_eq!(settings.max_propagation_days, 30.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationSettings {
    /// Include the J2 oblateness term in the equations of motion
    pub j2_enabled: bool,
    /// Longest span (days from epoch) a request may cover
    pub max_propagation_days: f64,
    /// Step-size control of the integrator
    pub integrator: IntegratorConfig,
}

impl Default for PropagationSettings {
    fn default() -> Self {
        Self {
            j2_enabled: true,
            max_propagation_days: MAX_PROPAGATION_DAYS,
            integrator: IntegratorConfig::default(),
        }
    }
}

impl PropagationSettings {
    /// Default settings with the J2 term switched off
    pub fn two_body() -> Self {
        Self {
            j2_enabled: false,
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.max_propagation_days.is_finite() && self.max_propagation_days > 0.0) {
            return Err(SkytrackError::InvalidArgument(format!(
                "max_propagation_days must be positive and finite, got {}",
                self.max_propagation_days
            )));
        }
        self.integrator.validate()
    }
}
