//! Tool options.
//!
//! Every field has a default taken from [`crate::constants`], so callers only
//! name what they want to change:
//!
//! ```
//! use positioning_mode::PositioningConfig;
//!
//! let config = PositioningConfig::from_json(r#"{ "nudge_step_large": 5.0 }"#).unwrap();
//! assert_eq!(config.nudge_step_large, 5.0);
//! assert_eq!(config.nudge_step, 1.0);
//! ```

use crate::constants::*;
use crate::error::PositioningError;
use serde::{Deserialize, Serialize};

/// Tunable step sizes, bounds and placement used by a positioning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositioningConfig {
    /// Pixels per arrow key press
    pub nudge_step: f64,
    /// Pixels per arrow key press with Shift held
    pub nudge_step_large: f64,
    /// Scale change per `+`/`-` key press
    pub key_scale_step: f64,
    /// Scale change per wheel notch
    pub wheel_scale_step: f64,
    /// Lower scale bound
    pub min_scale: f64,
    /// Upper scale bound
    pub max_scale: f64,
    /// Stacking order forced onto the target
    pub z_index: i32,
    /// Initial distance of the overlay panel from the top-right viewport corner
    pub panel_inset: f64,
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            nudge_step: NUDGE_STEP,
            nudge_step_large: NUDGE_STEP_LARGE,
            key_scale_step: KEY_SCALE_STEP,
            wheel_scale_step: WHEEL_SCALE_STEP,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            z_index: TARGET_Z_INDEX,
            panel_inset: PANEL_INSET,
        }
    }
}

impl PositioningConfig {
    /// Parses options from JSON and validates them.
    pub fn from_json(json: &str) -> Result<Self, PositioningError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects options that would break the clamping or nudging rules.
    pub fn validate(&self) -> Result<(), PositioningError> {
        let steps = [
            ("nudge_step", self.nudge_step),
            ("nudge_step_large", self.nudge_step_large),
            ("key_scale_step", self.key_scale_step),
            ("wheel_scale_step", self.wheel_scale_step),
        ];
        for (name, value) in steps {
            if !(value.is_finite() && value > 0.0) {
                return Err(PositioningError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(PositioningError::InvalidConfig(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
            return Err(PositioningError::InvalidConfig(format!(
                "max_scale ({}) must not be below min_scale ({})",
                self.max_scale, self.min_scale
            )));
        }
        if !(self.panel_inset.is_finite() && self.panel_inset >= 0.0) {
            return Err(PositioningError::InvalidConfig(format!(
                "panel_inset must be zero or positive, got {}",
                self.panel_inset
            )));
        }
        Ok(())
    }

    /// Clamps a scale factor into the configured bounds.
    ///
    /// Does not panic on options that fail [`validate`](Self::validate); the
    /// lower bound wins when the bounds are inverted.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.min(self.max_scale).max(self.min_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tool_constants() {
        let config = PositioningConfig::default();
        assert_eq!(config.nudge_step, 1.0);
        assert_eq!(config.nudge_step_large, 10.0);
        assert_eq!(config.min_scale, 0.1);
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.z_index, 9999);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = PositioningConfig::from_json("{}").unwrap();
        assert_eq!(config, PositioningConfig::default());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = PositioningConfig::from_json(r#"{ "min_scale": 2.0, "max_scale": 1.0 }"#)
            .unwrap_err();
        assert!(matches!(err, PositioningError::InvalidConfig(_)));
    }

    #[test]
    fn zero_step_is_rejected() {
        let config = PositioningConfig {
            wheel_scale_step: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("wheel_scale_step"));
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let err = PositioningConfig::from_json("{ nudge_step: }").unwrap_err();
        assert!(matches!(err, PositioningError::ConfigFormat(_)));
    }

    #[test]
    fn clamp_scale_respects_bounds() {
        let config = PositioningConfig::default();
        assert_eq!(config.clamp_scale(5.0), 3.0);
        assert_eq!(config.clamp_scale(0.01), 0.1);
        assert_eq!(config.clamp_scale(1.5), 1.5);
    }

    #[test]
    fn clamp_scale_does_not_panic_on_unvalidated_bounds() {
        let inverted = PositioningConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..Default::default()
        };
        assert_eq!(inverted.clamp_scale(1.5), 2.0);

        let nan = PositioningConfig {
            max_scale: f64::NAN,
            ..Default::default()
        };
        assert_eq!(nan.clamp_scale(1.5), 1.5);
    }
}
