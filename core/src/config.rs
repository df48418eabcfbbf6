use std::fmt;

use serde::Deserialize;

pub const ZOOM_MIN_PERCENT: f64 = 5.0;
pub const ZOOM_MAX_PERCENT: f64 = 1500.0;
pub const ZOOM_WHEEL_STEP_PERCENT: f64 = 25.0;
pub const ZOOM_DEFAULT_PERCENT: f64 = 100.0;

pub const ROTATION_MIN_DEG: f64 = -360.0;
pub const ROTATION_MAX_DEG: f64 = 360.0;
pub const ROTATION_STEP_DEG: f64 = 1.0;
pub const ROTATION_DEFAULT_DEG: f64 = 0.0;

pub const ROTATION_BUTTON_STEP_DEG: f64 = 90.0;
pub const COMPACT_ZOOM_PERCENT_PER_PX: f64 = 0.5;
pub const COMPACT_ROTATION_DEG_PER_PX: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    /// Scrolling down (positive `deltaY`) zooms out.
    #[default]
    DownZoomsOut,
    DownZoomsIn,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub wheel_step: f64,
    pub default: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: ZOOM_MIN_PERCENT,
            max: ZOOM_MAX_PERCENT,
            wheel_step: ZOOM_WHEEL_STEP_PERCENT,
            default: ZOOM_DEFAULT_PERCENT,
        }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, percent: f64) -> f64 {
        clamp_finite(percent, self.min, self.max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RotationLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            min: ROTATION_MIN_DEG,
            max: ROTATION_MAX_DEG,
            step: ROTATION_STEP_DEG,
            default: ROTATION_DEFAULT_DEG,
        }
    }
}

impl RotationLimits {
    pub fn clamp(&self, degrees: f64) -> f64 {
        clamp_finite(degrees, self.min, self.max)
    }
}

/// Bounds and defaults fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub zoom: ZoomLimits,
    pub rotation: RotationLimits,
    pub wheel_direction: WheelDirection,
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("zoom", self.zoom.min, self.zoom.max, self.zoom.default)?;
        if self.zoom.min <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "zoom.min",
                value: self.zoom.min,
            });
        }
        if !(self.zoom.wheel_step.is_finite() && self.zoom.wheel_step > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "zoom.wheel_step",
                value: self.zoom.wheel_step,
            });
        }
        check_range(
            "rotation",
            self.rotation.min,
            self.rotation.max,
            self.rotation.default,
        )?;
        if !(self.rotation.step.is_finite() && self.rotation.step > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "rotation.step",
                value: self.rotation.step,
            });
        }
        Ok(())
    }
}

fn check_range(axis: &'static str, min: f64, max: f64, default: f64) -> Result<(), ConfigError> {
    if !(min.is_finite() && max.is_finite() && default.is_finite()) {
        return Err(ConfigError::NotFinite { axis });
    }
    if min > max {
        return Err(ConfigError::InvertedRange { axis, min, max });
    }
    if default < min || default > max {
        return Err(ConfigError::DefaultOutOfRange {
            axis,
            default,
            min,
            max,
        });
    }
    Ok(())
}

/// Clamp that maps NaN to the lower bound instead of propagating it.
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NotFinite {
        axis: &'static str,
    },
    InvertedRange {
        axis: &'static str,
        min: f64,
        max: f64,
    },
    DefaultOutOfRange {
        axis: &'static str,
        default: f64,
        min: f64,
        max: f64,
    },
    NonPositive {
        field: &'static str,
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFinite { axis } => write!(f, "{axis} bounds must be finite"),
            ConfigError::InvertedRange { axis, min, max } => {
                write!(f, "{axis} min {min} is greater than max {max}")
            }
            ConfigError::DefaultOutOfRange {
                axis,
                default,
                min,
                max,
            } => write!(f, "{axis} default {default} is outside [{min}, {max}]"),
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
