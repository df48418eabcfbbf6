use std::fmt::Write;

use crate::config::{ViewerConfig, ROTATION_BUTTON_STEP_DEG};
use crate::numeric::{fmt_f64, parse_leading_float, parse_leading_int};

pub const ATTR_ROTATE: &str = "rotate";
pub const ATTR_FLIP_X: &str = "flipX";
pub const ATTR_FLIP_Y: &str = "flipY";
pub const ATTR_SCALE: &str = "scale";
pub const ATTR_TRANSLATE_X: &str = "translateX";
pub const ATTR_TRANSLATE_Y: &str = "translateY";

/// Presentation state of the managed image.
///
/// `scale` is a fraction (`1.0` is 100%). Translation is in CSS pixels of the
/// image's own frame, applied after scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageTransformState {
    pub rotation_deg: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ImageTransformState {
    fn default() -> Self {
        Self {
            rotation_deg: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ImageTransformState {
    pub fn with_defaults(config: &ViewerConfig) -> Self {
        Self {
            rotation_deg: config.rotation.default.trunc(),
            scale: config.zoom.default / 100.0,
            ..Self::default()
        }
    }

    /// Reads state from string attributes. Anything missing or unparseable
    /// takes the configured default. Rotation is read as an integer, a zero
    /// scale reads as the default zoom.
    pub fn from_attributes<F>(config: &ViewerConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::with_defaults(config);
        let rotation_deg = lookup(ATTR_ROTATE)
            .and_then(|raw| parse_leading_int(&raw))
            .map(|value| value as f64)
            .unwrap_or(defaults.rotation_deg);
        let flag = |key: &str| lookup(key).map(|raw| raw == "true").unwrap_or(false);
        let scale = lookup(ATTR_SCALE)
            .and_then(|raw| parse_leading_float(&raw))
            .filter(|value| *value != 0.0 && value.is_finite())
            .unwrap_or(defaults.scale);
        let offset = |key: &str| {
            lookup(key)
                .and_then(|raw| parse_leading_float(&raw))
                .filter(|value| value.is_finite())
                .unwrap_or(0.0)
        };
        Self {
            rotation_deg,
            flip_horizontal: flag(ATTR_FLIP_X),
            flip_vertical: flag(ATTR_FLIP_Y),
            scale,
            translate_x: offset(ATTR_TRANSLATE_X),
            translate_y: offset(ATTR_TRANSLATE_Y),
        }
    }

    /// Attribute pairs in the same layout [`Self::from_attributes`] reads.
    pub fn to_attributes(&self) -> [(&'static str, String); 6] {
        [
            (ATTR_ROTATE, fmt_f64(self.rotation_deg)),
            (ATTR_FLIP_X, self.flip_horizontal.to_string()),
            (ATTR_FLIP_Y, self.flip_vertical.to_string()),
            (ATTR_SCALE, fmt_f64(self.scale)),
            (ATTR_TRANSLATE_X, fmt_f64(self.translate_x)),
            (ATTR_TRANSLATE_Y, fmt_f64(self.translate_y)),
        ]
    }

    pub fn scale_percent(&self) -> f64 {
        self.scale * 100.0
    }

    pub fn is_enlarged(&self) -> bool {
        self.scale > 1.0
    }

    /// Stores whole degrees, truncated toward zero.
    pub fn set_rotation(&mut self, degrees: f64, config: &ViewerConfig) {
        self.rotation_deg = config.rotation.clamp(degrees).trunc();
    }

    pub fn set_scale_percent(&mut self, percent: f64, config: &ViewerConfig) {
        self.scale = config.zoom.clamp(percent) / 100.0;
    }

    pub fn set_flip_horizontal(&mut self, flipped: bool) {
        self.flip_horizontal = flipped;
    }

    pub fn set_flip_vertical(&mut self, flipped: bool) {
        self.flip_vertical = flipped;
    }

    pub fn set_translation(&mut self, x: f64, y: f64) {
        self.translate_x = if x.is_finite() { x } else { 0.0 };
        self.translate_y = if y.is_finite() { y } else { 0.0 };
    }

    /// Adds 90 degrees and wraps into `[0, 360)`.
    pub fn rotate_clockwise(&mut self, config: &ViewerConfig) {
        let next = (self.rotation_deg + ROTATION_BUTTON_STEP_DEG).rem_euclid(360.0);
        self.set_rotation(next, config);
    }

    /// Subtracts 90 degrees and wraps into `[0, 360)`.
    pub fn rotate_counter_clockwise(&mut self, config: &ViewerConfig) {
        let next = (self.rotation_deg - ROTATION_BUTTON_STEP_DEG).rem_euclid(360.0);
        self.set_rotation(next, config);
    }

    /// Toggles the horizontal flip. Turning it on clears the vertical flip.
    pub fn toggle_flip_horizontal(&mut self) {
        self.flip_horizontal = !self.flip_horizontal;
        if self.flip_horizontal {
            self.flip_vertical = false;
        }
    }

    /// Toggles the vertical flip. Turning it on clears the horizontal flip.
    pub fn toggle_flip_vertical(&mut self) {
        self.flip_vertical = !self.flip_vertical;
        if self.flip_vertical {
            self.flip_horizontal = false;
        }
    }

    /// Forces translation back to the origin when the image is not enlarged.
    /// Returns true if the stored translation changed.
    pub fn enforce_pan_invariant(&mut self) -> bool {
        if self.scale > 1.0 {
            return false;
        }
        let changed = self.translate_x != 0.0 || self.translate_y != 0.0;
        self.translate_x = 0.0;
        self.translate_y = 0.0;
        changed
    }
}

/// Builds the CSS transform. Order is rotate, flip-x, flip-y, scale,
/// translate; flips and scale act in the rotated frame and translation acts
/// last in the scaled frame.
pub fn compose_transform(state: &ImageTransformState) -> String {
    let mut out = String::new();
    if state.rotation_deg != 0.0 {
        let _ = write!(out, "rotate({}deg) ", fmt_f64(state.rotation_deg));
    }
    if state.flip_horizontal {
        out.push_str("scaleX(-1) ");
    }
    if state.flip_vertical {
        out.push_str("scaleY(-1) ");
    }
    let _ = write!(
        out,
        "scale({}) translate({}px, {}px)",
        fmt_f64(state.scale),
        fmt_f64(state.translate_x),
        fmt_f64(state.translate_y)
    );
    out
}

/// Enforces the pan invariant on the stored state, then composes.
pub fn apply_transformation(state: &mut ImageTransformState) -> String {
    state.enforce_pan_invariant();
    compose_transform(state)
}
