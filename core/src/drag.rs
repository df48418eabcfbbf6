use crate::config::{ViewerConfig, COMPACT_ROTATION_DEG_PER_PX, COMPACT_ZOOM_PERCENT_PER_PX};
use crate::transform::ImageTransformState;

/// Maps a screen-space drag delta into the image's translation frame.
///
/// The delta is rotated by the inverse of the image rotation, mirrored on
/// each flipped axis, and divided by the scale so one screen pixel moves the
/// rendered image by one pixel.
pub fn screen_delta_to_image(dx: f64, dy: f64, state: &ImageTransformState) -> (f64, f64) {
    let angle = state.rotation_deg.to_radians();
    let (sin, cos) = angle.sin_cos();
    let mut x = dx * cos + dy * sin;
    let mut y = -dx * sin + dy * cos;
    if state.flip_horizontal {
        x = -x;
    }
    if state.flip_vertical {
        y = -y;
    }
    let scale = if state.scale > 0.0 { state.scale } else { 1.0 };
    (x / scale, y / scale)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PanDrag {
    #[default]
    Idle,
    Dragging {
        start_x: f64,
        start_y: f64,
        origin_x: f64,
        origin_y: f64,
    },
}

impl PanDrag {
    pub fn is_dragging(&self) -> bool {
        matches!(self, PanDrag::Dragging { .. })
    }

    /// Enters `Dragging` when the image is enlarged and no drag is active.
    pub fn begin(&mut self, screen_x: f64, screen_y: f64, state: &ImageTransformState) -> bool {
        if self.is_dragging() || !state.is_enlarged() {
            return false;
        }
        *self = PanDrag::Dragging {
            start_x: screen_x,
            start_y: screen_y,
            origin_x: state.translate_x,
            origin_y: state.translate_y,
        };
        true
    }

    /// Writes the new translation into `state`. Returns false when idle.
    pub fn update(&self, screen_x: f64, screen_y: f64, state: &mut ImageTransformState) -> bool {
        let PanDrag::Dragging {
            start_x,
            start_y,
            origin_x,
            origin_y,
        } = *self
        else {
            return false;
        };
        let (dx, dy) = screen_delta_to_image(screen_x - start_x, screen_y - start_y, state);
        state.set_translation(origin_x + dx, origin_y + dy);
        true
    }

    /// Returns true if a drag was active.
    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        *self = PanDrag::Idle;
        was_dragging
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueAxis {
    Zoom,
    Rotation,
}

impl ValueAxis {
    pub fn default_value(self, config: &ViewerConfig) -> f64 {
        match self {
            ValueAxis::Zoom => config.zoom.default,
            ValueAxis::Rotation => config.rotation.default,
        }
    }

    pub fn clamp(self, value: f64, config: &ViewerConfig) -> f64 {
        match self {
            ValueAxis::Zoom => config.zoom.clamp(value),
            ValueAxis::Rotation => config.rotation.clamp(value),
        }
    }

    pub fn units_per_px(self) -> f64 {
        match self {
            ValueAxis::Zoom => COMPACT_ZOOM_PERCENT_PER_PX,
            ValueAxis::Rotation => COMPACT_ROTATION_DEG_PER_PX,
        }
    }
}

/// Horizontal drag on a compact readout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompactDrag {
    pub axis: ValueAxis,
    pub start_x: f64,
    pub start_value: f64,
}

impl CompactDrag {
    pub fn value_at(&self, screen_x: f64, config: &ViewerConfig) -> f64 {
        let delta = screen_x - self.start_x;
        self.axis
            .clamp(self.start_value + delta * self.axis.units_per_px(), config)
    }
}
