use crate::drag::{CompactDrag, ValueAxis};
use crate::numeric::round_half_up;

/// View-layer state of the floating panel. The readouts hold the last value
/// pushed through an entry point at full precision; only the text is rounded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelState {
    pub expanded: bool,
    pub zoom_percent: f64,
    pub rotation_deg: f64,
    pub compact_drag: Option<CompactDrag>,
}

impl PanelState {
    pub fn new(zoom_percent: f64, rotation_deg: f64) -> Self {
        Self {
            expanded: false,
            zoom_percent,
            rotation_deg,
            compact_drag: None,
        }
    }

    pub fn value(&self, axis: ValueAxis) -> f64 {
        match axis {
            ValueAxis::Zoom => self.zoom_percent,
            ValueAxis::Rotation => self.rotation_deg,
        }
    }

    pub fn set_value(&mut self, axis: ValueAxis, value: f64) {
        match axis {
            ValueAxis::Zoom => self.zoom_percent = value,
            ValueAxis::Rotation => self.rotation_deg = value,
        }
    }
}

/// Integer text shown in a numeric field.
pub fn text_value(value: f64) -> String {
    format!("{}", round_half_up(value) as i64)
}

pub fn readout_label(axis: ValueAxis, value: f64) -> String {
    match axis {
        ValueAxis::Zoom => format!("{}%", text_value(value)),
        ValueAxis::Rotation => format!("{}°", text_value(value)),
    }
}
