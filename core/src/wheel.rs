use crate::config::{ViewerConfig, WheelDirection};

/// Zoom percent after one wheel event, or `None` when `delta_y` carries no
/// vertical direction.
pub fn wheel_zoom_target(current_percent: f64, delta_y: f64, config: &ViewerConfig) -> Option<f64> {
    if delta_y == 0.0 || delta_y.is_nan() {
        return None;
    }
    let step = config.zoom.wheel_step;
    let scrolled_down = delta_y > 0.0;
    let zoom_in = match config.wheel_direction {
        WheelDirection::DownZoomsOut => !scrolled_down,
        WheelDirection::DownZoomsIn => scrolled_down,
    };
    let delta = if zoom_in { step } else { -step };
    Some(config.zoom.clamp(current_percent + delta))
}
