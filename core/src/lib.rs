pub mod config;
pub mod drag;
pub mod numeric;
pub mod panel;
pub mod transform;
pub mod url;
pub mod viewer;
pub mod wheel;

pub use config::{ConfigError, RotationLimits, ViewerConfig, WheelDirection, ZoomLimits};
pub use drag::{screen_delta_to_image, CompactDrag, PanDrag, ValueAxis};
pub use transform::{apply_transformation, compose_transform, ImageTransformState};
pub use viewer::{DragTransition, ImageSnapshot, Viewer, ViewerAction, ViewerSnapshot};
