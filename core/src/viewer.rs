use crate::config::ViewerConfig;
use crate::drag::{CompactDrag, PanDrag, ValueAxis};
use crate::numeric::parse_panel_text;
use crate::panel::PanelState;
use crate::transform::{apply_transformation, ImageTransformState};
use crate::wheel::wheel_zoom_target;

#[derive(Clone, Debug, PartialEq)]
pub enum ViewerAction {
    /// Slider input or any other already-numeric zoom value, in percent.
    SetZoom { percent: f64 },
    SetRotation { degrees: f64 },
    /// Raw text from a numeric field.
    CommitText { axis: ValueAxis, text: String },
    ResetAxis { axis: ValueAxis },
    RotateClockwise,
    RotateCounterClockwise,
    FlipHorizontal,
    FlipVertical,
    Wheel { delta_y: f64 },
    PanStart { x: f64, y: f64 },
    PanMove { x: f64, y: f64 },
    PanEnd,
    CompactDragStart { axis: ValueAxis, x: f64 },
    CompactDragMove { x: f64 },
    CompactDragEnd,
    ToggleExpanded,
}

/// Drag lifecycle change caused by one action. The DOM layer uses it to
/// attach or drop document-level listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTransition {
    None,
    Started,
    Ended,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageSnapshot {
    pub state: ImageTransformState,
    pub transform: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSnapshot {
    pub zoom_percent: f64,
    pub rotation_deg: f64,
    pub expanded: bool,
    pub image: Option<ImageSnapshot>,
    pub panning: bool,
    pub compact_drag_axis: Option<ValueAxis>,
}

impl ViewerSnapshot {
    /// The drag overlay only catches input while the image is enlarged.
    pub fn overlay_active(&self) -> bool {
        self.image
            .as_ref()
            .map(|image| image.state.is_enlarged())
            .unwrap_or(false)
    }
}

/// Interaction controller for one managed image and its panel.
///
/// Every mutation runs through [`Viewer::dispatch`]; zoom and rotation
/// changes funnel through [`Viewer::update_zoom`] and
/// [`Viewer::update_rotation`] so readouts and image state never diverge.
#[derive(Clone, Debug)]
pub struct Viewer {
    config: ViewerConfig,
    image: Option<ImageTransformState>,
    transform: String,
    panel: PanelState,
    pan: PanDrag,
}

impl Viewer {
    pub fn new(config: ViewerConfig, image: Option<ImageTransformState>) -> Self {
        let (zoom_percent, rotation_deg) = match image.as_ref() {
            Some(state) => (
                config.zoom.clamp(state.scale_percent()),
                config.rotation.clamp(state.rotation_deg),
            ),
            None => (config.zoom.default, config.rotation.default),
        };
        let mut viewer = Self {
            config,
            image,
            transform: String::new(),
            panel: PanelState::new(zoom_percent, rotation_deg),
            pan: PanDrag::Idle,
        };
        viewer.recompose();
        viewer
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&ImageTransformState> {
        self.image.as_ref()
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_dragging()
    }

    pub fn is_compact_dragging(&self) -> bool {
        self.panel.compact_drag.is_some()
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            zoom_percent: self.panel.zoom_percent,
            rotation_deg: self.panel.rotation_deg,
            expanded: self.panel.expanded,
            image: self.image.map(|state| ImageSnapshot {
                state,
                transform: self.transform.clone(),
            }),
            panning: self.pan.is_dragging(),
            compact_drag_axis: self.panel.compact_drag.map(|drag| drag.axis),
        }
    }

    pub fn dispatch(&mut self, action: ViewerAction) -> DragTransition {
        match action {
            ViewerAction::SetZoom { percent } => self.update_zoom(percent),
            ViewerAction::SetRotation { degrees } => self.update_rotation(degrees),
            ViewerAction::CommitText { axis, text } => {
                self.update_axis(axis, parse_panel_text(&text));
            }
            ViewerAction::ResetAxis { axis } => {
                self.update_axis(axis, axis.default_value(&self.config));
            }
            ViewerAction::RotateClockwise => {
                let config = self.config;
                if let Some(state) = self.image.as_mut() {
                    state.rotate_clockwise(&config);
                    let degrees = state.rotation_deg;
                    self.update_rotation(degrees);
                }
            }
            ViewerAction::RotateCounterClockwise => {
                let config = self.config;
                if let Some(state) = self.image.as_mut() {
                    state.rotate_counter_clockwise(&config);
                    let degrees = state.rotation_deg;
                    self.update_rotation(degrees);
                }
            }
            ViewerAction::FlipHorizontal => {
                if let Some(state) = self.image.as_mut() {
                    state.toggle_flip_horizontal();
                    self.recompose();
                }
            }
            ViewerAction::FlipVertical => {
                if let Some(state) = self.image.as_mut() {
                    state.toggle_flip_vertical();
                    self.recompose();
                }
            }
            ViewerAction::Wheel { delta_y } => {
                let Some(state) = self.image.as_ref() else {
                    return DragTransition::None;
                };
                if let Some(percent) =
                    wheel_zoom_target(state.scale_percent(), delta_y, &self.config)
                {
                    self.update_zoom(percent);
                }
            }
            ViewerAction::PanStart { x, y } => {
                if self.panel.compact_drag.is_some() {
                    return DragTransition::None;
                }
                let Some(state) = self.image.as_ref() else {
                    return DragTransition::None;
                };
                if self.pan.begin(x, y, state) {
                    return DragTransition::Started;
                }
            }
            ViewerAction::PanMove { x, y } => {
                let Some(state) = self.image.as_mut() else {
                    return DragTransition::None;
                };
                if self.pan.update(x, y, state) {
                    self.recompose();
                }
            }
            ViewerAction::PanEnd => {
                if self.pan.end() {
                    return DragTransition::Ended;
                }
            }
            ViewerAction::CompactDragStart { axis, x } => {
                if self.panel.compact_drag.is_some() || self.pan.is_dragging() {
                    return DragTransition::None;
                }
                self.panel.compact_drag = Some(CompactDrag {
                    axis,
                    start_x: x,
                    start_value: self.panel.value(axis),
                });
                return DragTransition::Started;
            }
            ViewerAction::CompactDragMove { x } => {
                if let Some(drag) = self.panel.compact_drag {
                    let value = drag.value_at(x, &self.config);
                    self.update_axis(drag.axis, value);
                }
            }
            ViewerAction::CompactDragEnd => {
                if self.panel.compact_drag.take().is_some() {
                    return DragTransition::Ended;
                }
            }
            ViewerAction::ToggleExpanded => {
                self.panel.expanded = !self.panel.expanded;
            }
        }
        DragTransition::None
    }

    pub fn update_axis(&mut self, axis: ValueAxis, value: f64) {
        match axis {
            ValueAxis::Zoom => self.update_zoom(value),
            ValueAxis::Rotation => self.update_rotation(value),
        }
    }

    /// Single entry point for zoom changes, in percent.
    pub fn update_zoom(&mut self, percent: f64) {
        let clamped = self.config.zoom.clamp(percent);
        self.panel.zoom_percent = clamped;
        let config = self.config;
        if let Some(state) = self.image.as_mut() {
            state.set_scale_percent(clamped, &config);
        }
        self.recompose();
    }

    /// Single entry point for rotation changes, in degrees.
    pub fn update_rotation(&mut self, degrees: f64) {
        let clamped = self.config.rotation.clamp(degrees);
        self.panel.rotation_deg = clamped;
        let config = self.config;
        if let Some(state) = self.image.as_mut() {
            state.set_rotation(clamped, &config);
        }
        self.recompose();
    }

    fn recompose(&mut self) {
        if let Some(state) = self.image.as_mut() {
            self.transform = apply_transformation(state);
        }
    }
}
