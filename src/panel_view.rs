use std::cell::Cell;

use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use megane_core::numeric::fmt_f64;
use megane_core::panel::{readout_label, text_value};
use megane_core::{ValueAxis, ViewerAction, ViewerConfig, ViewerSnapshot};

use crate::dom::{
    append_all, create_html, create_input, create_text, set_style, set_text_if_changed,
    set_value_if_changed,
};

pub(crate) const PANEL_CSS: &str = include_str!("panel.css");
pub(crate) const PANEL_STYLE_ID: &str = "megane-style";
const PANEL_ICON: &str = "📐";
const ZOOM_SLIDER_STEP: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PanelButton {
    RotateClockwise,
    RotateCounterClockwise,
    FlipHorizontal,
    FlipVertical,
}

impl PanelButton {
    pub(crate) const ALL: [PanelButton; 4] = [
        PanelButton::RotateClockwise,
        PanelButton::RotateCounterClockwise,
        PanelButton::FlipHorizontal,
        PanelButton::FlipVertical,
    ];

    fn label(self) -> &'static str {
        match self {
            PanelButton::RotateClockwise => "↻ Clockwise",
            PanelButton::RotateCounterClockwise => "↺ Counter-clockwise",
            PanelButton::FlipHorizontal => "↔ Flip horizontal",
            PanelButton::FlipVertical => "↕ Flip vertical",
        }
    }

    fn class(self) -> &'static str {
        match self {
            PanelButton::RotateClockwise => "megane-button megane-button-rotate-cw",
            PanelButton::RotateCounterClockwise => "megane-button megane-button-rotate-ccw",
            PanelButton::FlipHorizontal => "megane-button megane-button-flip-h",
            PanelButton::FlipVertical => "megane-button megane-button-flip-v",
        }
    }

    pub(crate) fn action(self) -> ViewerAction {
        match self {
            PanelButton::RotateClockwise => ViewerAction::RotateClockwise,
            PanelButton::RotateCounterClockwise => ViewerAction::RotateCounterClockwise,
            PanelButton::FlipHorizontal => ViewerAction::FlipHorizontal,
            PanelButton::FlipVertical => ViewerAction::FlipVertical,
        }
    }
}

/// Icon plus zoom and rotation readouts. The panel has two: one for compact
/// mode and one heading the expanded mode.
pub(crate) struct ReadoutBar {
    pub(crate) root: HtmlElement,
    pub(crate) icon: HtmlElement,
    pub(crate) zoom: HtmlElement,
    pub(crate) rotation: HtmlElement,
}

impl ReadoutBar {
    fn build(document: &Document, class: &str, config: &ViewerConfig) -> Result<Self, JsValue> {
        let root = create_html(document, "div", class)?;
        let icon = create_text(document, "span", "megane-icon", PANEL_ICON)?;
        let zoom = create_text(
            document,
            "span",
            "megane-readout megane-readout-zoom",
            &readout_label(ValueAxis::Zoom, config.zoom.default),
        )?;
        let rotation = create_text(
            document,
            "span",
            "megane-readout megane-readout-rotation",
            &readout_label(ValueAxis::Rotation, config.rotation.default),
        )?;
        append_all(&root, &[&icon, &zoom, &rotation])?;
        Ok(Self {
            root,
            icon,
            zoom,
            rotation,
        })
    }

    pub(crate) fn readout(&self, axis: ValueAxis) -> &HtmlElement {
        match axis {
            ValueAxis::Zoom => &self.zoom,
            ValueAxis::Rotation => &self.rotation,
        }
    }

    fn render(&self, snapshot: &ViewerSnapshot) {
        set_text_if_changed(
            &self.zoom,
            &readout_label(ValueAxis::Zoom, snapshot.zoom_percent),
        );
        set_text_if_changed(
            &self.rotation,
            &readout_label(ValueAxis::Rotation, snapshot.rotation_deg),
        );
    }
}

/// Slider plus numeric text entry for one axis.
pub(crate) struct AxisControl {
    pub(crate) slider: HtmlInputElement,
    pub(crate) input: HtmlInputElement,
    /// Set by Escape so the blur that follows does not commit.
    pub(crate) reverting: Cell<bool>,
}

impl AxisControl {
    fn build(
        document: &Document,
        label: &str,
        unit: &str,
        min: f64,
        max: f64,
        step: f64,
        value: f64,
    ) -> Result<(HtmlElement, Self), JsValue> {
        let row = create_html(document, "div", "megane-row")?;
        let label = create_text(document, "span", "megane-label", label)?;
        let slider = create_input(document, "range", "megane-slider")?;
        slider.set_min(&fmt_f64(min));
        slider.set_max(&fmt_f64(max));
        slider.set_step(&fmt_f64(step));
        slider.set_value(&fmt_f64(value));
        let input = create_input(document, "text", "megane-number")?;
        input.set_value(&text_value(value));
        let unit = create_text(document, "span", "megane-unit", unit)?;
        append_all(&row, &[&label, &slider, &input, &unit])?;
        Ok((
            row,
            Self {
                slider,
                input,
                reverting: Cell::new(false),
            },
        ))
    }

    fn render(&self, value: f64) {
        set_value_if_changed(&self.slider, &fmt_f64(value));
        set_value_if_changed(&self.input, &text_value(value));
    }

    /// Puts the committed value back into the text field.
    pub(crate) fn revert_text(&self, value: f64) {
        self.reverting.set(true);
        self.input.set_value(&text_value(value));
    }
}

pub(crate) struct PanelView {
    pub(crate) root: HtmlElement,
    pub(crate) compact: ReadoutBar,
    pub(crate) expanded: HtmlElement,
    pub(crate) expanded_bar: ReadoutBar,
    pub(crate) zoom: AxisControl,
    pub(crate) rotation: AxisControl,
    pub(crate) buttons: Vec<(PanelButton, HtmlElement)>,
}

impl PanelView {
    pub(crate) fn build(document: &Document, config: &ViewerConfig) -> Result<Self, JsValue> {
        let root = create_html(document, "div", "megane-panel")?;
        let compact = ReadoutBar::build(document, "megane-bar megane-compact", config)?;
        let expanded = create_html(document, "div", "megane-expanded")?;
        let expanded_bar = ReadoutBar::build(document, "megane-bar", config)?;

        let (zoom_row, zoom) = AxisControl::build(
            document,
            "Zoom:",
            "%",
            config.zoom.min,
            config.zoom.max,
            ZOOM_SLIDER_STEP,
            config.zoom.default,
        )?;
        let (rotation_row, rotation) = AxisControl::build(
            document,
            "Rotate:",
            "°",
            config.rotation.min,
            config.rotation.max,
            config.rotation.step,
            config.rotation.default,
        )?;

        let button_grid = create_html(document, "div", "megane-buttons")?;
        let mut buttons = Vec::with_capacity(PanelButton::ALL.len());
        for kind in PanelButton::ALL {
            let button = create_text(document, "button", kind.class(), kind.label())?;
            let _ = button.set_attribute("type", "button");
            button_grid.append_child(&button)?;
            buttons.push((kind, button));
        }

        append_all(
            &expanded,
            &[&expanded_bar.root, &zoom_row, &rotation_row, &button_grid],
        )?;
        append_all(&root, &[&compact.root, &expanded])?;

        Ok(Self {
            root,
            compact,
            expanded,
            expanded_bar,
            zoom,
            rotation,
            buttons,
        })
    }

    pub(crate) fn control(&self, axis: ValueAxis) -> &AxisControl {
        match axis {
            ValueAxis::Zoom => &self.zoom,
            ValueAxis::Rotation => &self.rotation,
        }
    }

    pub(crate) fn icons(&self) -> [&HtmlElement; 2] {
        [&self.compact.icon, &self.expanded_bar.icon]
    }

    pub(crate) fn readouts(&self, axis: ValueAxis) -> [&HtmlElement; 2] {
        [self.compact.readout(axis), self.expanded_bar.readout(axis)]
    }

    pub(crate) fn render(&self, snapshot: &ViewerSnapshot) {
        if snapshot.expanded {
            set_style(&self.compact.root, "display", "none");
            set_style(&self.expanded, "display", "flex");
        } else {
            set_style(&self.compact.root, "display", "flex");
            set_style(&self.expanded, "display", "none");
        }
        self.compact.render(snapshot);
        self.expanded_bar.render(snapshot);
        self.zoom.render(snapshot.zoom_percent);
        self.rotation.render(snapshot.rotation_deg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use megane_core::{ImageTransformState, Viewer};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window()
            .and_then(|window| window.document())
            .expect("document available")
    }

    fn display(element: &HtmlElement) -> String {
        element
            .style()
            .get_property_value("display")
            .unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn build_uses_configured_bounds() {
        let config = ViewerConfig::default();
        let panel = PanelView::build(&document(), &config).expect("panel builds");
        assert_eq!(panel.zoom.slider.min(), "5");
        assert_eq!(panel.zoom.slider.max(), "1500");
        assert_eq!(panel.rotation.slider.min(), "-360");
        assert_eq!(panel.zoom.input.value(), "100");
        assert_eq!(panel.compact.zoom.text_content().as_deref(), Some("100%"));
        assert_eq!(panel.compact.rotation.text_content().as_deref(), Some("0°"));
        assert_eq!(panel.buttons.len(), 4);
    }

    #[wasm_bindgen_test]
    fn render_updates_every_view_of_a_value() {
        let config = ViewerConfig::default();
        let panel = PanelView::build(&document(), &config).expect("panel builds");
        let mut viewer = Viewer::new(config, Some(ImageTransformState::with_defaults(&config)));
        viewer.dispatch(ViewerAction::SetZoom { percent: 212.6 });
        viewer.dispatch(ViewerAction::SetRotation { degrees: -45.0 });
        panel.render(&viewer.snapshot());

        for readout in panel.readouts(ValueAxis::Zoom) {
            assert_eq!(readout.text_content().as_deref(), Some("213%"));
        }
        for readout in panel.readouts(ValueAxis::Rotation) {
            assert_eq!(readout.text_content().as_deref(), Some("-45°"));
        }
        assert_eq!(panel.zoom.input.value(), "213");
        assert_eq!(panel.rotation.input.value(), "-45");
        assert_eq!(panel.rotation.slider.value(), "-45");
    }

    #[wasm_bindgen_test]
    fn render_switches_modes() {
        let config = ViewerConfig::default();
        let panel = PanelView::build(&document(), &config).expect("panel builds");
        let mut viewer = Viewer::new(config, None);
        panel.render(&viewer.snapshot());
        assert_eq!(display(&panel.compact.root), "flex");
        assert_eq!(display(&panel.expanded), "none");

        viewer.dispatch(ViewerAction::ToggleExpanded);
        panel.render(&viewer.snapshot());
        assert_eq!(display(&panel.compact.root), "none");
        assert_eq!(display(&panel.expanded), "flex");
    }

    #[wasm_bindgen_test]
    fn revert_marks_pending_blur() {
        let config = ViewerConfig::default();
        let panel = PanelView::build(&document(), &config).expect("panel builds");
        panel.zoom.input.set_value("77abc");
        panel.zoom.revert_text(150.0);
        assert_eq!(panel.zoom.input.value(), "150");
        assert!(panel.zoom.reverting.get());
    }
}
