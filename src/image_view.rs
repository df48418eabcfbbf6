use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsValue;
use web_sys::{Document, Event, HtmlElement, HtmlImageElement};

use megane_core::{ImageSnapshot, ImageTransformState, ViewerConfig};

use crate::dom::{create_html, set_style};

const IMAGE_BASE_STYLES: &[(&str, &str)] = &[
    ("max-width", "100%"),
    ("height", "auto"),
    ("object-fit", "contain"),
    ("margin", "auto"),
    ("display", "block"),
    ("cursor", "default"),
    ("transform-origin", "center center"),
    ("user-select", "none"),
    ("-webkit-user-select", "none"),
    ("pointer-events", "auto"),
];

/// The one image the overlay manages.
pub(crate) struct ImageView {
    element: HtmlImageElement,
    _listeners: Vec<EventListener>,
}

impl ImageView {
    pub(crate) fn attach(element: HtmlImageElement) -> Self {
        for (property, value) in IMAGE_BASE_STYLES {
            set_style(&element, property, value);
        }
        let listeners = suppress_native_behavior(&element);
        Self {
            element,
            _listeners: listeners,
        }
    }

    pub(crate) fn element(&self) -> &HtmlImageElement {
        &self.element
    }

    /// State stored on the element by an earlier run, or the configured
    /// defaults for a newly found image.
    pub(crate) fn read_state(&self, config: &ViewerConfig) -> ImageTransformState {
        let dataset = self.element.dataset();
        ImageTransformState::from_attributes(config, |key| dataset.get(key))
    }

    pub(crate) fn render(&self, image: &ImageSnapshot, panning: bool) {
        set_style(&self.element, "transform", &image.transform);
        let dataset = self.element.dataset();
        for (key, value) in image.state.to_attributes() {
            if dataset.get(key).as_deref() != Some(value.as_str()) {
                let _ = dataset.set(key, &value);
            }
        }
        let cursor = if panning {
            "grabbing"
        } else if image.state.is_enlarged() {
            "grab"
        } else {
            "default"
        };
        set_style(&self.element, "cursor", cursor);
    }
}

/// Blocks click-to-zoom, native image drag, text selection and double-click
/// zoom on the image. Capture phase so page handlers never see them.
fn suppress_native_behavior(element: &HtmlImageElement) -> Vec<EventListener> {
    let options = EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: false,
    };
    let mut listeners = Vec::new();
    listeners.push(EventListener::new_with_options(
        element,
        "click",
        options,
        |event: &Event| {
            event.prevent_default();
            event.stop_immediate_propagation();
        },
    ));
    listeners.push(EventListener::new_with_options(
        element,
        "dblclick",
        options,
        |event: &Event| {
            event.prevent_default();
            event.stop_propagation();
        },
    ));
    for kind in ["dragstart", "selectstart"] {
        listeners.push(EventListener::new_with_options(
            element,
            kind,
            options,
            |event: &Event| {
                event.prevent_default();
            },
        ));
    }
    listeners
}

/// Full-viewport layer that keeps pan drags alive once the pointer leaves the
/// image bounds. Only catches input while the image is enlarged.
pub(crate) struct DragOverlay {
    element: HtmlElement,
}

impl DragOverlay {
    pub(crate) fn new(document: &Document) -> Result<Self, JsValue> {
        let element = create_html(document, "div", "megane-drag-overlay")?;
        set_style(&element, "display", "none");
        Ok(Self { element })
    }

    pub(crate) fn element(&self) -> &HtmlElement {
        &self.element
    }

    pub(crate) fn render(&self, active: bool, panning: bool) {
        if active {
            set_style(&self.element, "display", "block");
            set_style(&self.element, "pointer-events", "auto");
            set_style(&self.element, "cursor", if panning { "grabbing" } else { "grab" });
        } else {
            set_style(&self.element, "display", "none");
            set_style(&self.element, "pointer-events", "none");
        }
    }
}
