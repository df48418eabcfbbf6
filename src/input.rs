use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent};

/// Client-space pointer position from a mouse or a single touch.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PointerSample {
    pub screen_x: f64,
    pub screen_y: f64,
}

pub(crate) const PRIMARY_BUTTON: i16 = 0;
pub(crate) const PANEL_SELECTOR: &str = ".megane-panel";

/// Keys that scroll the page when nothing else handles them.
pub(crate) const SCROLL_KEYS: &[&str] = &[
    " ",
    "Spacebar",
    "PageUp",
    "PageDown",
    "End",
    "Home",
    "ArrowLeft",
    "ArrowUp",
    "ArrowRight",
    "ArrowDown",
];

pub(crate) fn mouse_sample(event: &MouseEvent) -> PointerSample {
    PointerSample {
        screen_x: event.client_x() as f64,
        screen_y: event.client_y() as f64,
    }
}

pub(crate) fn primary_mouse_sample(event: &MouseEvent) -> Option<PointerSample> {
    if event.button() != PRIMARY_BUTTON {
        return None;
    }
    Some(mouse_sample(event))
}

/// The touch point when exactly one finger is down; multi-touch yields `None`.
pub(crate) fn single_touch_sample(event: &TouchEvent) -> Option<PointerSample> {
    let touches = event.touches();
    if touches.length() != 1 {
        return None;
    }
    let touch = touches.item(0)?;
    Some(PointerSample {
        screen_x: touch.client_x() as f64,
        screen_y: touch.client_y() as f64,
    })
}

/// Mouse or single-touch sample from a generic event.
pub(crate) fn event_sample(event: &Event) -> Option<PointerSample> {
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        return single_touch_sample(touch);
    }
    event.dyn_ref::<MouseEvent>().map(mouse_sample)
}

pub(crate) fn is_scroll_key(event: &KeyboardEvent) -> bool {
    SCROLL_KEYS.contains(&event.key().as_str())
}

/// True when the event targets one of the panel's own text fields.
pub(crate) fn targets_panel_text_entry(event: &Event) -> bool {
    let Some(input) = event
        .target()
        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
    else {
        return false;
    };
    input.type_() == "text" && matches!(input.closest(PANEL_SELECTOR), Ok(Some(_)))
}
