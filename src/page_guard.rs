use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement, KeyboardEvent};

use crate::dom::set_style;
use crate::input::{is_scroll_key, targets_panel_text_entry};

const GESTURE_EVENTS: [&str; 3] = ["gesturestart", "gesturechange", "gestureend"];

/// Locks the page so only the overlay moves the image: no scrolling by
/// keyboard, touch or Safari pinch, and no native click-to-zoom.
///
/// The returned listeners stay installed for as long as they are held.
pub(crate) fn install(
    document: &Document,
    managed: Option<&HtmlImageElement>,
) -> Vec<EventListener> {
    lock_overflow(document);

    let capture = EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: false,
    };
    let bubble = EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    };
    let mut listeners = Vec::new();

    listeners.push(EventListener::new_with_options(
        document,
        "keydown",
        capture,
        |event: &Event| {
            let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if is_scroll_key(key_event) && !targets_panel_text_entry(event) {
                event.prevent_default();
            }
        },
    ));

    listeners.push(EventListener::new_with_options(
        document,
        "touchmove",
        bubble,
        |event: &Event| {
            event.prevent_default();
        },
    ));

    for kind in GESTURE_EVENTS {
        listeners.push(EventListener::new_with_options(
            document,
            kind,
            bubble,
            |event: &Event| {
                event.prevent_default();
            },
        ));
    }

    listeners.push(EventListener::new_with_options(
        document,
        "click",
        capture,
        |event: &Event| {
            if target_image(event).is_some() {
                event.prevent_default();
                event.stop_propagation();
            }
        },
    ));

    let managed = managed.cloned();
    listeners.push(EventListener::new_with_options(
        document,
        "mouseover",
        capture,
        move |event: &Event| {
            let Some(image) = target_image(event) else {
                return;
            };
            if let Some(managed) = managed.as_ref() {
                if managed.is_same_node(Some(&image)) {
                    return;
                }
            }
            if let Some(image) = image.dyn_ref::<HtmlElement>() {
                set_style(image, "cursor", "default");
            }
        },
    ));

    listeners
}

fn lock_overflow(document: &Document) {
    if let Some(root) = document
        .document_element()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    {
        set_style(&root, "overflow", "hidden");
    }
    if let Some(body) = document.body() {
        set_style(&body, "overflow", "hidden");
    }
}

/// Nearest `<img>` at or above the event target.
fn target_image(event: &Event) -> Option<Element> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest("img").ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::{KeyboardEventInit, MouseEventInit};

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window()
            .and_then(|window| window.document())
            .expect("document available")
    }

    fn overflow(element: &HtmlElement) -> String {
        element
            .style()
            .get_property_value("overflow")
            .unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn install_hides_overflow() {
        let document = document();
        let _listeners = install(&document, None);
        let body = document.body().expect("body");
        assert_eq!(overflow(&body), "hidden");
    }

    fn page_down() -> KeyboardEvent {
        let init = KeyboardEventInit::new();
        init.set_key("PageDown");
        init.set_bubbles(true);
        init.set_cancelable(true);
        KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init)
            .expect("keyboard event")
    }

    #[wasm_bindgen_test]
    fn scroll_keys_are_blocked_outside_panel_inputs() {
        let document = document();
        let _listeners = install(&document, None);
        let body = document.body().expect("body");

        let event = page_down();
        body.dispatch_event(&event).expect("dispatch");
        assert!(event.default_prevented());

        let stray = crate::dom::create_input(&document, "text", "").expect("input");
        body.append_child(&stray).expect("append");
        let event = page_down();
        stray.dispatch_event(&event).expect("dispatch");
        assert!(event.default_prevented());
        stray.remove();

        let panel = crate::dom::create_html(&document, "div", "megane-panel").expect("panel");
        let input = crate::dom::create_input(&document, "text", "megane-number").expect("input");
        panel.append_child(&input).expect("append");
        body.append_child(&panel).expect("append");
        let event = page_down();
        input.dispatch_event(&event).expect("dispatch");
        assert!(!event.default_prevented());
        panel.remove();
    }

    #[wasm_bindgen_test]
    fn image_clicks_are_cancelled() {
        let document = document();
        let _listeners = install(&document, None);
        let body = document.body().expect("body");
        let image = document.create_element("img").expect("img");
        body.append_child(&image).expect("append");

        let init = MouseEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event = web_sys::MouseEvent::new_with_mouse_event_init_dict("click", &init)
            .expect("mouse event");
        image.dispatch_event(&event).expect("dispatch");
        assert!(event.default_prevented());
        image.remove();
    }
}
