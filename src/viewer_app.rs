use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Event, EventTarget, HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent,
    WheelEvent,
};

use megane_core::{DragTransition, ValueAxis, Viewer, ViewerAction, ViewerConfig};

use crate::image_view::{DragOverlay, ImageView};
use crate::input::{event_sample, primary_mouse_sample, single_touch_sample, PointerSample};
use crate::page_guard;
use crate::panel_view::PanelView;

const ACTIVE: EventListenerOptions = EventListenerOptions {
    phase: EventListenerPhase::Bubble,
    passive: false,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragKind {
    Pan,
    Readout,
}

impl DragKind {
    fn move_action(self, sample: PointerSample) -> ViewerAction {
        match self {
            DragKind::Pan => ViewerAction::PanMove {
                x: sample.screen_x,
                y: sample.screen_y,
            },
            DragKind::Readout => ViewerAction::CompactDragMove {
                x: sample.screen_x,
            },
        }
    }

    fn end_action(self) -> ViewerAction {
        match self {
            DragKind::Pan => ViewerAction::PanEnd,
            DragKind::Readout => ViewerAction::CompactDragEnd,
        }
    }
}

pub(crate) struct ViewerApp {
    viewer: RefCell<Viewer>,
    document: Document,
    image: Option<ImageView>,
    overlay: DragOverlay,
    panel: PanelView,
    listeners: RefCell<Vec<EventListener>>,
    /// Document-level move/release listeners, present only while a drag runs.
    session: RefCell<Option<Vec<EventListener>>>,
}

thread_local! {
    static VIEWER_APP: RefCell<Option<Rc<ViewerApp>>> = RefCell::new(None);
}

/// Builds the overlay on the current document and keeps it alive for the page
/// lifetime.
pub(crate) fn start(document: Document, config: ViewerConfig) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let image = document
        .query_selector("img")?
        .and_then(|element| element.dyn_into::<HtmlImageElement>().ok())
        .map(ImageView::attach);
    if image.is_none() {
        gloo::console::log!("megane: no image element, panel only");
    }
    let state = image.as_ref().map(|view| view.read_state(&config));

    let overlay = DragOverlay::new(&document)?;
    let panel = PanelView::build(&document, &config)?;
    body.append_child(overlay.element())?;
    body.append_child(&panel.root)?;

    let app = Rc::new(ViewerApp {
        viewer: RefCell::new(Viewer::new(config, state)),
        document,
        image,
        overlay,
        panel,
        listeners: RefCell::new(Vec::new()),
        session: RefCell::new(None),
    });
    app.install_listeners();
    app.render();
    VIEWER_APP.with(|slot| {
        *slot.borrow_mut() = Some(app);
    });
    Ok(())
}

impl ViewerApp {
    fn dispatch(self: &Rc<Self>, action: ViewerAction) -> DragTransition {
        let transition = self.viewer.borrow_mut().dispatch(action);
        self.render();
        transition
    }

    fn render(&self) {
        let snapshot = self.viewer.borrow().snapshot();
        if let (Some(view), Some(image)) = (self.image.as_ref(), snapshot.image.as_ref()) {
            view.render(image, snapshot.panning);
        }
        self.overlay.render(snapshot.overlay_active(), snapshot.panning);
        self.panel.render(&snapshot);
    }

    fn begin_drag(self: &Rc<Self>, kind: DragKind, action: ViewerAction) -> bool {
        if self.dispatch(action) != DragTransition::Started {
            return false;
        }
        self.open_session(kind);
        true
    }

    fn end_drag(self: &Rc<Self>, kind: DragKind) {
        if self.dispatch(kind.end_action()) == DragTransition::Ended {
            self.session.borrow_mut().take();
        }
    }

    fn open_session(self: &Rc<Self>, kind: DragKind) {
        let mut listeners = Vec::new();

        let app = Rc::clone(self);
        listeners.push(EventListener::new(
            &self.document,
            "mousemove",
            move |event: &Event| {
                let Some(sample) = event_sample(event) else {
                    return;
                };
                app.dispatch(kind.move_action(sample));
            },
        ));

        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &self.document,
            "touchmove",
            ACTIVE,
            move |event: &Event| {
                let Some(sample) = event.dyn_ref::<TouchEvent>().and_then(single_touch_sample)
                else {
                    return;
                };
                event.prevent_default();
                app.dispatch(kind.move_action(sample));
            },
        ));

        for release in ["mouseup", "touchend", "touchcancel", "contextmenu"] {
            let app = Rc::clone(self);
            listeners.push(EventListener::new(
                &self.document,
                release,
                move |_event: &Event| {
                    app.end_drag(kind);
                },
            ));
        }

        if let Some(root) = self.document.document_element() {
            let app = Rc::clone(self);
            listeners.push(EventListener::new(
                &root,
                "mouseleave",
                move |_event: &Event| {
                    app.end_drag(kind);
                },
            ));
        }

        *self.session.borrow_mut() = Some(listeners);
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = page_guard::install(
            &self.document,
            self.image.as_ref().map(ImageView::element),
        );

        if let Some(image) = self.image.as_ref() {
            self.listen_pan_start(image.element(), &mut listeners);
        }
        self.listen_pan_start(self.overlay.element(), &mut listeners);

        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            &self.document,
            "wheel",
            ACTIVE,
            move |event: &Event| {
                let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                event.prevent_default();
                event.stop_propagation();
                app.dispatch(ViewerAction::Wheel {
                    delta_y: wheel.delta_y(),
                });
            },
        ));

        self.listen_panel(&mut listeners);
        *self.listeners.borrow_mut() = listeners;
    }

    fn listen_pan_start(
        self: &Rc<Self>,
        target: &EventTarget,
        listeners: &mut Vec<EventListener>,
    ) {
        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            target,
            "mousedown",
            ACTIVE,
            move |event: &Event| {
                let Some(sample) = event.dyn_ref::<MouseEvent>().and_then(primary_mouse_sample)
                else {
                    return;
                };
                let action = ViewerAction::PanStart {
                    x: sample.screen_x,
                    y: sample.screen_y,
                };
                if app.begin_drag(DragKind::Pan, action) {
                    event.prevent_default();
                }
            },
        ));

        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            target,
            "touchstart",
            ACTIVE,
            move |event: &Event| {
                let Some(sample) = event.dyn_ref::<TouchEvent>().and_then(single_touch_sample)
                else {
                    return;
                };
                let action = ViewerAction::PanStart {
                    x: sample.screen_x,
                    y: sample.screen_y,
                };
                if app.begin_drag(DragKind::Pan, action) {
                    event.prevent_default();
                }
            },
        ));
    }

    fn listen_panel(self: &Rc<Self>, listeners: &mut Vec<EventListener>) {
        for icon in self.panel.icons() {
            let app = Rc::clone(self);
            listeners.push(EventListener::new(icon, "click", move |event: &Event| {
                event.stop_propagation();
                app.dispatch(ViewerAction::ToggleExpanded);
            }));
        }

        for (kind, button) in self.panel.buttons.iter() {
            let app = Rc::clone(self);
            let action = kind.action();
            listeners.push(EventListener::new(button, "click", move |_event: &Event| {
                app.dispatch(action.clone());
            }));
        }

        for axis in [ValueAxis::Zoom, ValueAxis::Rotation] {
            self.listen_axis(axis, listeners);
            for readout in self.panel.readouts(axis) {
                self.listen_readout(axis, readout, listeners);
            }
        }
    }

    fn listen_axis(self: &Rc<Self>, axis: ValueAxis, listeners: &mut Vec<EventListener>) {
        let control = self.panel.control(axis);

        let app = Rc::clone(self);
        let slider = control.slider.clone();
        listeners.push(EventListener::new(
            &control.slider,
            "input",
            move |_event: &Event| {
                let value = slider.value_as_number();
                if value.is_nan() {
                    return;
                }
                let action = match axis {
                    ValueAxis::Zoom => ViewerAction::SetZoom { percent: value },
                    ValueAxis::Rotation => ViewerAction::SetRotation { degrees: value },
                };
                app.dispatch(action);
            },
        ));

        let app = Rc::clone(self);
        let input = control.input.clone();
        listeners.push(EventListener::new(
            &control.input,
            "keydown",
            move |event: &Event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                    return;
                };
                match key.as_str() {
                    "Enter" => {
                        event.prevent_default();
                        app.dispatch(ViewerAction::CommitText {
                            axis,
                            text: input.value(),
                        });
                        let _ = input.blur();
                    }
                    "Escape" => {
                        event.prevent_default();
                        let current = app.viewer.borrow().panel().value(axis);
                        let control = app.panel.control(axis);
                        control.revert_text(current);
                        let _ = input.blur();
                        // blur is synchronous; an unfocused field never sees it
                        control.reverting.set(false);
                    }
                    _ => {}
                }
            },
        ));

        let app = Rc::clone(self);
        let input = control.input.clone();
        listeners.push(EventListener::new(
            &control.input,
            "blur",
            move |_event: &Event| {
                if app.panel.control(axis).reverting.replace(false) {
                    return;
                }
                app.dispatch(ViewerAction::CommitText {
                    axis,
                    text: input.value(),
                });
            },
        ));
    }

    fn listen_readout(
        self: &Rc<Self>,
        axis: ValueAxis,
        readout: &EventTarget,
        listeners: &mut Vec<EventListener>,
    ) {
        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            readout,
            "mousedown",
            ACTIVE,
            move |event: &Event| {
                let Some(sample) = event.dyn_ref::<MouseEvent>().and_then(primary_mouse_sample)
                else {
                    return;
                };
                event.prevent_default();
                event.stop_propagation();
                app.begin_drag(
                    DragKind::Readout,
                    ViewerAction::CompactDragStart {
                        axis,
                        x: sample.screen_x,
                    },
                );
            },
        ));

        let app = Rc::clone(self);
        listeners.push(EventListener::new_with_options(
            readout,
            "touchstart",
            ACTIVE,
            move |event: &Event| {
                let Some(sample) = event.dyn_ref::<TouchEvent>().and_then(single_touch_sample)
                else {
                    return;
                };
                event.prevent_default();
                event.stop_propagation();
                app.begin_drag(
                    DragKind::Readout,
                    ViewerAction::CompactDragStart {
                        axis,
                        x: sample.screen_x,
                    },
                );
            },
        ));

        let app = Rc::clone(self);
        listeners.push(EventListener::new(readout, "dblclick", move |event: &Event| {
            event.stop_propagation();
            app.dispatch(ViewerAction::ResetAxis { axis });
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::{
        HtmlElement, KeyboardEventInit, MouseEventInit, Touch, TouchEventInit, TouchInit,
        WheelEventInit,
    };

    wasm_bindgen_test_configure!(run_in_browser);

    fn fresh_document() -> Document {
        web_sys::window()
            .and_then(|window| window.document())
            .expect("document available")
            .implementation()
            .expect("implementation")
            .create_html_document()
            .expect("html document")
    }

    fn live_app(with_image: bool) -> Rc<ViewerApp> {
        let document = fresh_document();
        if with_image {
            let image = document.create_element("img").expect("img");
            document
                .body()
                .expect("body")
                .append_child(&image)
                .expect("append");
        }
        start(document, ViewerConfig::default()).expect("start");
        VIEWER_APP
            .with(|slot| slot.borrow().clone())
            .expect("app stored")
    }

    fn mouse(kind: &str, x: i32, y: i32) -> MouseEvent {
        let init = MouseEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_client_x(x);
        init.set_client_y(y);
        init.set_button(0);
        MouseEvent::new_with_mouse_event_init_dict(kind, &init).expect("mouse event")
    }

    fn wheel(delta_y: f64) -> WheelEvent {
        let init = WheelEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_delta_y(delta_y);
        WheelEvent::new_with_event_init_dict("wheel", &init).expect("wheel event")
    }

    fn touch(kind: &str, target: &EventTarget, points: &[(f64, f64)]) -> TouchEvent {
        let touches = js_sys::Array::new();
        for (id, (x, y)) in points.iter().enumerate() {
            let init = TouchInit::new(id as i32, target);
            init.set_client_x(*x as i32);
            init.set_client_y(*y as i32);
            touches.push(&Touch::new(&init).expect("touch"));
        }
        let init = TouchEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_touches(&touches);
        TouchEvent::new_with_event_init_dict(kind, &init).expect("touch event")
    }

    fn key(name: &str) -> KeyboardEvent {
        let init = KeyboardEventInit::new();
        init.set_key(name);
        init.set_bubbles(true);
        init.set_cancelable(true);
        KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).expect("key event")
    }

    /// Zooms to 200% and presses on the image, leaving a pan running.
    fn panning_app() -> (Rc<ViewerApp>, HtmlImageElement) {
        let app = live_app(true);
        app.dispatch(ViewerAction::SetZoom { percent: 200.0 });
        let image = app.image.as_ref().expect("image").element().clone();
        image
            .dispatch_event(&mouse("mousedown", 10, 10))
            .expect("dispatch");
        assert!(app.viewer.borrow().is_panning());
        (app, image)
    }

    fn assert_pan_released(app: &Rc<ViewerApp>) {
        assert!(app.session.borrow().is_none());
        assert!(!app.viewer.borrow().is_panning());
        let before = *app.viewer.borrow().state().expect("state");
        app.document
            .dispatch_event(&mouse("mousemove", 300, 300))
            .expect("dispatch");
        let after = *app.viewer.borrow().state().expect("state");
        assert_eq!(
            (after.translate_x, after.translate_y),
            (before.translate_x, before.translate_y)
        );
    }

    fn text(element: &HtmlElement) -> String {
        element.text_content().unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn wheel_zooms_and_is_cancelled() {
        let app = live_app(true);
        let event = wheel(-100.0);
        app.document.dispatch_event(&event).expect("dispatch");
        assert!(event.default_prevented());
        assert_eq!(text(&app.panel.compact.zoom), "125%");
        let image = app.image.as_ref().expect("image");
        assert_eq!(image.element().dataset().get("scale").as_deref(), Some("1.25"));
    }

    #[wasm_bindgen_test]
    fn pan_session_lives_between_press_and_release() {
        let app = live_app(true);
        app.dispatch(ViewerAction::SetZoom { percent: 200.0 });
        let image = app.image.as_ref().expect("image").element().clone();

        image
            .dispatch_event(&mouse("mousedown", 10, 10))
            .expect("dispatch");
        assert!(app.session.borrow().is_some());
        app.document
            .dispatch_event(&mouse("mousemove", 30, 10))
            .expect("dispatch");
        let state = *app.viewer.borrow().state().expect("state");
        assert_eq!(state.translate_x, 10.0);
        assert_eq!(state.translate_y, 0.0);

        app.document
            .dispatch_event(&mouse("mouseup", 30, 10))
            .expect("dispatch");
        assert!(app.session.borrow().is_none());
        assert!(!app.viewer.borrow().is_panning());
    }

    #[wasm_bindgen_test]
    fn unenlarged_image_does_not_pan() {
        let app = live_app(true);
        let image = app.image.as_ref().expect("image").element().clone();
        image
            .dispatch_event(&mouse("mousedown", 10, 10))
            .expect("dispatch");
        assert!(app.session.borrow().is_none());
    }

    #[wasm_bindgen_test]
    fn readout_drag_and_reset() {
        let app = live_app(false);
        let readout = app.panel.compact.zoom.clone();
        readout
            .dispatch_event(&mouse("mousedown", 100, 0))
            .expect("dispatch");
        app.document
            .dispatch_event(&mouse("mousemove", 140, 0))
            .expect("dispatch");
        assert_eq!(text(&app.panel.compact.zoom), "120%");
        app.document
            .dispatch_event(&mouse("mouseup", 140, 0))
            .expect("dispatch");
        assert!(app.session.borrow().is_none());

        readout
            .dispatch_event(&mouse("dblclick", 140, 0))
            .expect("dispatch");
        assert_eq!(text(&app.panel.compact.zoom), "100%");
    }

    #[wasm_bindgen_test]
    fn icon_toggles_and_buttons_rotate() {
        let app = live_app(true);
        app.panel
            .compact
            .icon
            .dispatch_event(&mouse("click", 0, 0))
            .expect("dispatch");
        assert!(app.viewer.borrow().panel().expanded);

        let (_, clockwise) = app
            .panel
            .buttons
            .iter()
            .find(|(kind, _)| *kind == crate::panel_view::PanelButton::RotateClockwise)
            .expect("clockwise button");
        clockwise
            .dispatch_event(&mouse("click", 0, 0))
            .expect("dispatch");
        assert_eq!(text(&app.panel.expanded_bar.rotation), "90°");
        assert_eq!(app.panel.rotation.input.value(), "90");
    }

    #[wasm_bindgen_test]
    fn context_menu_ends_pan() {
        let (app, _image) = panning_app();
        app.document
            .dispatch_event(&mouse("mousemove", 30, 10))
            .expect("dispatch");
        app.document
            .dispatch_event(&mouse("contextmenu", 30, 10))
            .expect("dispatch");
        assert_pan_released(&app);
        assert_eq!(app.viewer.borrow().state().expect("state").translate_x, 10.0);
    }

    #[wasm_bindgen_test]
    fn leaving_the_window_ends_pan() {
        let (app, _image) = panning_app();
        let root = app.document.document_element().expect("root element");
        root.dispatch_event(&mouse("mouseleave", 0, 0)).expect("dispatch");
        assert_pan_released(&app);
    }

    #[wasm_bindgen_test]
    fn single_touch_pans() {
        let app = live_app(true);
        app.dispatch(ViewerAction::SetZoom { percent: 200.0 });
        let image = app.image.as_ref().expect("image").element().clone();

        let start = touch("touchstart", &image, &[(10.0, 10.0)]);
        image.dispatch_event(&start).expect("dispatch");
        assert!(start.default_prevented());
        assert!(app.session.borrow().is_some());

        let step = touch("touchmove", &image, &[(50.0, 10.0)]);
        app.document.dispatch_event(&step).expect("dispatch");
        let state = *app.viewer.borrow().state().expect("state");
        assert_eq!((state.translate_x, state.translate_y), (20.0, 0.0));

        app.document
            .dispatch_event(&touch("touchend", &image, &[]))
            .expect("dispatch");
        assert_pan_released(&app);
    }

    #[wasm_bindgen_test]
    fn two_finger_touch_does_not_pan() {
        let app = live_app(true);
        app.dispatch(ViewerAction::SetZoom { percent: 200.0 });
        let image = app.image.as_ref().expect("image").element().clone();
        let start = touch("touchstart", &image, &[(10.0, 10.0), (60.0, 60.0)]);
        image.dispatch_event(&start).expect("dispatch");
        assert!(app.session.borrow().is_none());
        assert!(!app.viewer.borrow().is_panning());
    }

    #[wasm_bindgen_test]
    fn escape_restores_text_without_committing() {
        let app = live_app(true);
        let input = app.panel.zoom.input.clone();
        input.set_value("77abc");
        input.dispatch_event(&key("Escape")).expect("dispatch");
        assert_eq!(input.value(), "100");
        assert_eq!(app.viewer.borrow().snapshot().zoom_percent, 100.0);
        assert_eq!(text(&app.panel.compact.zoom), "100%");
        assert!(!app.panel.zoom.reverting.get());
    }

    #[wasm_bindgen_test]
    fn enter_commits_clamped_text() {
        let app = live_app(true);
        let input = app.panel.zoom.input.clone();
        input.set_value("99999");
        input.dispatch_event(&key("Enter")).expect("dispatch");
        assert_eq!(text(&app.panel.compact.zoom), "1500%");
        assert_eq!(input.value(), "1500");
        let state = *app.viewer.borrow().state().expect("state");
        assert_eq!(state.scale_percent(), 1500.0);
    }
}
