#[cfg(target_arch = "wasm32")]
use gloo::events::EventListener;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, Window};

#[cfg(target_arch = "wasm32")]
use megane_core::url::{is_image_document_url, original_asset_url};

#[cfg(target_arch = "wasm32")]
use crate::config_runtime::load_config;
#[cfg(target_arch = "wasm32")]
use crate::dom::inject_stylesheet;
#[cfg(target_arch = "wasm32")]
use crate::panel_view::{PANEL_CSS, PANEL_STYLE_ID};
#[cfg(target_arch = "wasm32")]
use crate::viewer_app;

/// Entry point. Only image documents get the overlay; everything else is left
/// untouched.
pub(crate) fn run() {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Ok(href) = window.location().href() else {
            return;
        };
        if !is_image_document_url(&href) {
            gloo::console::log!("megane: not an image document, skipping", href);
            return;
        }
        if let Some(original) = original_asset_url(&href) {
            redirect(&window, original);
            return;
        }
        if document.ready_state() == "loading" {
            let ready = document.clone();
            EventListener::once(&document, "DOMContentLoaded", move |_event| {
                activate(ready);
            })
            .forget();
        } else {
            activate(document);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("megane only runs inside a browser on wasm32 targets");
    }
}

#[cfg(target_arch = "wasm32")]
fn redirect(window: &Window, url: &str) {
    gloo::console::log!("megane: redirecting to original asset", url);
    if let Err(err) = window.location().set_href(url) {
        gloo::console::warn!("megane: redirect failed", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn activate(document: Document) {
    match try_activate(document) {
        Ok(()) => gloo::console::log!("megane: activated"),
        Err(err) => gloo::console::warn!("megane: activation failed", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn try_activate(document: Document) -> Result<(), JsValue> {
    let config = load_config();
    inject_stylesheet(&document, PANEL_STYLE_ID, PANEL_CSS)?;
    viewer_app::start(document, config)
}
