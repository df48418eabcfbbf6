use js_sys::{Reflect, JSON};
use wasm_bindgen::JsValue;

use megane_core::ViewerConfig;

/// Global a page or userscript can set before boot to override bounds.
pub(crate) const CONFIG_GLOBAL: &str = "__MEGANE_CONFIG";

/// Reads `window.__MEGANE_CONFIG`, falling back to defaults when it is
/// missing, malformed or fails validation.
pub(crate) fn load_config() -> ViewerConfig {
    let Some(window) = web_sys::window() else {
        return ViewerConfig::default();
    };
    let Ok(value) = Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) else {
        return ViewerConfig::default();
    };
    if value.is_null() || value.is_undefined() {
        return ViewerConfig::default();
    }
    match config_from_js(&value) {
        Ok(config) => config,
        Err(message) => {
            gloo::console::warn!("megane: config rejected", message);
            ViewerConfig::default()
        }
    }
}

pub(crate) fn config_from_js(value: &JsValue) -> Result<ViewerConfig, String> {
    let json = JSON::stringify(value)
        .ok()
        .and_then(|text| text.as_string())
        .ok_or_else(|| "config is not serialisable".to_string())?;
    config_from_json(&json)
}

pub(crate) fn config_from_json(json: &str) -> Result<ViewerConfig, String> {
    let config: ViewerConfig = serde_json::from_str(json).map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn js_object_overrides_defaults() {
        let value = JSON::parse(r#"{"zoom":{"max":800},"wheel_direction":"down_zooms_in"}"#)
            .expect("json parses");
        let config = config_from_js(&value).expect("config accepted");
        assert_eq!(config.zoom.max, 800.0);
        assert_eq!(config.zoom.min, 5.0);
    }

    #[wasm_bindgen_test]
    fn invalid_override_is_reported() {
        let err = config_from_json(r#"{"zoom":{"min":900,"max":100}}"#).expect_err("rejected");
        assert!(err.contains("greater than max"), "{err}");
        assert!(config_from_json("[1, 2]").is_err());
    }

    #[wasm_bindgen_test]
    fn missing_global_uses_defaults() {
        assert_eq!(load_config(), ViewerConfig::default());
    }
}
