use js_sys::Array;
use propkit_core::{
    ComponentDefinition, Configuration, PropertyValue, Registry, builtin_registry,
    resolve_defaults,
};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use std::sync::Arc;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Conversions
// ============================================================================

/// Serializes maps as plain JS objects rather than `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn to_json(value: JsValue) -> Result<serde_json::Value, JsError> {
    if value.is_undefined() {
        return Ok(serde_json::Value::Null);
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&format!("Invalid value: {}", e)))
}

/// Accepts a registry as a JSON string or a plain object; `undefined` and
/// `null` select the built-in catalog.
fn load_registry(registry: JsValue) -> Result<Arc<Registry>, JsError> {
    if registry.is_undefined() || registry.is_null() {
        return Ok(Arc::new(builtin_registry().clone()));
    }
    let loaded = match registry.as_string() {
        Some(json) => Registry::from_json(&json),
        None => Registry::from_value(to_json(registry)?),
    };
    loaded
        .map(Arc::new)
        .map_err(|e| JsError::new(&format!("Registry error: {}", e)))
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

// ============================================================================
// Playground
// ============================================================================

/// Browser handle to one playground session.
#[wasm_bindgen]
pub struct Playground {
    inner: propkit_core::Playground,
}

#[wasm_bindgen]
impl Playground {
    /// Creates an empty session over `registry` (built-in when omitted).
    #[wasm_bindgen(constructor)]
    pub fn new(registry: JsValue) -> Result<Playground, JsError> {
        Ok(Self {
            inner: propkit_core::Playground::new(load_registry(registry)?),
        })
    }

    /// Creates a session preselecting `initial`; an unknown key starts empty.
    #[wasm_bindgen(js_name = withSelection)]
    pub fn with_selection(
        registry: JsValue,
        initial: Option<String>,
    ) -> Result<Playground, JsError> {
        Ok(Self {
            inner: propkit_core::Playground::with_initial_selection(
                load_registry(registry)?,
                initial.as_deref(),
            ),
        })
    }

    /// Selects a definition, replacing the live configuration with defaults.
    pub fn select(&mut self, key: &str) -> Result<(), JsError> {
        self.inner.select(key).map_err(js_error)
    }

    /// Applies one property mutation.
    #[wasm_bindgen(js_name = setProperty)]
    pub fn set_property(&mut self, key: &str, value: JsValue) -> Result<(), JsError> {
        let value = PropertyValue::from_json(to_json(value)?)
            .ok_or_else(|| JsError::new(&format!("Malformed value for `{}`: null", key)))?;
        self.inner.set_property(key, value).map_err(js_error)
    }

    /// Live configuration as a plain object, or `null` when nothing is
    /// selected.
    pub fn config(&self) -> Result<JsValue, JsError> {
        match self.inner.config() {
            Some(config) => to_js(&config.to_json()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Keys of the properties currently relevant, in declaration order.
    #[wasm_bindgen(js_name = visibleProperties)]
    pub fn visible_properties(&self) -> Array {
        self.inner
            .visible_properties()
            .into_iter()
            .map(JsValue::from_str)
            .collect()
    }

    /// Synthesized JSX for the current state.
    pub fn code(&self) -> Option<String> {
        self.inner.synthesize()
    }

    /// Restores the selected definition's defaults.
    pub fn reset(&mut self) -> Result<(), JsError> {
        self.inner.reset().map_err(js_error)
    }

    /// Forces a remount of the rendered preview; returns the new epoch.
    pub fn refresh(&mut self) -> f64 {
        self.inner.refresh() as f64
    }

    /// Key of the selected definition.
    #[wasm_bindgen(getter, js_name = selectedKey)]
    pub fn selected_key(&self) -> Option<String> {
        self.inner.selected_key().map(str::to_string)
    }

    /// Current render epoch.
    #[wasm_bindgen(getter, js_name = renderEpoch)]
    pub fn render_epoch(&self) -> f64 {
        self.inner.render_epoch() as f64
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Synthesizes JSX for a definition object and an optional configuration
/// object (defaults when omitted).
#[wasm_bindgen]
pub fn synthesize(definition: JsValue, config: JsValue) -> Result<String, JsError> {
    let definition: ComponentDefinition = serde_json::from_value(to_json(definition)?)
        .map_err(|e| JsError::new(&format!("Invalid definition: {}", e)))?;

    let config = match to_json(config)? {
        serde_json::Value::Null => resolve_defaults(&definition),
        serde_json::Value::Object(values) => Configuration::from_values(
            &definition,
            values
                .into_iter()
                .filter_map(|(key, value)| PropertyValue::from_json(value).map(|v| (key, v))),
        ),
        other => {
            return Err(JsError::new(&format!(
                "Invalid configuration: expected an object, got {}",
                other
            )));
        }
    };

    Ok(propkit_core::synthesize(&definition, &config))
}

/// Parses children content into renderable nodes. Never throws on malformed
/// markup.
#[wasm_bindgen(js_name = parseContent)]
pub fn parse_content(text: &str) -> Result<JsValue, JsError> {
    to_js(&propkit_markup::parse(text))
}
