//! Configuration mutation store.
//!
//! Holds the live configuration of one definition and applies typed
//! mutations. A rejected mutation leaves the configuration untouched.

use crate::config::{Configuration, resolve_defaults};
use crate::error::PlaygroundError;
use crate::registry::{ComponentDefinition, PropertySchema, PropertyType};
use crate::synth::{SynthesisOptions, synthesize_with_options};
use crate::value::PropertyValue;
use crate::visibility;
use serde_json::Value;

/// Record of an applied mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// Key of the definition the change applies to.
    pub definition: String,
    /// Property key.
    pub key: String,
    /// Value before the change.
    pub previous: Option<PropertyValue>,
    /// Value after coercion.
    pub current: PropertyValue,
}

/// Live configuration bound to one definition.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    key: String,
    definition: ComponentDefinition,
    config: Configuration,
}

impl ConfigStore {
    /// Binds a definition and resolves its defaults.
    pub fn new(key: impl Into<String>, definition: ComponentDefinition) -> Self {
        let config = resolve_defaults(&definition);
        Self {
            key: key.into(),
            definition,
            config,
        }
    }

    /// Key of the bound definition.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The bound definition.
    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    /// The live configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Current value of a property.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.config.get(key)
    }

    /// Coerces `input` to the property's declared type and stores it.
    ///
    /// Unknown keys and malformed input are rejected without touching the
    /// configuration.
    pub fn set_property(
        &mut self,
        key: &str,
        input: impl Into<PropertyValue>,
    ) -> Result<PropertyChange, PlaygroundError> {
        let Some(schema) = self.definition.property(key) else {
            log::warn!(
                "Ignoring unknown property `{}` for `{}`",
                key,
                self.key
            );
            return Err(PlaygroundError::unknown_property(&self.key, key));
        };

        let current = coerce_input(key, schema, input.into()).inspect_err(|err| {
            log::warn!("Keeping previous value of `{}.{}`: {}", self.key, key, err);
        })?;

        let previous = self.config.get(key).cloned();
        self.config.insert(key.to_string(), current.clone());
        Ok(PropertyChange {
            definition: self.key.clone(),
            key: key.to_string(),
            previous,
            current,
        })
    }

    /// Restores every property to its schema default.
    pub fn reset(&mut self) {
        self.config = resolve_defaults(&self.definition);
    }

    /// Returns whether a property is currently relevant.
    pub fn is_visible(&self, key: &str) -> bool {
        visibility::is_visible(key, &self.definition, &self.config)
    }

    /// Keys of the currently visible properties, in declaration order.
    pub fn visible_properties(&self) -> Vec<&str> {
        visibility::visible_properties(&self.definition, &self.config)
    }

    /// Synthesizes the invocation for the current state.
    pub fn synthesize(&self, options: &SynthesisOptions) -> String {
        synthesize_with_options(&self.definition, &self.config, options)
    }
}

/// Converts raw editor input into a value of the schema's declared type.
///
/// - number: blank input is `0`, numeric text is parsed, booleans map to `1`/`0`.
/// - boolean: plain truthiness, so only `""`, `0` and `false` are false.
/// - object: text is parsed as JSON; arrays and objects pass through.
/// - select: input matching an option by text takes that option's value.
/// - multiselect: arrays pass through, `[`-prefixed text is parsed as JSON,
///   other text is split on commas.
/// - string, color, textarea: the text form of the input.
pub fn coerce_input(
    key: &str,
    schema: &PropertySchema,
    input: PropertyValue,
) -> Result<PropertyValue, PlaygroundError> {
    match schema.kind {
        PropertyType::Number => coerce_number(key, input),
        PropertyType::Boolean => Ok(PropertyValue::Boolean(input.is_truthy())),
        PropertyType::Object => coerce_object(key, input),
        PropertyType::Select => Ok(coerce_select(schema, input)),
        PropertyType::Multiselect => coerce_multiselect(key, input),
        PropertyType::String | PropertyType::Color | PropertyType::Textarea => match input {
            PropertyValue::String(_) => Ok(input),
            other => Ok(PropertyValue::String(other.display_text())),
        },
    }
}

fn coerce_number(key: &str, input: PropertyValue) -> Result<PropertyValue, PlaygroundError> {
    match input {
        PropertyValue::Number(n) if !n.is_finite() => Err(PlaygroundError::malformed(
            key,
            format!("`{}` is not a finite number", n),
        )),
        PropertyValue::Number(_) => Ok(input),
        PropertyValue::Boolean(b) => Ok(PropertyValue::Number(if b { 1.0 } else { 0.0 })),
        PropertyValue::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(PropertyValue::Number(0.0));
            }
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(PropertyValue::Number(n)),
                _ => Err(PlaygroundError::malformed(
                    key,
                    format!("`{}` is not a number", trimmed),
                )),
            }
        }
        other => Err(PlaygroundError::malformed(
            key,
            format!("expected a number, got {}", other.type_name()),
        )),
    }
}

fn coerce_object(key: &str, input: PropertyValue) -> Result<PropertyValue, PlaygroundError> {
    match input {
        PropertyValue::Array(_) | PropertyValue::Object(_) => Ok(input),
        PropertyValue::String(text) => {
            let parsed: Value = serde_json::from_str(&text)
                .map_err(|err| PlaygroundError::malformed(key, err.to_string()))?;
            PropertyValue::from_json(parsed)
                .ok_or_else(|| PlaygroundError::malformed(key, "null is not a valid value"))
        }
        other => Err(PlaygroundError::malformed(
            key,
            format!("expected JSON text, got {}", other.type_name()),
        )),
    }
}

fn coerce_select(schema: &PropertySchema, input: PropertyValue) -> PropertyValue {
    let Some(options) = schema.options.as_deref() else {
        return input;
    };
    if options.contains(&input) {
        return input;
    }
    let text = input.display_text();
    match options.iter().find(|opt| opt.display_text() == text) {
        Some(option) => option.clone(),
        None => {
            log::debug!("Select value `{}` is not among the declared options", text);
            PropertyValue::String(text)
        }
    }
}

fn coerce_multiselect(key: &str, input: PropertyValue) -> Result<PropertyValue, PlaygroundError> {
    match input {
        PropertyValue::Array(_) => Ok(input),
        PropertyValue::String(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with(['[', '{']) {
                return match serde_json::from_str::<Value>(trimmed) {
                    Ok(Value::Array(items)) => Ok(PropertyValue::Array(items)),
                    Ok(_) => Err(PlaygroundError::malformed(key, "expected a JSON array")),
                    Err(err) => Err(PlaygroundError::malformed(key, err.to_string())),
                };
            }
            let items = trimmed
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect();
            Ok(PropertyValue::Array(items))
        }
        other => Err(PlaygroundError::malformed(
            key,
            format!("expected a list, got {}", other.type_name()),
        )),
    }
}
