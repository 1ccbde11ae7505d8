//! Live configuration state and its default resolution.

use crate::registry::ComponentDefinition;
use crate::value::PropertyValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Current key/value state of one component definition.
///
/// Only this crate can add keys, so a configuration never holds a key its
/// definition does not declare. Values are owned: two configurations never
/// share compound data, and neither shares it with the schema defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, PropertyValue>,
}

impl Configuration {
    /// Returns the value of a property.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Returns true if the property has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in lexical order. Use the definition for declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(key, value)` pairs in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON object view of the configuration.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Builds a configuration for `definition` from loose values, keeping
    /// only declared keys. Declared keys missing from `values` are absent.
    pub fn from_values<I, K>(definition: &ComponentDefinition, values: I) -> Self
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in values {
            let key = key.into();
            if definition.has_property(&key) {
                config.values.insert(key, value);
            } else {
                log::warn!(
                    "Dropping `{}`: not declared by `{}`",
                    key,
                    definition.component_identifier
                );
            }
        }
        config
    }

    pub(crate) fn insert(&mut self, key: String, value: PropertyValue) {
        self.values.insert(key, value);
    }
}

/// Builds the initial configuration of a definition from its schema
/// defaults.
///
/// The result has exactly the definition's property keys. Compound defaults
/// are cloned, so editing the result never touches the schema.
///
/// # Examples
///
/// ```
/// use propkit_core::{ComponentDefinition, PropertySchema, PropertyType, resolve_defaults};
///
/// let def = ComponentDefinition::new("Widget", "Widget")
///     .with_property("color", PropertySchema::new(PropertyType::Color, "#fff"));
/// let config = resolve_defaults(&def);
/// assert_eq!(config.get("color").and_then(|v| v.as_str()), Some("#fff"));
/// assert_eq!(config.len(), 1);
/// ```
pub fn resolve_defaults(definition: &ComponentDefinition) -> Configuration {
    let mut config = Configuration::default();
    for (key, schema) in definition.properties.iter() {
        config.insert(key.to_string(), schema.default.clone());
    }
    config
}
