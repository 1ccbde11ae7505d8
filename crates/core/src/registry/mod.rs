//! Immutable catalog of component definitions.
//!
//! A [`Registry`] is built once (from JSON or from code), validated, and then
//! only read. Nothing in this crate holds a global registry; callers pass one
//! in, so tests can substitute their own catalogs.

/// Built-in gallery catalog.
pub mod defaults;
/// Declaration-ordered map used for definitions and properties.
pub mod ordered;
/// Schema types.
pub mod types;

pub use ordered::OrderedMap;
pub use types::{ComponentDefinition, Conditional, PropertySchema, PropertyType};

use crate::error::RegistryError;

/// Catalog of component definitions keyed by definition key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    definitions: OrderedMap<ComponentDefinition>,
}

impl Registry {
    /// Parses and validates a catalog from JSON text.
    ///
    /// The JSON is an object mapping definition keys to definitions.
    ///
    /// # Examples
    ///
    /// ```
    /// use propkit_core::Registry;
    ///
    /// let registry = Registry::from_json(r##"{
    ///     "widget": {
    ///         "name": "Widget",
    ///         "componentIdentifier": "Widget",
    ///         "properties": {
    ///             "color": { "type": "color", "default": "#fff", "label": "Color" }
    ///         }
    ///     }
    /// }"##).unwrap();
    /// assert!(registry.contains("widget"));
    /// assert_eq!(registry.get("widget").unwrap().component_identifier, "Widget");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let definitions: OrderedMap<ComponentDefinition> = serde_json::from_str(json)?;
        Self::from_map(definitions)
    }

    /// Validates a catalog from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RegistryError> {
        let definitions: OrderedMap<ComponentDefinition> = serde_json::from_value(value)?;
        Self::from_map(definitions)
    }

    /// Builds and validates a catalog from `(key, definition)` pairs.
    pub fn from_definitions<I, K>(definitions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, ComponentDefinition)>,
        K: Into<String>,
    {
        Self::from_map(definitions.into_iter().collect())
    }

    fn from_map(definitions: OrderedMap<ComponentDefinition>) -> Result<Self, RegistryError> {
        let registry = Self { definitions };
        registry.validate()?;
        log::debug!("Loaded registry with {} definitions", registry.len());
        Ok(registry)
    }

    /// Checks the invariants every catalog must satisfy: property keys are
    /// unique, and conditionals refer to another property of the same
    /// definition.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (key, definition) in self.definitions.iter() {
            if let Some(dup) = definition.properties.first_duplicate() {
                return Err(RegistryError::DuplicateProperty {
                    definition: key.to_string(),
                    property: dup.to_string(),
                });
            }
            for (prop_key, schema) in definition.properties.iter() {
                let Some(cond) = &schema.conditional else {
                    continue;
                };
                if cond.property == prop_key {
                    return Err(RegistryError::SelfConditional {
                        definition: key.to_string(),
                        property: prop_key.to_string(),
                    });
                }
                if !definition.has_property(&cond.property) {
                    return Err(RegistryError::DanglingConditional {
                        definition: key.to_string(),
                        property: prop_key.to_string(),
                        target: cond.property.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up a definition by key.
    pub fn get(&self, key: &str) -> Option<&ComponentDefinition> {
        self.definitions.get(key)
    }

    /// Returns true if the key names a definition.
    pub fn contains(&self, key: &str) -> bool {
        self.definitions.contains_key(key)
    }

    /// Definition keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys()
    }

    /// `(key, definition)` pairs in catalog order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &ComponentDefinition)> {
        self.definitions.iter()
    }

    /// Finds the first definition rendering the given component identifier.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<(&str, &ComponentDefinition)> {
        self.definitions
            .iter()
            .find(|(_, def)| def.component_identifier == identifier)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn from_trusted(definitions: OrderedMap<ComponentDefinition>) -> Self {
        Self { definitions }
    }
}

impl serde::Serialize for Registry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.definitions.serialize(serializer)
    }
}
