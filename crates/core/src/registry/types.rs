//! Registry type definitions for editable component schemas.

use super::ordered::OrderedMap;
use crate::value::PropertyValue;
use serde::{Deserialize, Serialize};

/// Editor control type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Single-line text.
    String,
    /// Numeric input or slider.
    Number,
    /// Checkbox.
    Boolean,
    /// One value out of `options`.
    Select,
    /// Color picker; stored as text.
    Color,
    /// JSON object or array edited as text.
    Object,
    /// Multi-line text.
    Textarea,
    /// Any subset of `options`.
    Multiselect,
}

impl PropertyType {
    /// Returns the lowercase name used in catalog files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Color => "color",
            Self::Object => "object",
            Self::Textarea => "textarea",
            Self::Multiselect => "multiselect",
        }
    }
}

/// Makes a property relevant only while another property holds a given value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    /// Key of the property this one depends on.
    pub property: String,
    /// Value the dependency must hold, compared strictly.
    pub value: PropertyValue,
}

/// Schema of a single editable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    /// Control type.
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Initial value.
    pub default: PropertyValue,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Optional help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional editor grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lower bound hint for numeric controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound hint for numeric controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Step hint for numeric controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Choices for select and multiselect controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PropertyValue>>,
    /// Visibility rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Conditional>,
}

impl PropertySchema {
    /// Creates a schema with the given type and default, and no constraints.
    pub fn new(kind: PropertyType, default: impl Into<PropertyValue>) -> Self {
        Self {
            kind,
            default: default.into(),
            label: String::new(),
            description: None,
            category: None,
            min: None,
            max: None,
            step: None,
            options: None,
            conditional: None,
        }
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets min/max/step hints.
    pub fn range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self.step = Some(step);
        self
    }

    /// Sets the option list.
    pub fn options<I, T>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PropertyValue>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Makes the property visible only while `property` equals `value`.
    pub fn visible_when(mut self, property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.conditional = Some(Conditional {
            property: property.into(),
            value: value.into(),
        });
        self
    }

    /// True for object-typed properties and compound defaults.
    pub fn is_compound(&self) -> bool {
        self.kind == PropertyType::Object || self.default.is_compound()
    }
}

/// A named, schema-described editable component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Display name (e.g., "Tilt Card").
    pub name: String,
    /// Identifier emitted in synthesized code and used for render dispatch.
    pub component_identifier: String,
    /// Editable properties in declaration order.
    #[serde(default)]
    pub properties: OrderedMap<PropertySchema>,
}

impl ComponentDefinition {
    /// Creates a definition with no properties.
    pub fn new(name: impl Into<String>, component_identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_identifier: component_identifier.into(),
            properties: OrderedMap::new(),
        }
    }

    /// Appends a property; redeclaring a key replaces its schema in place.
    pub fn with_property(mut self, key: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(key, schema);
        self
    }

    /// Looks up a property schema.
    pub fn property(&self, key: &str) -> Option<&PropertySchema> {
        self.properties.get(key)
    }

    /// Returns true if the property is declared.
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Property keys in declaration order.
    pub fn property_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys()
    }

    /// Groups property keys by category, keeping first-seen category order.
    /// Properties without a category fall under `None`.
    pub fn categories(&self) -> Vec<(Option<&str>, Vec<&str>)> {
        let mut groups: Vec<(Option<&str>, Vec<&str>)> = Vec::new();
        for (key, schema) in self.properties.iter() {
            let category = schema.category.as_deref();
            match groups.iter_mut().find(|(c, _)| *c == category) {
                Some((_, keys)) => keys.push(key),
                None => groups.push((category, vec![key])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_catalog_json() {
        let json = r#"{
            "type": "number",
            "default": 20,
            "label": "Speed",
            "min": 0,
            "max": 100,
            "step": 5,
            "conditional": { "property": "animated", "value": true }
        }"#;
        let schema: PropertySchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.kind, PropertyType::Number);
        assert_eq!(schema.default, PropertyValue::Number(20.0));
        assert_eq!(schema.step, Some(5.0));
        let cond = schema.conditional.unwrap();
        assert_eq!(cond.property, "animated");
        assert_eq!(cond.value, PropertyValue::Boolean(true));
    }

    #[test]
    fn test_definition_keeps_declaration_order() {
        let json = r#"{
            "name": "Widget",
            "componentIdentifier": "Widget",
            "properties": {
                "zeta": { "type": "string", "default": "z", "label": "Zeta" },
                "alpha": { "type": "boolean", "default": false, "label": "Alpha" }
            }
        }"#;
        let def: ComponentDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.property_keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert!(def.has_property("alpha"));
        assert!(!def.has_property("beta"));
    }

    #[test]
    fn test_categories_group_in_first_seen_order() {
        let def = ComponentDefinition::new("Widget", "Widget")
            .with_property(
                "a",
                PropertySchema::new(PropertyType::String, "").category("Look"),
            )
            .with_property("b", PropertySchema::new(PropertyType::String, ""))
            .with_property(
                "c",
                PropertySchema::new(PropertyType::String, "").category("Look"),
            );
        assert_eq!(
            def.categories(),
            vec![(Some("Look"), vec!["a", "c"]), (None, vec!["b"])]
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{ "type": "date", "default": "" }"#;
        assert!(serde_json::from_str::<PropertySchema>(json).is_err());
    }
}
