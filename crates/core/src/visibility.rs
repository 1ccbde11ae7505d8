//! Conditional visibility of properties.
//!
//! A property with a `conditional` clause is shown only while its dependency
//! strictly equals the clause value. Dependencies resolve one level deep: a
//! property whose dependency is itself hidden is still judged only on the
//! dependency's current value.

use crate::config::Configuration;
use crate::registry::{ComponentDefinition, PropertySchema};

/// Evaluates a single schema against a configuration.
pub fn schema_is_visible(schema: &PropertySchema, config: &Configuration) -> bool {
    match &schema.conditional {
        None => true,
        Some(cond) => config.get(&cond.property) == Some(&cond.value),
    }
}

/// Returns whether `key` is currently relevant.
///
/// Properties without a conditional are always visible. Unknown keys are
/// reported as not visible.
///
/// # Examples
///
/// ```
/// use propkit_core::{ComponentDefinition, PropertySchema, PropertyType, is_visible, resolve_defaults};
///
/// let def = ComponentDefinition::new("Widget", "Widget")
///     .with_property("glare", PropertySchema::new(PropertyType::Boolean, false))
///     .with_property(
///         "glareColor",
///         PropertySchema::new(PropertyType::Color, "#fff").visible_when("glare", true),
///     );
/// let config = resolve_defaults(&def);
/// assert!(is_visible("glare", &def, &config));
/// assert!(!is_visible("glareColor", &def, &config));
/// ```
pub fn is_visible(key: &str, definition: &ComponentDefinition, config: &Configuration) -> bool {
    definition
        .property(key)
        .is_some_and(|schema| schema_is_visible(schema, config))
}

/// Keys of the currently visible properties, in declaration order.
pub fn visible_properties<'a>(
    definition: &'a ComponentDefinition,
    config: &Configuration,
) -> Vec<&'a str> {
    definition
        .properties
        .iter()
        .filter(|(_, schema)| schema_is_visible(schema, config))
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_defaults;
    use crate::registry::PropertyType;
    use crate::value::PropertyValue;

    fn definition() -> ComponentDefinition {
        ComponentDefinition::new("Widget", "Widget")
            .with_property(
                "mode",
                PropertySchema::new(PropertyType::Select, "simple").options(["simple", "advanced"]),
            )
            .with_property(
                "count",
                PropertySchema::new(PropertyType::String, "3"),
            )
            .with_property(
                "advanced",
                PropertySchema::new(PropertyType::Boolean, false).visible_when("mode", "advanced"),
            )
            .with_property(
                "depth",
                PropertySchema::new(PropertyType::Number, 1).visible_when("advanced", true),
            )
            .with_property(
                "numeric",
                PropertySchema::new(PropertyType::String, "").visible_when("count", 3),
            )
    }

    fn with(def: &ComponentDefinition, key: &str, value: PropertyValue) -> Configuration {
        let mut config = resolve_defaults(def);
        config.insert(key.to_string(), value);
        config
    }

    #[test]
    fn test_unconditional_is_always_visible() {
        let def = definition();
        for value in [PropertyValue::from("simple"), PropertyValue::from("advanced")] {
            let config = with(&def, "mode", value);
            assert!(is_visible("mode", &def, &config));
            assert!(is_visible("count", &def, &config));
        }
    }

    #[test]
    fn test_conditional_uses_strict_equality() {
        let def = definition();
        let config = resolve_defaults(&def);
        // "3" (string) never matches 3 (number)
        assert!(!is_visible("numeric", &def, &config));

        let config = with(&def, "count", PropertyValue::from(3));
        assert!(is_visible("numeric", &def, &config));
    }

    #[test]
    fn test_single_level_dependency() {
        let def = definition();
        // `advanced` is hidden (mode is simple) but holds `true`;
        // `depth` only looks at `advanced`'s value.
        let config = with(&def, "advanced", PropertyValue::from(true));
        assert!(!is_visible("advanced", &def, &config));
        assert!(is_visible("depth", &def, &config));
    }

    #[test]
    fn test_unknown_key_is_not_visible() {
        let def = definition();
        assert!(!is_visible("nope", &def, &resolve_defaults(&def)));
    }

    #[test]
    fn test_visible_properties_in_declaration_order() {
        let def = definition();
        let config = with(&def, "mode", PropertyValue::from("advanced"));
        assert_eq!(
            visible_properties(&def, &config),
            vec!["mode", "count", "advanced"]
        );
    }
}
