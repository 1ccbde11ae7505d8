//! Code synthesis: serializes a definition and its configuration into a JSX
//! invocation string.
//!
//! Attributes follow the definition's declaration order, never the order in
//! which the configuration was edited, so equal inputs always produce
//! byte-identical output. The output is text only; nothing here evaluates it.

use crate::config::Configuration;
use crate::registry::ComponentDefinition;
use crate::value::{PropertyValue, compact_json, format_number};

/// Property key rendered as element content rather than as an attribute.
pub const CHILDREN_KEY: &str = "children";

/// Formatting options for synthesized code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Spaces per indentation level for attributes and children.
    pub indent: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Converts a Rust string to a JavaScript string literal.
///
/// Uses JSON serialization to properly escape special characters.
///
/// # Examples
///
/// ```
/// use propkit_core::synth::js_string_literal;
///
/// assert_eq!(js_string_literal("hello"), "\"hello\"");
/// assert_eq!(js_string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
pub fn js_string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Renders one `key=value` attribute.
///
/// Plain strings are quoted; strings that cannot sit inside a JSX string
/// attribute, and every other value, are wrapped in braces.
///
/// # Examples
///
/// ```
/// use propkit_core::PropertyValue;
/// use propkit_core::synth::render_attribute;
///
/// assert_eq!(render_attribute("color", &PropertyValue::from("#fff")), "color=\"#fff\"");
/// assert_eq!(render_attribute("size", &PropertyValue::from(3)), "size={3}");
/// assert_eq!(render_attribute("open", &PropertyValue::from(false)), "open={false}");
/// assert_eq!(render_attribute("label", &PropertyValue::from("a \"b\"")), "label={\"a \\\"b\\\"\"}");
/// ```
pub fn render_attribute(key: &str, value: &PropertyValue) -> String {
    match value {
        PropertyValue::String(s) if needs_expression(s) => {
            format!("{}={{{}}}", key, js_string_literal(s))
        }
        PropertyValue::String(s) => format!("{}=\"{}\"", key, s),
        other => format!("{}={{{}}}", key, literal(other)),
    }
}

fn needs_expression(s: &str) -> bool {
    s.contains(['"', '\n', '\r'])
}

fn literal(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Boolean(b) => b.to_string(),
        PropertyValue::Number(n) => format_number(*n),
        PropertyValue::String(s) => js_string_literal(s),
        PropertyValue::Array(_) | PropertyValue::Object(_) => compact_json(&value.to_json()),
    }
}

/// Element content for the `children` value, if any. Empty strings mean no
/// content; non-string values become an expression.
fn children_content(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::String(s) if s.is_empty() => None,
        PropertyValue::String(s) => Some(s.clone()),
        other => Some(format!("{{{}}}", literal(other))),
    }
}

/// Synthesizes with the default options.
///
/// # Examples
///
/// ```
/// use propkit_core::{ComponentDefinition, PropertySchema, PropertyType, resolve_defaults, synthesize};
///
/// let def = ComponentDefinition::new("Widget", "Widget")
///     .with_property("color", PropertySchema::new(PropertyType::Color, "#fff"))
///     .with_property("children", PropertySchema::new(PropertyType::String, ""));
/// assert_eq!(synthesize(&def, &resolve_defaults(&def)), "<Widget\n  color=\"#fff\"\n/>");
/// ```
pub fn synthesize(definition: &ComponentDefinition, config: &Configuration) -> String {
    synthesize_with_options(definition, config, &SynthesisOptions::default())
}

/// Serializes `(definition, config)` into a JSX invocation.
///
/// Each attribute sits on its own indented line. Non-empty children produce
/// an opening tag, the indented content, and a closing tag; otherwise the
/// tag self-closes. With no attributes the tag stays on one line.
pub fn synthesize_with_options(
    definition: &ComponentDefinition,
    config: &Configuration,
    options: &SynthesisOptions,
) -> String {
    let tag = definition.component_identifier.as_str();
    let pad = " ".repeat(options.indent);

    let attributes: Vec<String> = definition
        .property_keys()
        .filter(|key| *key != CHILDREN_KEY)
        .filter_map(|key| config.get(key).map(|value| render_attribute(key, value)))
        .collect();
    let children = config.get(CHILDREN_KEY).and_then(children_content);

    let mut out = String::with_capacity(64);
    out.push('<');
    out.push_str(tag);

    if !attributes.is_empty() {
        for attribute in &attributes {
            out.push('\n');
            out.push_str(&pad);
            out.push_str(attribute);
        }
        out.push('\n');
    }

    let Some(content) = children else {
        if attributes.is_empty() {
            out.push(' ');
        }
        out.push_str("/>");
        return out;
    };

    out.push('>');
    for line in content.lines() {
        out.push('\n');
        if !line.trim().is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    out.push_str("\n</");
    out.push_str(tag);
    out.push('>');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_defaults;
    use crate::registry::defaults::builtin_registry;
    use crate::registry::{PropertySchema, PropertyType};
    use crate::store::ConfigStore;

    fn widget() -> ComponentDefinition {
        ComponentDefinition::new("Widget", "Widget")
            .with_property("color", PropertySchema::new(PropertyType::Color, "#fff"))
            .with_property("children", PropertySchema::new(PropertyType::String, ""))
    }

    #[test]
    fn test_scenario_b_self_closing() {
        let def = widget();
        let config = resolve_defaults(&def);
        assert_eq!(synthesize(&def, &config), "<Widget\n  color=\"#fff\"\n/>");
    }

    #[test]
    fn test_scenario_c_with_children() {
        let mut store = ConfigStore::new("widget", widget());
        store.set_property("children", "Hello").unwrap();
        assert_eq!(
            synthesize(store.definition(), store.config()),
            "<Widget\n  color=\"#fff\"\n>\n  Hello\n</Widget>"
        );
    }

    #[test]
    fn test_no_attributes() {
        let def = ComponentDefinition::new("Spacer", "Spacer");
        assert_eq!(synthesize(&def, &resolve_defaults(&def)), "<Spacer />");

        let def = ComponentDefinition::new("Label", "Label")
            .with_property("children", PropertySchema::new(PropertyType::String, "Hi"));
        assert_eq!(
            synthesize(&def, &resolve_defaults(&def)),
            "<Label>\n  Hi\n</Label>"
        );
    }

    #[test]
    fn test_declaration_order_regardless_of_mutation_order() {
        let def = ComponentDefinition::new("Widget", "Widget")
            .with_property("b", PropertySchema::new(PropertyType::String, ""))
            .with_property("a", PropertySchema::new(PropertyType::Number, 0));

        let mut first = ConfigStore::new("widget", def.clone());
        first.set_property("a", 1).unwrap();
        first.set_property("b", "x").unwrap();

        let mut second = ConfigStore::new("widget", def.clone());
        second.set_property("b", "x").unwrap();
        second.set_property("a", 1).unwrap();

        let options = SynthesisOptions::default();
        assert_eq!(first.synthesize(&options), second.synthesize(&options));
        assert_eq!(first.synthesize(&options), "<Widget\n  b=\"x\"\n  a={1}\n/>");
    }

    #[test]
    fn test_multiline_children_are_indented() {
        let def = ComponentDefinition::new("Card", "Card").with_property(
            "children",
            PropertySchema::new(PropertyType::Textarea, "<h3>Title</h3>\n\n<p>Body</p>"),
        );
        let out = synthesize_with_options(
            &def,
            &resolve_defaults(&def),
            &SynthesisOptions { indent: 4 },
        );
        assert_eq!(out, "<Card>\n    <h3>Title</h3>\n\n    <p>Body</p>\n</Card>");
    }

    #[test]
    fn test_builtin_tilt_card() {
        let def = builtin_registry().get("tilt-card").unwrap();
        insta::assert_snapshot!(synthesize(def, &resolve_defaults(def)), @r##"
        <TiltCard
          maxTilt={15}
          perspective={1000}
          scale={1.05}
          glare={true}
          glareColor="#ffffff"
          glareOpacity={0.3}
        >
          <h3 className="card-title">Tilt me</h3>
        </TiltCard>
        "##);
    }

    #[test]
    fn test_builtin_marquee_compound_values() {
        let def = builtin_registry().get("marquee").unwrap();
        insta::assert_snapshot!(synthesize(def, &resolve_defaults(def)), @r#"
        <Marquee
          items={["Rust","React","Svelte"]}
          reverse={false}
          pauseOnHover={true}
          vertical={false}
          repeat={4}
          style={{"--duration":"40s","--gap":"1rem"}}
        />
        "#);
    }
}
