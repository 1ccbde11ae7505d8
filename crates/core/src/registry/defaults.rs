//! Built-in gallery catalog.
//!
//! These definitions back the public playground when no custom catalog is
//! supplied. The catalog is built on first use and shared for the rest of the
//! process; it is still an ordinary [`Registry`], so nothing forces callers to
//! use it.

use super::Registry;
use super::ordered::OrderedMap;
use super::types::{ComponentDefinition, PropertySchema, PropertyType};
use crate::value::PropertyValue;
use once_cell::sync::Lazy;
use serde_json::json;

static BUILTIN: Lazy<Registry> = Lazy::new(|| {
    let definitions: OrderedMap<ComponentDefinition> = [
        ("particles", particles()),
        ("tilt-card", tilt_card()),
        ("shiny-button", shiny_button()),
        ("marquee", marquee()),
        ("gradient-text", gradient_text()),
    ]
    .into_iter()
    .collect();
    Registry::from_trusted(definitions)
});

/// Returns the built-in gallery registry.
///
/// # Example
///
/// ```
/// use propkit_core::registry::defaults::builtin_registry;
///
/// let registry = builtin_registry();
/// assert!(registry.contains("tilt-card"));
/// assert_eq!(registry.get("particles").unwrap().component_identifier, "Particles");
/// ```
pub fn builtin_registry() -> &'static Registry {
    &BUILTIN
}

fn particles() -> ComponentDefinition {
    ComponentDefinition::new("Particles", "Particles")
        .with_property(
            "quantity",
            PropertySchema::new(PropertyType::Number, 100)
                .label("Quantity")
                .description("Number of particles on the canvas")
                .category("Simulation")
                .range(10.0, 500.0, 10.0),
        )
        .with_property(
            "staticity",
            PropertySchema::new(PropertyType::Number, 50)
                .label("Staticity")
                .description("How strongly particles resist the cursor")
                .category("Simulation")
                .range(0.0, 100.0, 1.0),
        )
        .with_property(
            "ease",
            PropertySchema::new(PropertyType::Number, 50)
                .label("Ease")
                .category("Simulation")
                .range(0.0, 100.0, 1.0),
        )
        .with_property(
            "size",
            PropertySchema::new(PropertyType::Number, 0.4)
                .label("Size")
                .category("Appearance")
                .range(0.1, 2.0, 0.1),
        )
        .with_property(
            "color",
            PropertySchema::new(PropertyType::Color, "#ffffff")
                .label("Color")
                .category("Appearance"),
        )
        .with_property(
            "vx",
            PropertySchema::new(PropertyType::Number, 0)
                .label("Horizontal drift")
                .category("Motion")
                .range(-1.0, 1.0, 0.05),
        )
        .with_property(
            "vy",
            PropertySchema::new(PropertyType::Number, 0)
                .label("Vertical drift")
                .category("Motion")
                .range(-1.0, 1.0, 0.05),
        )
}

fn tilt_card() -> ComponentDefinition {
    ComponentDefinition::new("Tilt Card", "TiltCard")
        .with_property(
            "maxTilt",
            PropertySchema::new(PropertyType::Number, 15)
                .label("Max tilt")
                .description("Maximum rotation in degrees")
                .range(0.0, 45.0, 1.0),
        )
        .with_property(
            "perspective",
            PropertySchema::new(PropertyType::Number, 1000)
                .label("Perspective")
                .range(200.0, 2000.0, 50.0),
        )
        .with_property(
            "scale",
            PropertySchema::new(PropertyType::Number, 1.05)
                .label("Hover scale")
                .range(1.0, 1.5, 0.01),
        )
        .with_property(
            "glare",
            PropertySchema::new(PropertyType::Boolean, true).label("Glare"),
        )
        .with_property(
            "glareColor",
            PropertySchema::new(PropertyType::Color, "#ffffff")
                .label("Glare color")
                .visible_when("glare", true),
        )
        .with_property(
            "glareOpacity",
            PropertySchema::new(PropertyType::Number, 0.3)
                .label("Glare opacity")
                .range(0.0, 1.0, 0.05)
                .visible_when("glare", true),
        )
        .with_property(
            "children",
            PropertySchema::new(
                PropertyType::Textarea,
                r#"<h3 className="card-title">Tilt me</h3>"#,
            )
            .label("Content"),
        )
}

fn shiny_button() -> ComponentDefinition {
    ComponentDefinition::new("Shiny Button", "ShinyButton")
        .with_property(
            "variant",
            PropertySchema::new(PropertyType::Select, "primary")
                .label("Variant")
                .options(["primary", "secondary", "ghost"]),
        )
        .with_property(
            "size",
            PropertySchema::new(PropertyType::Select, "md")
                .label("Size")
                .options(["sm", "md", "lg"]),
        )
        .with_property(
            "shimmerColor",
            PropertySchema::new(PropertyType::Color, "#ffffff")
                .label("Shimmer color")
                .visible_when("variant", "primary"),
        )
        .with_property(
            "disabled",
            PropertySchema::new(PropertyType::Boolean, false).label("Disabled"),
        )
        .with_property(
            "children",
            PropertySchema::new(PropertyType::String, "Click me").label("Label"),
        )
}

fn marquee() -> ComponentDefinition {
    ComponentDefinition::new("Marquee", "Marquee")
        .with_property(
            "items",
            PropertySchema::new(
                PropertyType::Multiselect,
                PropertyValue::Array(vec![json!("Rust"), json!("React"), json!("Svelte")]),
            )
            .label("Items")
            .options(["Rust", "React", "Svelte", "Vue", "Solid"]),
        )
        .with_property(
            "reverse",
            PropertySchema::new(PropertyType::Boolean, false).label("Reverse"),
        )
        .with_property(
            "pauseOnHover",
            PropertySchema::new(PropertyType::Boolean, true).label("Pause on hover"),
        )
        .with_property(
            "vertical",
            PropertySchema::new(PropertyType::Boolean, false).label("Vertical"),
        )
        .with_property(
            "repeat",
            PropertySchema::new(PropertyType::Number, 4)
                .label("Repeat")
                .range(1.0, 10.0, 1.0),
        )
        .with_property(
            "style",
            PropertySchema::new(
                PropertyType::Object,
                PropertyValue::Object(
                    json!({ "--duration": "40s", "--gap": "1rem" })
                        .as_object()
                        .cloned()
                        .unwrap_or_default(),
                ),
            )
            .label("Style")
            .description("Inline CSS custom properties"),
        )
}

fn gradient_text() -> ComponentDefinition {
    ComponentDefinition::new("Gradient Text", "GradientText")
        .with_property(
            "colors",
            PropertySchema::new(
                PropertyType::Object,
                PropertyValue::Array(vec![json!("#ffaa40"), json!("#9c40ff"), json!("#ffaa40")]),
            )
            .label("Colors"),
        )
        .with_property(
            "animationSpeed",
            PropertySchema::new(PropertyType::Number, 8)
                .label("Animation speed")
                .range(1.0, 20.0, 1.0),
        )
        .with_property(
            "showBorder",
            PropertySchema::new(PropertyType::Boolean, false).label("Show border"),
        )
        .with_property(
            "children",
            PropertySchema::new(PropertyType::String, "Gradient magic").label("Text"),
        )
}
