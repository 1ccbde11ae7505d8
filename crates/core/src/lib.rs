#![deny(missing_docs)]
//! propkit core: component registry, editable configuration, and code synthesis.

/// Render targets, export sinks, and change observers.
pub mod boundary;
/// Configuration state and default resolution.
pub mod config;
/// Error types.
pub mod error;
/// Selection lifecycle for one playground session.
pub mod playground;
/// Component definition catalog.
pub mod registry;
/// Typed mutation of a live configuration.
pub mod store;
/// JSX code synthesis.
pub mod synth;
/// Property values.
pub mod value;
/// Conditional visibility of properties.
pub mod visibility;

pub use boundary::{ConfigObserver, ExportSink, RenderDispatch, RenderTarget};
pub use config::{Configuration, resolve_defaults};
pub use error::{PlaygroundError, RegistryError};
pub use playground::{Playground, SelectionState};
pub use registry::{
    ComponentDefinition, Conditional, PropertySchema, PropertyType, Registry,
    defaults::builtin_registry,
};
pub use store::{ConfigStore, PropertyChange, coerce_input};
pub use synth::{CHILDREN_KEY, SynthesisOptions, synthesize, synthesize_with_options};
pub use value::PropertyValue;
pub use visibility::{is_visible, visible_properties};
