//! Seams to collaborators outside the engine: render targets, export sinks,
//! and change observers.
//!
//! The engine never depends on a rendering technology. A render target is
//! anything that can turn a definition and its configuration into an output
//! value; the dispatch table maps definition keys or component identifiers to
//! targets.

use crate::config::Configuration;
use crate::registry::ComponentDefinition;
use crate::store::PropertyChange;
use std::collections::HashMap;
use std::fmt;

/// The single "render" capability of a render target.
pub trait RenderTarget<O> {
    /// Renders the component with the given configuration.
    fn render(&self, definition: &ComponentDefinition, config: &Configuration) -> O;
}

impl<O, F> RenderTarget<O> for F
where
    F: Fn(&ComponentDefinition, &Configuration) -> O,
{
    fn render(&self, definition: &ComponentDefinition, config: &Configuration) -> O {
        (self)(definition, config)
    }
}

/// Dispatch table from definition keys or component identifiers to render
/// targets.
pub struct RenderDispatch<O> {
    targets: HashMap<String, Box<dyn RenderTarget<O>>>,
}

impl<O> RenderDispatch<O> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            targets: HashMap::new(),
        }
    }

    /// Registers a target under a definition key or component identifier.
    pub fn register<T>(&mut self, name: impl Into<String>, target: T)
    where
        T: RenderTarget<O> + 'static,
    {
        self.targets.insert(name.into(), Box::new(target));
    }

    /// Builder form of [`RenderDispatch::register`].
    pub fn with<T>(mut self, name: impl Into<String>, target: T) -> Self
    where
        T: RenderTarget<O> + 'static,
    {
        self.register(name, target);
        self
    }

    /// Returns true if a target is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Finds the target for a definition: by definition key first, then by
    /// component identifier.
    pub fn resolve(&self, key: &str, definition: &ComponentDefinition) -> Option<&dyn RenderTarget<O>> {
        self.targets
            .get(key)
            .or_else(|| self.targets.get(&definition.component_identifier))
            .map(|target| &**target)
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<O> Default for RenderDispatch<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for RenderDispatch<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RenderDispatch").field("targets", &names).finish()
    }
}

/// Receives synthesized code, e.g. a clipboard writer.
///
/// Failures are reported back but never affect engine state.
pub trait ExportSink {
    /// Error type of the sink.
    type Error: fmt::Display;

    /// Delivers the code.
    fn export(&self, code: &str) -> Result<(), Self::Error>;
}

/// Notified after every applied mutation.
pub trait ConfigObserver {
    /// Called with the change that was just applied.
    fn property_changed(&self, change: &PropertyChange);
}

impl<F> ConfigObserver for F
where
    F: Fn(&PropertyChange),
{
    fn property_changed(&self, change: &PropertyChange) {
        (self)(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_defaults;

    #[test]
    fn test_resolve_prefers_definition_key() {
        let def = ComponentDefinition::new("Widget", "Widget");
        let dispatch = RenderDispatch::new()
            .with("widget", |_: &ComponentDefinition, _: &Configuration| "by-key")
            .with("Widget", |_: &ComponentDefinition, _: &Configuration| "by-identifier");
        let config = resolve_defaults(&def);
        let target = dispatch.resolve("widget", &def).unwrap();
        assert_eq!(target.render(&def, &config), "by-key");
        let target = dispatch.resolve("other-key", &def).unwrap();
        assert_eq!(target.render(&def, &config), "by-identifier");
    }

    #[test]
    fn test_resolve_missing() {
        let def = ComponentDefinition::new("Widget", "Widget");
        let dispatch: RenderDispatch<()> = RenderDispatch::new();
        assert!(dispatch.resolve("widget", &def).is_none());
        assert!(dispatch.is_empty());
    }
}
