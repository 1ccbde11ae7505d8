//! Playground session: the selection lifecycle around a registry.
//!
//! A session is either `Empty` or `Configured`. Selecting a key that resolves
//! in the registry binds a fresh default configuration; selecting an unknown
//! key leaves the session empty. Mutations, visibility queries, synthesis and
//! rendering all act on the configured definition.

use crate::boundary::{ConfigObserver, ExportSink, RenderDispatch};
use crate::config::Configuration;
use crate::error::PlaygroundError;
use crate::registry::{ComponentDefinition, Registry};
use crate::store::ConfigStore;
use crate::synth::SynthesisOptions;
use crate::value::PropertyValue;
use std::fmt;
use std::sync::Arc;

/// Observable state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No definition is selected.
    Empty,
    /// A definition is selected and its configuration is live.
    Configured,
}

/// One playground session over a shared, read-only registry.
pub struct Playground {
    registry: Arc<Registry>,
    store: Option<ConfigStore>,
    options: SynthesisOptions,
    observers: Vec<Box<dyn ConfigObserver>>,
    generation: u64,
    render_epoch: u64,
}

impl Playground {
    /// Creates an empty session.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            store: None,
            options: SynthesisOptions::default(),
            observers: Vec::new(),
            generation: 0,
            render_epoch: 0,
        }
    }

    /// Creates a session, preselecting `initial` when it names a definition.
    ///
    /// An invalid or absent key is ignored and the session starts empty.
    pub fn with_initial_selection(registry: Arc<Registry>, initial: Option<&str>) -> Self {
        let mut playground = Self::new(registry);
        if let Some(key) = initial {
            if let Err(err) = playground.select(key) {
                log::debug!("Ignoring initial selection: {}", err);
            }
        }
        playground
    }

    /// Replaces the synthesis options.
    pub fn with_options(mut self, options: SynthesisOptions) -> Self {
        self.options = options;
        self
    }

    /// The registry this session reads from.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current state.
    pub fn state(&self) -> SelectionState {
        if self.store.is_some() {
            SelectionState::Configured
        } else {
            SelectionState::Empty
        }
    }

    /// Selects a definition, discarding the previous configuration.
    ///
    /// An unknown key empties the session and returns
    /// [`PlaygroundError::UnknownDefinition`].
    pub fn select(&mut self, key: &str) -> Result<(), PlaygroundError> {
        self.generation += 1;
        match self.registry.get(key) {
            Some(definition) => {
                self.store = Some(ConfigStore::new(key, definition.clone()));
                Ok(())
            }
            None => {
                log::debug!("Definition `{}` not found", key);
                self.store = None;
                Err(PlaygroundError::unknown_definition(key))
            }
        }
    }

    /// Key of the selected definition.
    pub fn selected_key(&self) -> Option<&str> {
        self.store.as_ref().map(ConfigStore::key)
    }

    /// The selected definition.
    pub fn definition(&self) -> Option<&ComponentDefinition> {
        self.store.as_ref().map(ConfigStore::definition)
    }

    /// The live configuration.
    pub fn config(&self) -> Option<&Configuration> {
        self.store.as_ref().map(ConfigStore::config)
    }

    /// The live store.
    pub fn store(&self) -> Option<&ConfigStore> {
        self.store.as_ref()
    }

    /// Current value of a property of the selected definition.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.store.as_ref().and_then(|store| store.get(key))
    }

    /// Applies a mutation and notifies observers.
    pub fn set_property(
        &mut self,
        key: &str,
        input: impl Into<PropertyValue>,
    ) -> Result<(), PlaygroundError> {
        let store = self.store.as_mut().ok_or(PlaygroundError::NoSelection)?;
        let change = store.set_property(key, input)?;
        self.generation += 1;
        for observer in &self.observers {
            observer.property_changed(&change);
        }
        Ok(())
    }

    /// Restores the selected definition's defaults.
    pub fn reset(&mut self) -> Result<(), PlaygroundError> {
        let store = self.store.as_mut().ok_or(PlaygroundError::NoSelection)?;
        store.reset();
        self.generation += 1;
        Ok(())
    }

    /// Returns whether a property of the selected definition is relevant.
    pub fn is_visible(&self, key: &str) -> bool {
        self.store.as_ref().is_some_and(|store| store.is_visible(key))
    }

    /// Visible property keys in declaration order; empty when nothing is
    /// selected.
    pub fn visible_properties(&self) -> Vec<&str> {
        self.store
            .as_ref()
            .map(ConfigStore::visible_properties)
            .unwrap_or_default()
    }

    /// Synthesized code for the current state.
    pub fn synthesize(&self) -> Option<String> {
        self.store
            .as_ref()
            .map(|store| store.synthesize(&self.options))
    }

    /// Renders the selected definition through the dispatch table.
    pub fn render<O>(&self, dispatch: &RenderDispatch<O>) -> Result<O, PlaygroundError> {
        let store = self.store.as_ref().ok_or(PlaygroundError::NoSelection)?;
        let definition = store.definition();
        match dispatch.resolve(store.key(), definition) {
            Some(target) => Ok(target.render(definition, store.config())),
            None => {
                log::warn!(
                    "No render target for `{}` ({})",
                    store.key(),
                    definition.component_identifier
                );
                Err(PlaygroundError::RenderTargetMissing {
                    definition: store.key().to_string(),
                    identifier: definition.component_identifier.clone(),
                })
            }
        }
    }

    /// Hands the synthesized code to an export sink.
    ///
    /// Returns whether the sink accepted it. Failures are logged and have no
    /// effect on the session.
    pub fn export<S: ExportSink>(&self, sink: &S) -> bool {
        let Some(code) = self.synthesize() else {
            return false;
        };
        match sink.export(&code) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("Export failed: {}", err);
                false
            }
        }
    }

    /// Registers an observer for applied mutations.
    pub fn subscribe<T: ConfigObserver + 'static>(&mut self, observer: T) {
        self.observers.push(Box::new(observer));
    }

    /// Requests a remount of the render target without touching the
    /// configuration. Returns the new epoch.
    pub fn refresh(&mut self) -> u64 {
        self.render_epoch += 1;
        self.render_epoch
    }

    /// Remount counter bumped by [`Playground::refresh`].
    pub fn render_epoch(&self) -> u64 {
        self.render_epoch
    }

    /// State generation; bumped on every `select`, applied mutation and
    /// `reset`.
    ///
    /// Capture it before starting asynchronous work (highlighting, copying)
    /// and pass it to [`Playground::accept_async`] when the result arrives.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Keeps an asynchronous result only if the state has not changed since
    /// `generation` was captured.
    pub fn accept_async<T>(&self, generation: u64, value: T) -> Option<T> {
        if generation == self.generation {
            Some(value)
        } else {
            log::debug!(
                "Dropping stale result from generation {} (current {})",
                generation,
                self.generation
            );
            None
        }
    }
}

impl fmt::Debug for Playground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playground")
            .field("selected", &self.selected_key())
            .field("config", &self.config())
            .field("observers", &self.observers.len())
            .field("generation", &self.generation)
            .field("render_epoch", &self.render_epoch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::defaults::builtin_registry;
    use crate::registry::{PropertySchema, PropertyType};
    use crate::store::PropertyChange;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry() -> Arc<Registry> {
        let widget = ComponentDefinition::new("Widget", "Widget")
            .with_property("color", PropertySchema::new(PropertyType::Color, "#fff"))
            .with_property("children", PropertySchema::new(PropertyType::String, ""));
        let orphan = ComponentDefinition::new("Orphan", "Orphan");
        Arc::new(Registry::from_definitions([("widget", widget), ("orphan", orphan)]).unwrap())
    }

    #[test]
    fn test_starts_empty() {
        let playground = Playground::new(registry());
        assert_eq!(playground.state(), SelectionState::Empty);
        assert!(playground.synthesize().is_none());
        assert!(playground.visible_properties().is_empty());
    }

    #[test]
    fn test_select_known_definition() {
        let mut playground = Playground::new(registry());
        playground.select("widget").unwrap();
        assert_eq!(playground.state(), SelectionState::Configured);
        assert_eq!(playground.selected_key(), Some("widget"));
        assert_eq!(playground.get("color"), Some(&PropertyValue::from("#fff")));
    }

    #[test]
    fn test_select_unknown_definition() {
        let mut playground = Playground::new(registry());
        let err = playground.select("missing").unwrap_err();
        assert_eq!(err, PlaygroundError::unknown_definition("missing"));
        assert_eq!(playground.state(), SelectionState::Empty);

        playground.select("widget").unwrap();
        assert!(playground.select("missing").is_err());
        assert_eq!(playground.state(), SelectionState::Empty);
    }

    #[test]
    fn test_reselect_discards_configuration() {
        let mut playground = Playground::new(registry());
        playground.select("widget").unwrap();
        playground.set_property("color", "#000").unwrap();
        playground.select("orphan").unwrap();
        playground.select("widget").unwrap();
        assert_eq!(playground.get("color"), Some(&PropertyValue::from("#fff")));
    }

    #[test]
    fn test_set_property_without_selection() {
        let mut playground = Playground::new(registry());
        assert_eq!(
            playground.set_property("color", "#000"),
            Err(PlaygroundError::NoSelection)
        );
    }

    #[test]
    fn test_initial_selection() {
        let playground = Playground::with_initial_selection(registry(), Some("widget"));
        assert_eq!(playground.selected_key(), Some("widget"));

        let playground = Playground::with_initial_selection(registry(), Some("bogus"));
        assert_eq!(playground.state(), SelectionState::Empty);

        let playground = Playground::with_initial_selection(registry(), None);
        assert_eq!(playground.state(), SelectionState::Empty);
    }

    #[test]
    fn test_render_dispatch() {
        let dispatch = RenderDispatch::new().with(
            "Widget",
            |def: &ComponentDefinition, config: &Configuration| {
                format!("{}:{}", def.component_identifier, config.len())
            },
        );

        let mut playground = Playground::new(registry());
        assert_eq!(playground.render(&dispatch), Err(PlaygroundError::NoSelection));

        playground.select("widget").unwrap();
        assert_eq!(playground.render(&dispatch).unwrap(), "Widget:2");

        playground.select("orphan").unwrap();
        assert!(matches!(
            playground.render(&dispatch),
            Err(PlaygroundError::RenderTargetMissing { ref identifier, .. }) if identifier == "Orphan"
        ));
    }

    #[test]
    fn test_observers_see_applied_changes_only() {
        let seen: Rc<RefCell<Vec<PropertyChange>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut playground = Playground::new(registry());
        playground.subscribe(move |change: &PropertyChange| sink.borrow_mut().push(change.clone()));
        playground.select("widget").unwrap();
        playground.set_property("color", "#000").unwrap();
        assert!(playground.set_property("nope", "x").is_err());

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].key, "color");
        assert_eq!(seen[0].previous, Some(PropertyValue::from("#fff")));
        assert_eq!(seen[0].current, PropertyValue::from("#000"));
    }

    struct FailingClipboard;

    impl ExportSink for FailingClipboard {
        type Error = String;

        fn export(&self, _code: &str) -> Result<(), String> {
            Err("clipboard unavailable".to_string())
        }
    }

    struct RecordingClipboard(RefCell<Option<String>>);

    impl ExportSink for RecordingClipboard {
        type Error = String;

        fn export(&self, code: &str) -> Result<(), String> {
            *self.0.borrow_mut() = Some(code.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_export_failure_does_not_change_state() {
        let mut playground = Playground::new(registry());
        playground.select("widget").unwrap();
        let before = playground.config().cloned();

        assert!(!playground.export(&FailingClipboard));
        assert_eq!(playground.config().cloned(), before);

        let clipboard = RecordingClipboard(RefCell::new(None));
        assert!(playground.export(&clipboard));
        assert_eq!(
            clipboard.0.borrow().as_deref(),
            Some("<Widget\n  color=\"#fff\"\n/>")
        );
    }

    #[test]
    fn test_refresh_keeps_configuration() {
        let mut playground = Playground::new(registry());
        playground.select("widget").unwrap();
        playground.set_property("color", "#123").unwrap();
        assert_eq!(playground.refresh(), 1);
        assert_eq!(playground.render_epoch(), 1);
        assert_eq!(playground.get("color"), Some(&PropertyValue::from("#123")));
    }

    #[test]
    fn test_stale_async_results_are_dropped() {
        let mut playground = Playground::new(registry());
        playground.select("widget").unwrap();
        let token = playground.generation();
        assert_eq!(playground.accept_async(token, "highlighted"), Some("highlighted"));

        playground.select("orphan").unwrap();
        assert_eq!(playground.accept_async(token, "highlighted"), None);
    }

    #[test]
    fn test_async_result_dropped_after_mutation() {
        let mut playground = Playground::new(registry());
        playground.select("widget").unwrap();
        let token = playground.generation();
        let pending = playground.synthesize().unwrap();

        playground.set_property("color", "#000").unwrap();
        assert_eq!(playground.accept_async(token, pending), None);

        let token = playground.generation();
        assert!(playground.set_property("bogus", 1).is_err());
        assert_eq!(playground.accept_async(token, "kept"), Some("kept"));

        playground.reset().unwrap();
        assert_eq!(playground.accept_async(token, "after reset"), None);
        assert_eq!(
            playground.synthesize().as_deref(),
            Some("<Widget\n  color=\"#fff\"\n/>")
        );
    }

    #[test]
    fn test_reset() {
        let mut playground = Playground::new(builtin_registry().clone().into());
        assert_eq!(playground.reset(), Err(PlaygroundError::NoSelection));
        playground.select("tilt-card").unwrap();
        playground.set_property("glare", false).unwrap();
        assert!(!playground.is_visible("glareColor"));
        playground.reset().unwrap();
        assert!(playground.is_visible("glareColor"));
    }
}
