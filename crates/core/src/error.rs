use thiserror::Error;

/// Errors surfaced by the playground engine.
///
/// Every variant is recoverable: the selection and the live configuration are
/// left exactly as they were before the failing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaygroundError {
    /// `select` was given a key that is not in the registry.
    #[error("definition not found: {key}")]
    UnknownDefinition {
        /// Requested definition key
        key: String,
    },
    /// A mutation named a property the bound definition does not declare.
    #[error("unknown property `{key}` for definition `{definition}`")]
    UnknownProperty {
        /// Key of the bound definition
        definition: String,
        /// Rejected property key
        key: String,
    },
    /// Input could not be coerced into the property's declared type.
    #[error("malformed value for `{key}`: {reason}")]
    MalformedValue {
        /// Property key
        key: String,
        /// Why the input was rejected
        reason: String,
    },
    /// The definition exists but no render target is registered for it.
    #[error("render target missing for `{definition}` ({identifier})")]
    RenderTargetMissing {
        /// Key of the selected definition
        definition: String,
        /// Component identifier that was looked up
        identifier: String,
    },
    /// The operation needs a selected definition and none is selected.
    #[error("no definition selected")]
    NoSelection,
}

impl PlaygroundError {
    /// Create an unknown definition error
    pub fn unknown_definition(key: impl Into<String>) -> Self {
        Self::UnknownDefinition { key: key.into() }
    }

    /// Create an unknown property error
    pub fn unknown_property(definition: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnknownProperty {
            definition: definition.into(),
            key: key.into(),
        }
    }

    /// Create a malformed value error
    pub fn malformed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading or validating a registry catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The catalog JSON could not be decoded.
    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A conditional clause points at a property the definition lacks.
    #[error(
        "`{definition}.{property}` is conditional on `{target}`, which `{definition}` does not declare"
    )]
    DanglingConditional {
        /// Definition key
        definition: String,
        /// Property carrying the conditional
        property: String,
        /// Missing dependency
        target: String,
    },
    /// A property is conditional on itself.
    #[error("`{definition}.{property}` is conditional on itself")]
    SelfConditional {
        /// Definition key
        definition: String,
        /// Offending property
        property: String,
    },
    /// The same property key was declared twice.
    #[error("`{definition}` declares `{property}` more than once")]
    DuplicateProperty {
        /// Definition key
        definition: String,
        /// Duplicated property key
        property: String,
    },
}
