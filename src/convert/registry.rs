//! Registry of converters keyed by resource type.

use std::collections::HashMap;
use std::fmt;

use super::converter::ResourceConverter;

/// Maps resource-type names to converters.
///
/// Built once at startup and injected into the engine. Types without an entry
/// are treated as unsupported and skipped.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Box<dyn ResourceConverter>>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter, replacing any previous one for the type.
    pub fn register(
        &mut self,
        resource_type: impl Into<String>,
        converter: impl ResourceConverter + 'static,
    ) -> &mut Self {
        self.converters
            .insert(resource_type.into(), Box::new(converter));
        self
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(
        mut self,
        resource_type: impl Into<String>,
        converter: impl ResourceConverter + 'static,
    ) -> Self {
        self.register(resource_type, converter);
        self
    }

    /// Returns the converter for a resource type.
    #[must_use]
    pub fn get(&self, resource_type: &str) -> Option<&dyn ResourceConverter> {
        self.converters.get(resource_type).map(AsRef::as_ref)
    }

    /// Returns true if the resource type has a converter.
    #[must_use]
    pub fn supports(&self, resource_type: &str) -> bool {
        self.converters.contains_key(resource_type)
    }

    /// Returns the supported resource types, sorted.
    #[must_use]
    pub fn resource_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}
