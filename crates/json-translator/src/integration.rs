//! Container wiring for the JSON translator.

use std::sync::Arc;

use component_container::{ComponentRegistrar, Container, ContainerError, Injectable, Provides};

use crate::config::TranslatorConfig;
use crate::translator::{JsonTranslator, Translator};

impl Injectable for JsonTranslator {
    /// Uses a bound [`TranslatorConfig`] when the host provided one.
    fn construct(container: &Container) -> Result<Self, ContainerError> {
        if container.has::<TranslatorConfig>() {
            let config = container.get::<TranslatorConfig>()?;
            return Ok(JsonTranslator::new(*config));
        }
        Ok(JsonTranslator::default())
    }
}

impl Provides<dyn Translator> for JsonTranslator {
    fn provide(self: Arc<Self>) -> Arc<dyn Translator> {
        self
    }
}

/// Binds `dyn Translator` and `JsonTranslator` to one shared [`JsonTranslator`].
///
/// ```
/// use component_container::Container;
/// use json_translator::{JsonComponentRegistrar, Translator};
///
/// let mut container = Container::new();
/// container.install(&JsonComponentRegistrar);
///
/// let translator = container.get::<dyn Translator>().unwrap();
/// let mapping = translator.decode_to_mapping(r#"{"a":1}"#).unwrap();
/// assert_eq!(mapping.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonComponentRegistrar;

impl ComponentRegistrar for JsonComponentRegistrar {
    fn register(&self, container: &mut Container) {
        container
            .bind::<dyn Translator, JsonTranslator>()
            .bind::<JsonTranslator, JsonTranslator>();
    }
}
