//! Adapter registry for managing language-specific adapters.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::java::JavaAdapter;
use super::language::Language;
use super::python::PythonAdapter;
use super::traits::LanguageAdapter;
use crate::error::PipelineError;

/// Registry of language adapters.
///
/// Maps languages and file extensions to their adapters.
/// Registers every built-in adapter on creation.
pub struct AdapterRegistry {
    adapters: BTreeMap<Language, Arc<dyn LanguageAdapter>>,
    /// Extension to language mapping.
    extensions: HashMap<String, Language>,
}

impl AdapterRegistry {
    /// Create a new registry with all built-in adapters.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(PythonAdapter::new()));
        registry.register(Arc::new(JavaAdapter::new()));
        registry
    }

    /// Registry without any adapters.
    pub fn empty() -> Self {
        Self {
            adapters: BTreeMap::new(),
            extensions: HashMap::new(),
        }
    }

    /// Register an adapter for its language and extensions.
    ///
    /// A later registration for the same language replaces the earlier one.
    pub fn register(&mut self, adapter: Arc<dyn LanguageAdapter>) {
        let language = adapter.language();
        for ext in adapter.supported_extensions() {
            self.extensions.insert(ext.to_lowercase(), language);
        }
        self.adapters.insert(language, adapter);
    }

    /// Adapter for a language.
    pub fn adapter(&self, language: Language) -> Result<Arc<dyn LanguageAdapter>, PipelineError> {
        self.adapters
            .get(&language)
            .cloned()
            .ok_or_else(|| PipelineError::UnsupportedLanguage(language.to_string()))
    }

    /// Get an adapter for the given file extension.
    pub fn adapter_for_extension(&self, extension: &str) -> Option<Arc<dyn LanguageAdapter>> {
        self.extensions
            .get(&extension.to_lowercase())
            .and_then(|lang| self.adapters.get(lang))
            .cloned()
    }

    /// Get an adapter for the given file path.
    pub fn adapter_for_path(&self, path: &str) -> Option<Arc<dyn LanguageAdapter>> {
        std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.adapter_for_extension(ext))
    }

    /// Check if any adapter can handle the given extension.
    pub fn can_parse(&self, extension: &str) -> bool {
        self.extensions.contains_key(&extension.to_lowercase())
    }

    /// List all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extensions.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// List all registered adapters with their extensions.
    pub fn list_adapters(&self) -> Vec<(Language, &[&'static str])> {
        self.adapters
            .iter()
            .map(|(lang, adapter)| (*lang, adapter.supported_extensions()))
            .collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
