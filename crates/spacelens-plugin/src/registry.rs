//! Plugin trait and name-keyed registry.

use indexmap::IndexMap;

use spacelens_core::LibraryLocations;

use crate::chrome::ChromePlugin;
use crate::types::PluginAnalysis;

/// Analyzer for one application whose storage layout the generic inventory
/// cannot resolve.
pub trait AppPlugin: Send + Sync {
    /// Bundle name (without `.app`) this plugin handles.
    fn app_name(&self) -> &str;

    /// Measure the application's data, caches, activity and profiles.
    fn analyze(&self, locations: &LibraryLocations) -> PluginAnalysis;
}

/// Plugins keyed by application name, in registration order.
pub struct PluginRegistry {
    plugins: IndexMap<String, Box<dyn AppPlugin>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            plugins: IndexMap::new(),
        }
    }

    /// Create a registry with the built-in plugins.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ChromePlugin::new()));
        registry
    }

    /// Register a plugin, replacing any plugin for the same application.
    pub fn register(&mut self, plugin: Box<dyn AppPlugin>) {
        let name = plugin.app_name().to_string();
        if self.plugins.insert(name.clone(), plugin).is_some() {
            tracing::debug!("Replaced plugin for {name}");
        }
    }

    /// Get the plugin for an application name.
    pub fn get(&self, app_name: &str) -> Option<&dyn AppPlugin> {
        self.plugins.get(app_name).map(|p| p.as_ref())
    }

    /// Names of the applications with a plugin.
    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Check if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
