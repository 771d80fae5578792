//! Capability registry for cross-plugin helpers.
//!
//! Each plugin publishes at most one value under its own name; other plugins
//! fetch it with the concrete type they expect.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;

/// Typed values keyed by the name of the plugin providing them.
#[derive(Default)]
pub struct Capabilities {
    entries: DashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `value` under `plugin`, replacing any earlier value.
    ///
    /// Returns whether a value was replaced.
    pub fn provide<T: Any + Send + Sync>(&self, plugin: &str, value: T) -> bool {
        self.entries
            .insert(plugin.to_owned(), Arc::new(value))
            .is_some()
    }

    /// Fetch the value `plugin` published, if it is a `T`.
    pub fn get<T: Any + Send + Sync>(&self, plugin: &str) -> Option<Arc<T>> {
        let entry = Arc::clone(self.entries.get(plugin)?.value());
        entry.downcast::<T>().ok()
    }

    pub fn contains(&self, plugin: &str) -> bool {
        self.entries.contains_key(plugin)
    }

    pub fn remove(&self, plugin: &str) -> bool {
        self.entries.remove(plugin).is_some()
    }

    /// Names of providing plugins, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("providers", &self.names())
            .finish()
    }
}
