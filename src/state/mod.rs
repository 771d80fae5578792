//! Shared client state.
//!
//! [`StateStore`] holds named objects of JSON values that plugins read and
//! extend. Every assignment goes through [`StateStore::set`], which first runs
//! the mutation interceptors registered for that object, so a plugin can
//! diff or log transitions without owning the data.
//!
//! The core keeps its own view of the session under the
//! [`CONNECTION`] object (`status` and `address` keys).

mod capabilities;

pub use capabilities::Capabilities;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Object the core writes session status into.
pub const CONNECTION: &str = "connection";

type MutationFn = Arc<dyn Fn(&Map<String, Value>, &str, &Value) + Send + Sync>;

/// Named JSON objects with before-mutation interceptors.
#[derive(Default)]
pub struct StateStore {
    objects: RwLock<HashMap<String, Map<String, Value>>>,
    interceptors: RwLock<HashMap<String, Vec<MutationFn>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe assignments into `object`.
    ///
    /// `hook` receives the object as it is before the write, the key and the
    /// new value. The newest interceptor runs first.
    pub fn intercept_mutation<F>(&self, object: &str, hook: F)
    where
        F: Fn(&Map<String, Value>, &str, &Value) + Send + Sync + 'static,
    {
        self.interceptors
            .write()
            .entry(object.to_owned())
            .or_default()
            .push(Arc::new(hook));
    }

    /// Assign `key` in `object`, creating the object if needed.
    ///
    /// Returns the previous value.
    pub fn set(&self, object: &str, key: &str, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();

        let hooks = self.interceptors.read().get(object).cloned();
        if let Some(hooks) = hooks {
            let current = self.object(object).unwrap_or_default();
            for hook in hooks.iter().rev() {
                hook(&current, key, &value);
            }
        }

        self.objects
            .write()
            .entry(object.to_owned())
            .or_default()
            .insert(key.to_owned(), value)
    }

    /// Make sure `object` exists, without running interceptors.
    pub fn ensure_object(&self, object: &str) {
        self.objects.write().entry(object.to_owned()).or_default();
    }

    pub fn get(&self, object: &str, key: &str) -> Option<Value> {
        self.objects.read().get(object)?.get(key).cloned()
    }

    /// Read a value and deserialize it into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, object: &str, key: &str) -> Option<T> {
        serde_json::from_value(self.get(object, key)?).ok()
    }

    /// Copy of a whole object.
    pub fn object(&self, object: &str) -> Option<Map<String, Value>> {
        self.objects.read().get(object).cloned()
    }

    pub fn contains(&self, object: &str) -> bool {
        self.objects.read().contains_key(object)
    }

    /// Names of all objects, sorted.
    pub fn objects(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("objects", &self.objects())
            .finish()
    }
}
