//! Plugin descriptors and dependency-ordered loading.
//!
//! A plugin is a name, the names it depends on, and an init function that
//! wires it into the client: subscribing to events, attaching hooks,
//! extending state, publishing capabilities. The loader orders plugins so
//! every dependency initializes first and runs each init at most once per
//! client, however often a name appears in the input.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::Client;
use crate::config::ClientConfig;
use crate::error::PluginError;
use crate::telemetry::spans;

type InitFn = dyn Fn(&Client, &ClientConfig) -> anyhow::Result<()> + Send + Sync;

/// A plugin descriptor.
#[derive(Clone)]
pub struct Plugin {
    name: String,
    dependencies: Vec<String>,
    init: Arc<InitFn>,
}

impl Plugin {
    pub fn new<F>(name: impl Into<String>, init: F) -> Self
    where
        F: Fn(&Client, &ClientConfig) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            init: Arc::new(init),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Order `plugins` so dependencies come first.
///
/// The first descriptor with a given name wins; later ones are ignored.
/// Names in `loaded` count as satisfied dependencies and are not returned.
/// Ties keep input order.
pub fn resolve_order<'a>(
    plugins: &'a [Plugin],
    loaded: &HashSet<String>,
) -> Result<Vec<&'a Plugin>, PluginError> {
    let mut by_name: HashMap<&str, &Plugin> = HashMap::new();
    let mut unique: Vec<&Plugin> = Vec::new();
    for plugin in plugins {
        if !by_name.contains_key(plugin.name()) {
            by_name.insert(plugin.name(), plugin);
            unique.push(plugin);
        }
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(unique.len());
    for plugin in unique {
        visit(plugin, &by_name, loaded, &mut marks, &mut order)?;
    }
    Ok(order)
}

fn visit<'a>(
    plugin: &'a Plugin,
    by_name: &HashMap<&'a str, &'a Plugin>,
    loaded: &HashSet<String>,
    marks: &mut HashMap<&'a str, Mark>,
    order: &mut Vec<&'a Plugin>,
) -> Result<(), PluginError> {
    if loaded.contains(plugin.name()) {
        return Ok(());
    }
    match marks.get(plugin.name()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(PluginError::DependencyCycle(plugin.name.clone())),
        None => {}
    }

    marks.insert(plugin.name(), Mark::Visiting);
    for dependency in plugin.dependencies() {
        if loaded.contains(dependency) {
            continue;
        }
        let Some(dep) = by_name.get(dependency.as_str()) else {
            return Err(PluginError::MissingDependency {
                plugin: plugin.name.clone(),
                dependency: dependency.clone(),
            });
        };
        visit(*dep, by_name, loaded, marks, order)?;
    }
    marks.insert(plugin.name(), Mark::Done);
    order.push(plugin);
    Ok(())
}

/// Initialize `plugins` against `client` in dependency order.
///
/// Returns the names initialized by this call, in order.
pub(crate) fn load(client: &Client, plugins: &[Plugin]) -> Result<Vec<String>, PluginError> {
    let order = {
        let loaded = client.loaded_plugins().lock();
        resolve_order(plugins, &loaded)?
    };

    let mut initialized = Vec::with_capacity(order.len());
    for plugin in order {
        if client.loaded_plugins().lock().contains(plugin.name())
            || !client.initializing_plugins().lock().insert(plugin.name.clone())
        {
            continue;
        }

        let _span = spans::plugin(plugin.name()).entered();
        let result = (plugin.init)(client, client.config());
        client.initializing_plugins().lock().remove(plugin.name());

        // A failed init leaves the name unloaded so it can be retried and
        // never satisfies a dependent.
        if let Err(cause) = result {
            warn!(error = %cause, "plugin init failed");
            return Err(PluginError::Init {
                plugin: plugin.name.clone(),
                cause,
            });
        }
        client.loaded_plugins().lock().insert(plugin.name.clone());
        info!("plugin initialized");
        initialized.push(plugin.name.clone());
    }
    Ok(initialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str, deps: &[&str]) -> Plugin {
        Plugin::new(name, |_, _| Ok(())).with_dependencies(deps.iter().copied())
    }

    fn names(order: &[&Plugin]) -> Vec<String> {
        order.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn test_dependencies_first_input_order_kept() {
        let plugins = [noop("c", &["a", "b"]), noop("a", &[]), noop("b", &[])];
        let order = resolve_order(&plugins, &HashSet::new()).unwrap();
        assert_eq!(names(&order), ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicates_resolve_once() {
        let plugins = [
            noop("b", &[]),
            noop("c", &["a", "b"]),
            noop("a", &[]),
            noop("c", &["missing"]),
            noop("a", &[]),
        ];
        let order = resolve_order(&plugins, &HashSet::new()).unwrap();
        assert_eq!(names(&order), ["b", "a", "c"]);
    }

    #[test]
    fn test_missing_dependency() {
        let plugins = [noop("a", &["ghost"])];
        let err = resolve_order(&plugins, &HashSet::new()).unwrap_err();
        assert!(matches!(
            err,
            PluginError::MissingDependency { ref plugin, ref dependency }
                if plugin == "a" && dependency == "ghost"
        ));
    }

    #[test]
    fn test_cycle_detected() {
        let plugins = [noop("a", &["b"]), noop("b", &["c"]), noop("c", &["a"])];
        assert!(matches!(
            resolve_order(&plugins, &HashSet::new()),
            Err(PluginError::DependencyCycle(_))
        ));
    }

    #[test]
    fn test_loaded_names_satisfy_dependencies() {
        let plugins = [noop("d", &["a"])];
        let loaded: HashSet<String> = ["a".to_string()].into();
        let order = resolve_order(&plugins, &loaded).unwrap();
        assert_eq!(names(&order), ["d"]);
    }
}
