//! Listener bookkeeping behind the bus lock.

use std::collections::{HashMap, HashSet};

use super::Listener;
use crate::error::BusError;

#[derive(Debug)]
struct Entry {
    /// Global registration order, shared across event names.
    seq: u64,
    listener: Listener,
    once: bool,
}

#[derive(Debug)]
pub(crate) struct Registry {
    listeners: HashMap<String, Vec<Entry>>,
    /// Multi-event name to its source event names.
    multi: HashMap<String, Vec<String>>,
    max_listeners: usize,
    next_seq: u64,
}

impl Registry {
    pub(crate) fn new(max_listeners: usize) -> Self {
        Self {
            listeners: HashMap::new(),
            multi: HashMap::new(),
            max_listeners,
            next_seq: 0,
        }
    }

    pub(crate) fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    pub(crate) fn set_max_listeners(&mut self, max: usize) {
        self.max_listeners = max;
    }

    /// Register `listener` on every name, or on none if any name rejects it.
    pub(crate) fn insert(
        &mut self,
        names: &[String],
        listener: &Listener,
        once: bool,
    ) -> Result<(), BusError> {
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) || self.contains(name, listener.id()) {
                return Err(BusError::DuplicateListener(name.clone()));
            }
            let count = self.listeners.get(name).map_or(0, Vec::len);
            if count >= self.max_listeners {
                return Err(BusError::TooManyListeners {
                    event: name.clone(),
                    max: self.max_listeners,
                });
            }
        }

        for name in names {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.listeners.entry(name.clone()).or_default().push(Entry {
                seq,
                listener: listener.clone(),
                once,
            });
        }
        Ok(())
    }

    pub(crate) fn contains(&self, name: &str, id: u64) -> bool {
        self.listeners
            .get(name)
            .is_some_and(|list| list.iter().any(|e| e.listener.id() == id))
    }

    /// Remove one registration; drops the name once its list is empty.
    pub(crate) fn remove(&mut self, name: &str, id: u64) -> bool {
        let Some(list) = self.listeners.get_mut(name) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.listener.id() != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(name);
        }
        removed
    }

    pub(crate) fn define_multi(&mut self, name: &str, sources: Vec<String>) -> Result<(), BusError> {
        if self.listeners.contains_key(name) || self.multi.contains_key(name) {
            return Err(BusError::EventExists(name.to_string()));
        }
        self.multi.insert(name.to_string(), sources);
        Ok(())
    }

    pub(crate) fn is_multi(&self, name: &str) -> bool {
        self.multi.contains_key(name)
    }

    /// Names whose listeners fire when `name` is emitted.
    fn targets<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::once(name).chain(
            self.multi
                .iter()
                .filter(move |(multi, sources)| {
                    multi.as_str() != name && sources.iter().any(|s| s == name)
                })
                .map(|(multi, _)| multi.as_str()),
        )
    }

    /// Listeners an emission of `name` reaches, in registration order,
    /// each listener at most once.
    pub(crate) fn count(&self, name: &str) -> usize {
        let mut ids = HashSet::new();
        for target in self.targets(name) {
            if let Some(list) = self.listeners.get(target) {
                ids.extend(list.iter().map(|e| e.listener.id()));
            }
        }
        ids.len()
    }

    /// Take the dispatch snapshot for one emission and retire one-shot entries.
    pub(crate) fn snapshot(&mut self, name: &str) -> Vec<Listener> {
        let targets: Vec<String> = self.targets(name).map(str::to_owned).collect();

        let mut collected: Vec<(u64, Listener)> = Vec::new();
        for target in &targets {
            let Some(list) = self.listeners.get_mut(target) else {
                continue;
            };
            collected.extend(list.iter().map(|e| (e.seq, e.listener.clone())));
            list.retain(|e| !e.once);
            if list.is_empty() {
                self.listeners.remove(target);
            }
        }

        collected.sort_by_key(|(seq, _)| *seq);
        let mut seen = HashSet::new();
        collected
            .into_iter()
            .filter(|(_, listener)| seen.insert(listener.id()))
            .map(|(_, listener)| listener)
            .collect()
    }

    /// Event names with at least one listener, plus multi-event names.
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .listeners
            .keys()
            .chain(self.multi.keys().filter(|m| !self.listeners.contains_key(*m)))
            .cloned()
            .collect();
        names.sort();
        names
    }
}
