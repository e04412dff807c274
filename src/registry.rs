//! Field Registry
//!
//! Maps container ids to live field handles so host code can find the
//! instance behind a DOM node without storing state on the node itself.

use std::collections::HashMap;

pub struct Registry<H> {
    entries: HashMap<String, H>,
    generated: u32,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            generated: 0,
        }
    }
}

impl<H: Clone> Registry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh id for containers that come without one. `in_use` reports ids
    /// taken outside the registry, such as existing document ids.
    pub fn next_id(&mut self, in_use: impl Fn(&str) -> bool) -> String {
        loop {
            self.generated += 1;
            let id = format!("token-field-{}", self.generated);
            if !self.entries.contains_key(&id) && !in_use(&id) {
                return id;
            }
        }
    }

    /// Register a handle, returning the one it replaced.
    pub fn register(&mut self, id: impl Into<String>, handle: H) -> Option<H> {
        self.entries.insert(id.into(), handle)
    }

    pub fn get(&self, id: &str) -> Option<H> {
        self.entries.get(id).cloned()
    }

    /// Remove the entry for `id` only if `is_same` confirms it is the caller's.
    pub fn remove_if(&mut self, id: &str, is_same: impl Fn(&H) -> bool) -> Option<H> {
        if self.entries.get(id).is_some_and(is_same) {
            return self.entries.remove(id);
        }
        None
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
