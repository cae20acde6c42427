//! Generic registry for managing named items.

use std::collections::HashMap;

use thiserror::Error;

use super::Named;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    #[error("{kind} '{name}' is already registered")]
    Duplicate { kind: &'static str, name: String },

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },
}

impl RegistryError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

/// Name-keyed registry with unique, non-empty names.
///
/// A rejected registration leaves the existing entry untouched.
#[derive(Debug, Clone)]
pub struct NamedRegistry<T: Named> {
    kind: &'static str,
    items: HashMap<String, T>,
}

impl<T: Named> NamedRegistry<T> {
    /// `kind` labels errors, e.g. `"skill"`.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn register(&mut self, item: T) -> Result<(), RegistryError> {
        let name = item.name();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName { kind: self.kind });
        }
        if self.items.contains_key(name) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        self.items.insert(name.to_string(), item);
        Ok(())
    }

    /// Removing an absent name is a no-op.
    pub fn unregister(&mut self, name: &str) -> Option<T> {
        self.items.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&T, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::not_found(self.kind, name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Registered names in ascending order.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.items.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
