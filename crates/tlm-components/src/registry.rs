//! Component type catalog.

use std::collections::HashMap;

use crate::component::Component;
use crate::error::{ComponentError, ComponentResult};
use crate::model::{ComponentModel, STANDARD_LIBRARY};

#[derive(Clone, Copy, Debug)]
pub struct RegistryEntry {
    pub type_name: &'static str,
    pub description: &'static str,
    constructor: fn() -> ComponentModel,
}

/// Maps type names to model constructors.
#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<&'static str, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in model.
    pub fn with_standard_library() -> Self {
        let mut registry = Self::new();
        for &(name, description, ctor) in STANDARD_LIBRARY {
            if let Err(err) = registry.register(name, description, ctor) {
                panic!("built-in component table is inconsistent: {err}");
            }
        }
        registry
    }

    /// Register a constructor under a new type name, for instance a model
    /// with different parameter defaults.
    pub fn register(
        &mut self,
        type_name: &'static str,
        description: &'static str,
        constructor: fn() -> ComponentModel,
    ) -> ComponentResult<()> {
        if self.index.contains_key(type_name) {
            return Err(ComponentError::DuplicateType {
                name: type_name.to_string(),
            });
        }
        self.index.insert(type_name, self.entries.len());
        self.entries.push(RegistryEntry {
            type_name,
            description,
            constructor,
        });
        Ok(())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.index.contains_key(type_name)
    }

    /// Instantiate and configure a component.
    pub fn create(&self, type_name: &str, name: impl Into<String>) -> ComponentResult<Component> {
        let entry = self
            .index
            .get(type_name)
            .and_then(|i| self.entries.get(*i))
            .ok_or_else(|| ComponentError::UnknownType {
                name: type_name.to_string(),
            })?;
        Ok(Component::new(name, (entry.constructor)()))
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.type_name)
    }
}
