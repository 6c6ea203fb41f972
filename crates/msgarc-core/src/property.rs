//! Dynamic message properties addressed by `(namespace, name)`.
//!
//! The resolver only depends on [`PropertyLookup`]; it does not know where
//! the properties come from (message envelope, runtime adapter, test map).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Read access to dynamic properties of the message being archived.
pub trait PropertyLookup {
    fn property(&self, namespace: &str, name: &str) -> Option<String>;
}

/// In-memory property set, serialized as `namespace -> name -> value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageProperties {
    by_namespace: BTreeMap<String, BTreeMap<String, String>>,
}

impl MessageProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, returning the previous value.
    pub fn insert(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.by_namespace
            .entry(namespace.into())
            .or_default()
            .insert(name.into(), value.into())
    }

    pub fn with(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.insert(namespace, name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.by_namespace.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PropertyLookup for MessageProperties {
    fn property(&self, namespace: &str, name: &str) -> Option<String> {
        self.by_namespace.get(namespace)?.get(name).cloned()
    }
}
