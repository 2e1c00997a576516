//! Entity snapshots
//!
//! An [`Entity`] is a typed view over a subject's triples: its identifier,
//! type tags, decoded property values, and forward relation targets. The
//! identifier is fixed at creation and never changes; type tags can grow
//! through re-typing.

use super::value::Value;
use crate::rdf::Iri;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// A typed, identified aggregate of properties and relations
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: Iri,
    kinds: BTreeSet<String>,
    properties: IndexMap<String, Value>,
    relations: IndexMap<String, Vec<Iri>>,
}

impl Entity {
    pub(crate) fn new(id: Iri, kind: impl Into<String>) -> Self {
        let mut kinds = BTreeSet::new();
        kinds.insert(kind.into());
        Self {
            id,
            kinds,
            properties: IndexMap::new(),
            relations: IndexMap::new(),
        }
    }

    /// The entity identifier
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Type tags carried by this entity, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(|s| s.as_str())
    }

    /// Check whether the entity carries a type tag
    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    /// Get a property value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Targets of a forward relation; empty if unset
    pub fn relation(&self, name: &str) -> &[Iri] {
        self.relations.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Property names with set values
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|s| s.as_str())
    }

    /// Relation names with set targets
    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(|s| s.as_str())
    }

    pub(crate) fn add_kind(&mut self, kind: impl Into<String>) {
        self.kinds.insert(kind.into());
    }

    pub(crate) fn set_value(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    pub(crate) fn set_targets(&mut self, name: impl Into<String>, targets: Vec<Iri>) {
        let name = name.into();
        if targets.is_empty() {
            self.relations.shift_remove(&name);
        } else {
            self.relations.insert(name, targets);
        }
    }
}
