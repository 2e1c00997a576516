//! Typed entity queries
//!
//! [`EntityCursor`] is the lazy filter surface over a type's entity
//! collection: identifiers are snapshotted up front, entities load on
//! demand as the cursor is driven, and predicates narrow the stream.
//! Order is store-defined and not stable unless the caller sorts.

use crate::entity::{Entity, Value};
use crate::error::{StoreError, StoreResult};
use crate::rdf::Iri;
use crate::store::Store;

type Predicate = Box<dyn Fn(&Entity) -> bool>;

/// Lazy cursor over the entities of one type
pub struct EntityCursor {
    store: Store,
    ids: std::vec::IntoIter<Iri>,
    predicates: Vec<Predicate>,
}

impl EntityCursor {
    pub(crate) fn new(store: Store, ids: Vec<Iri>) -> Self {
        Self {
            store,
            ids: ids.into_iter(),
            predicates: Vec::new(),
        }
    }

    /// Keep only entities matching the predicate
    pub fn matching(mut self, predicate: impl Fn(&Entity) -> bool + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Keep only entities whose property equals the value
    pub fn with_value(self, property: &str, value: impl Into<Value>) -> Self {
        let property = property.to_string();
        let value = value.into();
        self.matching(move |entity| entity.get(&property) == Some(&value))
    }

    /// First matching entity, if any
    pub fn first(mut self) -> StoreResult<Option<Entity>> {
        match self.next() {
            Some(Ok(entity)) => Ok(Some(entity)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

impl Iterator for EntityCursor {
    type Item = StoreResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.ids.next()?;
            let entity = match self.store.get(&id) {
                Ok(entity) => entity,
                // Deleted since the identifier snapshot was taken.
                Err(StoreError::NotFound { .. }) => continue,
                Err(e) => return Some(Err(e)),
            };
            if self.predicates.iter().all(|p| p(&entity)) {
                return Some(Ok(entity));
            }
        }
    }
}
