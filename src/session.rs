//! Sessions: change tracking and optimistic commit
//!
//! A [`Session`] is a unit of work over a [`Store`](crate::Store). Entities
//! are tracked from the moment they are created or fetched; setters stage
//! changes in the session, and nothing touches the store until `commit`.
//!
//! Every fetched entity carries the version token it was loaded at. Commit
//! takes the store's write lock, re-checks every dirty entity's token, and
//! aborts the whole batch on the first mismatch; no partial writes occur.
//! Conflicted sessions are not retried automatically: the caller discards
//! the session and re-applies its work on fresh reads.

use crate::entity::{ident, Entity, EntityError, Mapper, Value};
use crate::error::{StoreError, StoreResult};
use crate::persistence;
use crate::rdf::{Iri, Triple};
use crate::store::Store;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Tracking state of an entity within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Fetched and unchanged
    Clean,
    /// Created in this session
    New,
    /// Fetched and mutated in this session
    Modified,
    /// Marked for deletion in this session
    Deleted,
}

#[derive(Debug, Clone)]
struct Tracked {
    entity: Entity,
    state: EntityState,
    loaded_version: Option<u64>,
}

/// A unit of work over a store
pub struct Session {
    store: Store,
    tracked: IndexMap<String, Tracked>,
}

impl Session {
    pub(crate) fn new(store: Store) -> Self {
        Self {
            store,
            tracked: IndexMap::new(),
        }
    }

    /// The store this session works against
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Create a new entity of the given type.
    ///
    /// The identifier is minted under the type's namespace and is unique
    /// across the store and this session.
    pub fn create(&mut self, kind: &str) -> StoreResult<Entity> {
        self.create_entity(kind, None)
    }

    /// Create a new entity whose identifier embeds `parent`'s identifier as
    /// a prefix. The parent must exist in the store or in this session.
    pub fn create_child(&mut self, kind: &str, parent: &Iri) -> StoreResult<Entity> {
        let parent_known = self.tracked.contains_key(parent.as_str())
            || self.store.version_of(parent).is_some();
        if !parent_known {
            return Err(StoreError::NotFound {
                id: parent.as_str().to_string(),
            });
        }
        self.create_entity(kind, Some(parent))
    }

    fn create_entity(&mut self, kind: &str, parent: Option<&Iri>) -> StoreResult<Entity> {
        let id_prefix = self.store.schema().require(kind)?.id_prefix().clone();
        let id = {
            let state = self.store.state();
            let tracked = &self.tracked;
            ident::new_id(&id_prefix, parent, |candidate| {
                state.versions.contains_key(candidate.as_str())
                    || tracked.contains_key(candidate.as_str())
            })?
        };

        let entity = Entity::new(id.clone(), kind);
        self.tracked.insert(
            id.as_str().to_string(),
            Tracked {
                entity: entity.clone(),
                state: EntityState::New,
                loaded_version: None,
            },
        );
        Ok(entity)
    }

    /// Fetch an entity, tracking it in this session.
    ///
    /// Repeated fetches return the session's staged view, not the store's.
    pub fn get(&mut self, id: &Iri) -> StoreResult<Entity> {
        if let Some(tracked) = self.tracked.get(id.as_str()) {
            if tracked.state == EntityState::Deleted {
                return Err(StoreError::NotFound {
                    id: id.as_str().to_string(),
                });
            }
            return Ok(tracked.entity.clone());
        }

        let (entity, version) = {
            let state = self.store.state();
            let mapper = Mapper::new(self.store.schema());
            let entity = mapper.load(&state.triples, id)?.ok_or_else(|| {
                StoreError::NotFound {
                    id: id.as_str().to_string(),
                }
            })?;
            let version = state.versions.get(id.as_str()).copied().ok_or_else(|| {
                StoreError::NotFound {
                    id: id.as_str().to_string(),
                }
            })?;
            (entity, version)
        };

        self.tracked.insert(
            id.as_str().to_string(),
            Tracked {
                entity: entity.clone(),
                state: EntityState::Clean,
                loaded_version: Some(version),
            },
        );
        Ok(entity)
    }

    /// Fetch an entity expected to carry a given type tag
    pub fn get_as(&mut self, id: &Iri, kind: &str) -> StoreResult<Entity> {
        let entity = self.get(id)?;
        if !entity.has_kind(kind) {
            return Err(StoreError::NotFound {
                id: format!("{} (as {})", id.as_str(), kind),
            });
        }
        Ok(entity)
    }

    /// Stage a property value
    pub fn set(&mut self, id: &Iri, property: &str, value: impl Into<Value>) -> StoreResult<()> {
        let value = value.into();
        self.ensure_tracked(id)?;

        {
            let tracked = self.expect_tracked(id)?;
            if tracked.state == EntityState::Deleted {
                return Err(EntityError::Deleted(id.as_str().to_string()).into());
            }
            let def = Mapper::new(self.store.schema()).find_property(&tracked.entity, property)?;
            if def.kind() != value.kind() {
                return Err(EntityError::KindMismatch {
                    property: property.to_string(),
                    expected: def.kind(),
                    found: value.kind(),
                }
                .into());
            }
        }

        let tracked = self.expect_tracked_mut(id)?;
        tracked.entity.set_value(property, value);
        if tracked.state == EntityState::Clean {
            tracked.state = EntityState::Modified;
        }
        Ok(())
    }

    /// Stage relation targets, replacing any staged or stored targets.
    ///
    /// Writing to a computed inverse relation is rejected. Target existence
    /// is validated at commit time.
    pub fn set_relation(&mut self, id: &Iri, relation: &str, targets: &[Iri]) -> StoreResult<()> {
        self.ensure_tracked(id)?;

        {
            let tracked = self.expect_tracked(id)?;
            if tracked.state == EntityState::Deleted {
                return Err(EntityError::Deleted(id.as_str().to_string()).into());
            }
            let def = Mapper::new(self.store.schema()).find_relation(&tracked.entity, relation)?;
            if !def.is_many() && targets.len() > 1 {
                return Err(EntityError::SingleValued(relation.to_string()).into());
            }
        }

        let tracked = self.expect_tracked_mut(id)?;
        tracked.entity.set_targets(relation, targets.to_vec());
        if tracked.state == EntityState::Clean {
            tracked.state = EntityState::Modified;
        }
        Ok(())
    }

    /// Attach an additional type tag to an entity, preserving its identifier
    /// and existing triples.
    ///
    /// The transition is gated at commit: required properties of the new
    /// type must be populated by then.
    pub fn cast(&mut self, id: &Iri, kind: &str) -> StoreResult<Entity> {
        self.store.schema().require(kind)?;
        self.ensure_tracked(id)?;

        let tracked = self.expect_tracked_mut(id)?;
        if tracked.state == EntityState::Deleted {
            return Err(EntityError::Deleted(id.as_str().to_string()).into());
        }
        if !tracked.entity.has_kind(kind) {
            tracked.entity.add_kind(kind);
            if tracked.state == EntityState::Clean {
                tracked.state = EntityState::Modified;
            }
        }
        Ok(tracked.entity.clone())
    }

    /// Mark an entity for deletion. Deleting an entity created in this
    /// session simply untracks it.
    pub fn delete(&mut self, id: &Iri) -> StoreResult<()> {
        self.ensure_tracked(id)?;
        let state = self.expect_tracked(id)?.state;
        if state == EntityState::New {
            self.tracked.shift_remove(id.as_str());
        } else {
            let tracked = self.expect_tracked_mut(id)?;
            tracked.state = EntityState::Deleted;
        }
        Ok(())
    }

    /// Resolve a computed inverse relation against committed store state
    pub fn inverse(&mut self, id: &Iri, relation: &str) -> StoreResult<Vec<Iri>> {
        let entity = self.get(id)?;
        let state = self.store.state();
        let mapper = Mapper::new(self.store.schema());
        Ok(mapper.inverse_targets(&state.triples, &entity, relation)?)
    }

    /// Dereference a forward relation, fetching each target entity
    pub fn related(&mut self, id: &Iri, relation: &str) -> StoreResult<Vec<Entity>> {
        let entity = self.get(id)?;
        let targets: Vec<Iri> = entity.relation(relation).to_vec();
        let mut out = Vec::with_capacity(targets.len());
        for target in targets {
            out.push(self.get(&target)?);
        }
        Ok(out)
    }

    /// Tracking state of an entity, if tracked
    pub fn state_of(&self, id: &Iri) -> Option<EntityState> {
        self.tracked.get(id.as_str()).map(|t| t.state)
    }

    /// Identifiers with staged changes
    pub fn dirty_ids(&self) -> Vec<Iri> {
        self.tracked
            .values()
            .filter(|t| t.state != EntityState::Clean)
            .map(|t| t.entity.id().clone())
            .collect()
    }

    /// Whether the session has staged changes
    pub fn has_changes(&self) -> bool {
        self.tracked.values().any(|t| t.state != EntityState::Clean)
    }

    /// Commit staged changes. See [`commit_with`](Session::commit_with).
    pub fn commit(&mut self) -> StoreResult<()> {
        self.commit_with(|_| Ok(()))
    }

    /// Commit staged changes, invoking `hook` first.
    ///
    /// The hook sees the session with its full tracked set and may stage
    /// further edits; those land in the same commit. A commit with nothing
    /// staged is a no-op: no version tokens change and no snapshot is
    /// written. On any error the store is untouched and the session keeps
    /// its staged state.
    pub fn commit_with<F>(&mut self, hook: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Session) -> StoreResult<()>,
    {
        hook(self)?;

        let dirty: Vec<String> = self
            .tracked
            .iter()
            .filter(|(_, t)| t.state != EntityState::Clean)
            .map(|(key, _)| key.clone())
            .collect();
        if dirty.is_empty() {
            debug!("commit with no staged changes");
            return Ok(());
        }

        // Required-property validation gates the commit before any lock is
        // taken; re-typed entities are checked against every tag they carry.
        {
            let mapper = Mapper::new(self.store.schema());
            for key in &dirty {
                let Some(tracked) = self.tracked.get(key) else {
                    continue;
                };
                if matches!(tracked.state, EntityState::New | EntityState::Modified) {
                    mapper.validate_required(&tracked.entity)?;
                }
            }
        }

        let mut state = self.store.state_mut();

        // Optimistic validation: every dirty entity's captured token must
        // still match the store.
        for key in &dirty {
            let Some(tracked) = self.tracked.get(key) else {
                continue;
            };
            match tracked.state {
                EntityState::New => {
                    if state.versions.contains_key(key) {
                        return Err(StoreError::Conflict { id: key.clone() });
                    }
                }
                EntityState::Modified | EntityState::Deleted => {
                    if state.versions.get(key).copied() != tracked.loaded_version {
                        return Err(StoreError::Conflict { id: key.clone() });
                    }
                }
                EntityState::Clean => {}
            }
        }

        // Relation targets must resolve to an entity in the store or in
        // this commit.
        for key in &dirty {
            let Some(tracked) = self.tracked.get(key) else {
                continue;
            };
            if !matches!(tracked.state, EntityState::New | EntityState::Modified) {
                continue;
            }
            for relation in tracked.entity.relation_names() {
                for target in tracked.entity.relation(relation) {
                    let target_key = target.as_str();
                    let session_state = self.tracked.get(target_key).map(|t| t.state);
                    let missing = match session_state {
                        Some(EntityState::Deleted) => true,
                        Some(_) => false,
                        None => !state.versions.contains_key(target_key),
                    };
                    if missing {
                        return Err(StoreError::NotFound {
                            id: target_key.to_string(),
                        });
                    }
                }
            }
        }

        // Stage the triple delta; nothing has been written yet, so any
        // projection error still leaves the store untouched.
        let mapper = Mapper::new(self.store.schema());
        let mut removed: Vec<Triple> = Vec::new();
        let mut added: Vec<Triple> = Vec::new();
        for key in &dirty {
            let Some(tracked) = self.tracked.get(key) else {
                continue;
            };
            let old = match tracked.state {
                EntityState::New => Vec::new(),
                _ => state.triples.subject_triples(tracked.entity.id()),
            };
            let new = match tracked.state {
                EntityState::Deleted => Vec::new(),
                _ => mapper.triples_of(&tracked.entity)?,
            };
            removed.extend(old.iter().filter(|t| !new.contains(t)).cloned());
            added.extend(new.iter().filter(|t| !old.contains(t)).cloned());
        }

        // Apply in memory, then persist; a failed snapshot rolls the
        // in-memory state back before surfacing the error.
        let prior_seq = state.commit_seq;
        let next_seq = prior_seq + 1;
        for triple in &removed {
            state.triples.remove(triple);
        }
        for triple in &added {
            state.triples.insert(triple.clone());
        }
        let mut prior_versions: Vec<(String, Option<u64>)> = Vec::with_capacity(dirty.len());
        for key in &dirty {
            let Some(tracked) = self.tracked.get(key) else {
                continue;
            };
            prior_versions.push((key.clone(), state.versions.get(key).copied()));
            if tracked.state == EntityState::Deleted {
                state.versions.remove(key);
            } else {
                state.versions.insert(key.clone(), next_seq);
            }
        }
        state.commit_seq = next_seq;

        if let Err(e) = persistence::save(
            self.store.config(),
            &state.triples,
            &state.versions,
            state.commit_seq,
        ) {
            for triple in &added {
                state.triples.remove(triple);
            }
            for triple in &removed {
                state.triples.insert(triple.clone());
            }
            for (key, prior) in prior_versions {
                match prior {
                    Some(token) => state.versions.insert(key, token),
                    None => state.versions.remove(&key),
                };
            }
            state.commit_seq = prior_seq;
            return Err(e.into());
        }
        drop(state);

        info!(commit = next_seq, entities = dirty.len(), "committed");

        for key in dirty {
            let state_now = self.tracked.get(&key).map(|t| t.state);
            if state_now == Some(EntityState::Deleted) {
                self.tracked.shift_remove(&key);
            } else if let Some(tracked) = self.tracked.get_mut(&key) {
                tracked.state = EntityState::Clean;
                tracked.loaded_version = Some(next_seq);
            }
        }
        Ok(())
    }

    fn ensure_tracked(&mut self, id: &Iri) -> StoreResult<()> {
        if !self.tracked.contains_key(id.as_str()) {
            self.get(id)?;
        }
        Ok(())
    }

    fn expect_tracked(&self, id: &Iri) -> StoreResult<&Tracked> {
        self.tracked
            .get(id.as_str())
            .ok_or_else(|| StoreError::NotFound {
                id: id.as_str().to_string(),
            })
    }

    fn expect_tracked_mut(&mut self, id: &Iri) -> StoreResult<&mut Tracked> {
        self.tracked
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound {
                id: id.as_str().to_string(),
            })
    }
}
