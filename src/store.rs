//! Store facade
//!
//! A [`Store`] owns the triple set, per-entity version tokens, and the
//! commit sequence behind a reader-writer lock: reads take short shared
//! locks and never block indefinitely, while commits serialize on the
//! write lock. Handles are cheap to clone and share.

use crate::entity::{Entity, Mapper, Schema};
use crate::error::{StoreError, StoreResult};
use crate::persistence::{self, StoreConfig};
use crate::query::EntityCursor;
use crate::rdf::{
    parse_turtle, rdf_type_iri, write_turtle, Iri, NamespaceManager, Term, Triple, TriplePattern,
    TripleStore,
};
use crate::session::Session;
use crate::sparql::{self, Bindings};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

#[derive(Debug, Default)]
pub(crate) struct State {
    pub triples: TripleStore,
    pub versions: FxHashMap<String, u64>,
    pub commit_seq: u64,
}

struct Shared {
    config: StoreConfig,
    schema: Schema,
    namespaces: NamespaceManager,
    state: RwLock<State>,
}

/// An embedded entity-graph store
#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
}

impl Store {
    /// Open (or create) a store at the configured location.
    ///
    /// The schema is validated up front; an existing snapshot is recovered.
    pub fn open(config: StoreConfig, schema: Schema) -> StoreResult<Self> {
        schema.validate()?;

        let mut namespaces = NamespaceManager::new();
        for (prefix, iri) in schema.namespaces() {
            namespaces.add_prefix(prefix.clone(), iri.clone());
        }

        let state = match persistence::load(&config)? {
            Some((triples, versions, commit_seq)) => {
                info!(
                    store = config.name(),
                    triples = triples.len(),
                    entities = versions.len(),
                    commit = commit_seq,
                    "store recovered"
                );
                State {
                    triples,
                    versions,
                    commit_seq,
                }
            }
            None => {
                info!(store = config.name(), "store created");
                State::default()
            }
        };

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                schema,
                namespaces,
                state: RwLock::new(state),
            }),
        })
    }

    /// Open a store from a `storesdirectory=...;storename=...` descriptor
    pub fn open_with_descriptor(descriptor: &str, schema: Schema) -> StoreResult<Self> {
        let config = StoreConfig::parse(descriptor)?;
        Self::open(config, schema)
    }

    /// The store's schema
    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    /// Start a unit of work
    pub fn session(&self) -> Session {
        Session::new(self.clone())
    }

    /// Fetch an entity by identifier from committed state
    pub fn get(&self, id: &Iri) -> StoreResult<Entity> {
        let state = self.state();
        let mapper = Mapper::new(self.schema());
        mapper
            .load(&state.triples, id)?
            .ok_or_else(|| StoreError::NotFound {
                id: id.as_str().to_string(),
            })
    }

    /// Fetch an entity expected to carry a given type tag
    pub fn get_as(&self, id: &Iri, kind: &str) -> StoreResult<Entity> {
        let entity = self.get(id)?;
        if !entity.has_kind(kind) {
            return Err(StoreError::NotFound {
                id: format!("{} (as {})", id.as_str(), kind),
            });
        }
        Ok(entity)
    }

    /// Lazily iterate the entities of a type, in store-defined order
    pub fn entities(&self, kind: &str) -> StoreResult<EntityCursor> {
        let ids = self.kind_ids(kind)?;
        Ok(EntityCursor::new(self.clone(), ids))
    }

    /// Number of entities carrying a type tag
    pub fn count(&self, kind: &str) -> StoreResult<usize> {
        Ok(self.kind_ids(kind)?.len())
    }

    fn kind_ids(&self, kind: &str) -> StoreResult<Vec<Iri>> {
        let type_iri = self.schema().require(kind)?.type_iri().clone();
        let state = self.state();
        Ok(state
            .triples
            .subjects_with(&rdf_type_iri(), &Term::Iri(type_iri)))
    }

    /// Raw pattern query over the triple set
    pub fn matching(&self, pattern: &TriplePattern) -> Vec<Triple> {
        self.state().triples.matching(pattern)
    }

    /// Copy of the full triple set
    pub fn triples(&self) -> Vec<Triple> {
        self.state().triples.iter().cloned().collect()
    }

    /// Number of triples held
    pub fn triple_count(&self) -> usize {
        self.state().triples.len()
    }

    /// Whether the store holds no triples
    pub fn is_empty(&self) -> bool {
        self.state().triples.is_empty()
    }

    /// Current version token of an entity, if present
    pub fn version_of(&self, id: &Iri) -> Option<u64> {
        self.state().versions.get(id.as_str()).copied()
    }

    /// Evaluate a SPARQL SELECT query, returning tabular bindings
    pub fn select(&self, query: &str) -> StoreResult<Bindings> {
        let state = self.state();
        Ok(sparql::select(&state.triples, query)?)
    }

    /// Export the full triple set as Turtle
    pub fn export_turtle(&self) -> StoreResult<String> {
        let state = self.state();
        Ok(write_turtle(state.triples.iter(), &self.shared.namespaces)?)
    }

    /// Import Turtle text, inserting its triples and minting version tokens
    /// for newly seen subjects. Returns the number of triples added.
    pub fn import_turtle(&self, text: &str) -> StoreResult<usize> {
        let triples = parse_turtle(text)?;

        let mut state = self.state_mut();
        let prior_seq = state.commit_seq;
        let next_seq = prior_seq + 1;
        let mut inserted: Vec<Triple> = Vec::new();
        let mut minted: Vec<String> = Vec::new();

        for triple in triples {
            let subject = triple.subject.as_str().to_string();
            if state.triples.insert(triple.clone()) {
                inserted.push(triple);
            }
            if !state.versions.contains_key(&subject) {
                state.versions.insert(subject.clone(), next_seq);
                minted.push(subject);
            }
        }

        if inserted.is_empty() && minted.is_empty() {
            return Ok(0);
        }

        state.commit_seq = next_seq;
        if let Err(e) = persistence::save(
            self.config(),
            &state.triples,
            &state.versions,
            state.commit_seq,
        ) {
            for triple in &inserted {
                state.triples.remove(triple);
            }
            for subject in &minted {
                state.versions.remove(subject);
            }
            state.commit_seq = prior_seq;
            return Err(e.into());
        }

        let count = inserted.len();
        drop(state);
        info!(triples = count, "turtle imported");
        Ok(count)
    }

    pub(crate) fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    pub(crate) fn state(&self) -> RwLockReadGuard<'_, State> {
        self.shared.state.read().unwrap()
    }

    pub(crate) fn state_mut(&self) -> RwLockWriteGuard<'_, State> {
        self.shared.state.write().unwrap()
    }
}
