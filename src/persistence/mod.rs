//! Snapshot persistence
//!
//! A store lives in a directory named by its connection descriptor and
//! persists a single bincode snapshot holding the triple set, the
//! per-entity version tokens, and the commit sequence. Snapshots are
//! written to a temp file and renamed into place so a crash mid-write
//! leaves the previous snapshot intact.

use crate::rdf::{Iri, Literal, Term, Triple, TripleStore};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const SNAPSHOT_FILE: &str = "snapshot.bin";
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Persistence errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Connection descriptor did not parse
    #[error("malformed connection descriptor: {0}")]
    Descriptor(String),

    /// Snapshot holds a term that no longer validates
    #[error("snapshot holds an invalid term: {0}")]
    Term(String),

    /// Snapshot encoding/decoding failure
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Storage location and store name
#[derive(Debug, Clone)]
pub struct StoreConfig {
    directory: PathBuf,
    name: String,
}

impl StoreConfig {
    /// Address a store by directory and name
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
        }
    }

    /// Parse a `storesdirectory=...;storename=...` connection descriptor.
    ///
    /// Unknown keys are tolerated; both known keys are required.
    pub fn parse(descriptor: &str) -> SnapshotResult<Self> {
        let mut directory: Option<&str> = None;
        let mut name: Option<&str> = None;
        for part in descriptor.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let Some((key, value)) = part.split_once('=') else {
                return Err(SnapshotError::Descriptor(format!(
                    "expected key=value, got {part:?}"
                )));
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "storesdirectory" => directory = Some(value.trim()),
                "storename" => name = Some(value.trim()),
                _ => {}
            }
        }
        match (directory, name) {
            (Some(directory), Some(name)) if !directory.is_empty() && !name.is_empty() => {
                Ok(Self::new(directory, name))
            }
            _ => Err(SnapshotError::Descriptor(
                "storesdirectory and storename are required".to_string(),
            )),
        }
    }

    /// Base directory holding all stores
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Store name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn store_dir(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.store_dir().join(SNAPSHOT_FILE)
    }
}

#[derive(Serialize, Deserialize)]
enum TermRecord {
    Iri(String),
    Literal {
        value: String,
        datatype: String,
        language: Option<String>,
    },
}

#[derive(Serialize, Deserialize)]
struct TripleRecord {
    subject: String,
    predicate: String,
    object: TermRecord,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    commit_seq: u64,
    versions: Vec<(String, u64)>,
    triples: Vec<TripleRecord>,
}

/// Write a snapshot of the store state
pub(crate) fn save(
    config: &StoreConfig,
    triples: &TripleStore,
    versions: &FxHashMap<String, u64>,
    commit_seq: u64,
) -> SnapshotResult<()> {
    let snapshot = Snapshot {
        commit_seq,
        versions: versions
            .iter()
            .map(|(id, token)| (id.clone(), *token))
            .collect(),
        triples: triples.iter().map(encode_triple).collect(),
    };

    let bytes = bincode::serialize(&snapshot)?;
    fs::create_dir_all(config.store_dir())?;
    let path = config.snapshot_path();
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, &path)?;

    debug!(
        store = config.name(),
        triples = snapshot.triples.len(),
        commit = commit_seq,
        "snapshot written"
    );
    Ok(())
}

/// Load the snapshot for a store, if one exists
#[allow(clippy::type_complexity)]
pub(crate) fn load(
    config: &StoreConfig,
) -> SnapshotResult<Option<(TripleStore, FxHashMap<String, u64>, u64)>> {
    let path = config.snapshot_path();
    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(&path)?;
    let snapshot: Snapshot = bincode::deserialize(&bytes)?;

    let mut triples = TripleStore::new();
    for record in &snapshot.triples {
        triples.insert(decode_triple(record)?);
    }
    let versions: FxHashMap<String, u64> = snapshot.versions.into_iter().collect();

    debug!(
        store = config.name(),
        triples = triples.len(),
        commit = snapshot.commit_seq,
        "snapshot loaded"
    );
    Ok(Some((triples, versions, snapshot.commit_seq)))
}

fn encode_triple(triple: &Triple) -> TripleRecord {
    TripleRecord {
        subject: triple.subject.as_str().to_string(),
        predicate: triple.predicate.as_str().to_string(),
        object: match &triple.object {
            Term::Iri(iri) => TermRecord::Iri(iri.as_str().to_string()),
            Term::Literal(lit) => TermRecord::Literal {
                value: lit.value().to_string(),
                datatype: lit.datatype().as_str().to_string(),
                language: lit.language().map(str::to_string),
            },
        },
    }
}

fn decode_triple(record: &TripleRecord) -> SnapshotResult<Triple> {
    let subject = decode_iri(&record.subject)?;
    let predicate = decode_iri(&record.predicate)?;
    let object = match &record.object {
        TermRecord::Iri(iri) => Term::Iri(decode_iri(iri)?),
        TermRecord::Literal {
            value,
            datatype,
            language,
        } => Term::Literal(match language {
            Some(language) => Literal::new_language_tagged(value.clone(), language.clone())
                .map_err(|e| SnapshotError::Term(e.to_string()))?,
            None if datatype == XSD_STRING => Literal::new_string(value.clone()),
            None => Literal::new_typed(value.clone(), decode_iri(datatype)?),
        }),
    };
    Ok(Triple::new(subject, predicate, object))
}

fn decode_iri(raw: &str) -> SnapshotResult<Iri> {
    Iri::new(raw).map_err(|e| SnapshotError::Term(e.to_string()))
}
