//! Indexed triple store
//!
//! In-memory set of triples with two incrementally maintained indexes:
//!
//! - SPO: subject -> predicate -> objects
//! - POS: predicate -> object -> subjects
//!
//! The POS index is what makes inverse-relation reads cheap: resolving
//! "which subjects point at this object through this predicate" is a pair of
//! map lookups instead of a full scan.

use super::types::{Iri, Term, Triple, TriplePattern};
use rustc_hash::{FxHashMap, FxHashSet};

/// Triple store with set semantics
#[derive(Debug, Default, Clone)]
pub struct TripleStore {
    /// All triples (primary storage)
    triples: FxHashSet<Triple>,

    /// SPO index: subject -> predicate -> objects
    spo: FxHashMap<Iri, FxHashMap<Iri, FxHashSet<Term>>>,

    /// POS index: predicate -> object -> subjects
    pos: FxHashMap<Iri, FxHashMap<Term, FxHashSet<Iri>>>,
}

impl TripleStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if !self.triples.insert(triple.clone()) {
            return false;
        }

        self.spo
            .entry(triple.subject.clone())
            .or_default()
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.object.clone());

        self.pos
            .entry(triple.predicate)
            .or_default()
            .entry(triple.object)
            .or_default()
            .insert(triple.subject);

        true
    }

    /// Remove a triple. Returns `false` if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }

        if let Some(preds) = self.spo.get_mut(&triple.subject) {
            if let Some(objects) = preds.get_mut(&triple.predicate) {
                objects.remove(&triple.object);
                if objects.is_empty() {
                    preds.remove(&triple.predicate);
                }
            }
            if preds.is_empty() {
                self.spo.remove(&triple.subject);
            }
        }

        if let Some(objects) = self.pos.get_mut(&triple.predicate) {
            if let Some(subjects) = objects.get_mut(&triple.object) {
                subjects.remove(&triple.subject);
                if subjects.is_empty() {
                    objects.remove(&triple.object);
                }
            }
            if objects.is_empty() {
                self.pos.remove(&triple.predicate);
            }
        }

        true
    }

    /// Check if a triple exists
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Total number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the store holds no triples
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Drop all triples and indexes
    pub fn clear(&mut self) {
        self.triples.clear();
        self.spo.clear();
        self.pos.clear();
    }

    /// Iterate over all triples, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Objects reachable from `subject` through `predicate`
    pub fn objects(&self, subject: &Iri, predicate: &Iri) -> Vec<Term> {
        self.spo
            .get(subject)
            .and_then(|preds| preds.get(predicate))
            .map(|objects| objects.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Subjects pointing at `object` through `predicate` (reverse lookup)
    pub fn subjects_with(&self, predicate: &Iri, object: &Term) -> Vec<Iri> {
        self.pos
            .get(predicate)
            .and_then(|objects| objects.get(object))
            .map(|subjects| subjects.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All triples whose subject is `subject`
    pub fn subject_triples(&self, subject: &Iri) -> Vec<Triple> {
        let Some(preds) = self.spo.get(subject) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (predicate, objects) in preds {
            for object in objects {
                out.push(Triple::new(
                    subject.clone(),
                    predicate.clone(),
                    object.clone(),
                ));
            }
        }
        out
    }

    /// Triples matching a pattern, resolved through the narrowest index
    pub fn matching(&self, pattern: &TriplePattern) -> Vec<Triple> {
        match (&pattern.subject, &pattern.predicate, &pattern.object) {
            (Some(s), Some(p), Some(o)) => {
                let triple = Triple::new(s.clone(), p.clone(), o.clone());
                if self.triples.contains(&triple) {
                    vec![triple]
                } else {
                    Vec::new()
                }
            }
            (Some(s), Some(p), None) => self
                .objects(s, p)
                .into_iter()
                .map(|o| Triple::new(s.clone(), p.clone(), o))
                .collect(),
            (Some(s), None, _) => self
                .subject_triples(s)
                .into_iter()
                .filter(|t| pattern.matches(t))
                .collect(),
            (None, Some(p), Some(o)) => self
                .subjects_with(p, o)
                .into_iter()
                .map(|s| Triple::new(s, p.clone(), o.clone()))
                .collect(),
            (None, Some(p), None) => {
                let Some(objects) = self.pos.get(p) else {
                    return Vec::new();
                };
                let mut out = Vec::new();
                for (object, subjects) in objects {
                    for subject in subjects {
                        out.push(Triple::new(subject.clone(), p.clone(), object.clone()));
                    }
                }
                out
            }
            (None, None, _) => self
                .triples
                .iter()
                .filter(|t| pattern.matches(t))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::types::Literal;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn name_triple(subject: &str, name: &str) -> Triple {
        Triple::new(
            iri(subject),
            iri("http://example.org/schema/name"),
            Literal::new_string(name),
        )
    }

    #[test]
    fn test_insert_is_set_semantics() {
        let mut store = TripleStore::new();
        let triple = name_triple("http://example.org/a", "Alice");

        assert!(store.insert(triple.clone()));
        assert!(!store.insert(triple.clone()));
        assert_eq!(store.len(), 1);
        assert!(store.contains(&triple));
    }

    #[test]
    fn test_remove_cleans_indexes() {
        let mut store = TripleStore::new();
        let triple = name_triple("http://example.org/a", "Alice");

        store.insert(triple.clone());
        assert!(store.remove(&triple));
        assert!(!store.remove(&triple));
        assert!(store.is_empty());
        assert!(store
            .objects(&triple.subject, &triple.predicate)
            .is_empty());
        assert!(store
            .subjects_with(&triple.predicate, &triple.object)
            .is_empty());
    }

    #[test]
    fn test_objects_lookup() {
        let mut store = TripleStore::new();
        store.insert(name_triple("http://example.org/a", "Alice"));
        store.insert(name_triple("http://example.org/a", "Allie"));
        store.insert(name_triple("http://example.org/b", "Bob"));

        let objects = store.objects(
            &iri("http://example.org/a"),
            &iri("http://example.org/schema/name"),
        );
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn test_reverse_lookup() {
        let mut store = TripleStore::new();
        let authored = iri("http://example.org/schema/author");
        let alice = iri("http://example.org/a");
        store.insert(Triple::new(
            iri("http://example.org/pub1"),
            authored.clone(),
            alice.clone(),
        ));
        store.insert(Triple::new(
            iri("http://example.org/pub2"),
            authored.clone(),
            alice.clone(),
        ));

        let subjects = store.subjects_with(&authored, &Term::Iri(alice));
        assert_eq!(subjects.len(), 2);
    }

    #[test]
    fn test_matching_uses_bound_positions() {
        let mut store = TripleStore::new();
        store.insert(name_triple("http://example.org/a", "Alice"));
        store.insert(name_triple("http://example.org/b", "Bob"));

        // fully bound
        let pattern = TriplePattern::new(
            Some(iri("http://example.org/a")),
            Some(iri("http://example.org/schema/name")),
            Some(Literal::new_string("Alice").into()),
        );
        assert_eq!(store.matching(&pattern).len(), 1);

        // subject bound
        let pattern = TriplePattern::new(Some(iri("http://example.org/a")), None, None);
        assert_eq!(store.matching(&pattern).len(), 1);

        // predicate bound
        let pattern =
            TriplePattern::new(None, Some(iri("http://example.org/schema/name")), None);
        assert_eq!(store.matching(&pattern).len(), 2);

        // object bound
        let pattern = TriplePattern::new(
            None,
            Some(iri("http://example.org/schema/name")),
            Some(Literal::new_string("Bob").into()),
        );
        let matched = store.matching(&pattern);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].subject.as_str(), "http://example.org/b");

        // unbound
        assert_eq!(store.matching(&TriplePattern::default()).len(), 2);
    }

    #[test]
    fn test_subject_triples() {
        let mut store = TripleStore::new();
        store.insert(name_triple("http://example.org/a", "Alice"));
        store.insert(Triple::new(
            iri("http://example.org/a"),
            iri("http://example.org/schema/email"),
            Literal::new_string("alice@example.org"),
        ));
        store.insert(name_triple("http://example.org/b", "Bob"));

        assert_eq!(store.subject_triples(&iri("http://example.org/a")).len(), 2);
        assert_eq!(store.subject_triples(&iri("http://example.org/c")).len(), 0);
    }
}
