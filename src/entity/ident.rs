//! Entity identifier generation
//!
//! New identifiers are minted under a type's namespace prefix, or under a
//! parent entity's identifier for hierarchical keys. A hierarchical child
//! identifier always carries the parent identifier as a literal string
//! prefix, so membership is derivable from the identifier alone.

use crate::rdf::Iri;
use thiserror::Error;
use uuid::Uuid;

/// Retries before giving up on suffix collisions
const MAX_ATTEMPTS: usize = 16;

/// Length of the random suffix token; collisions are handled by retry
const SUFFIX_LEN: usize = 12;

/// Identifier errors
#[derive(Error, Debug)]
pub enum IdError {
    /// Not expressible as a valid IRI even after sanitization
    #[error("identifier not representable as an IRI: {0}")]
    Unrepresentable(String),

    /// Could not find a free suffix under the namespace
    #[error("identifier space exhausted under {0}")]
    Exhausted(String),
}

pub type IdResult<T> = Result<T, IdError>;

/// Strip characters that can never appear in an IRI.
pub fn sanitize(component: &str) -> String {
    component
        .chars()
        .filter(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
        })
        .collect()
}

/// Sanitize a raw string and parse it as an IRI.
pub fn sanitized_iri(raw: &str) -> IdResult<Iri> {
    let cleaned = sanitize(raw);
    Iri::new(cleaned).map_err(|_| IdError::Unrepresentable(raw.to_string()))
}

/// Mint a fresh identifier.
///
/// With a `parent`, the new identifier is `<parent>/<suffix>`; otherwise it
/// is `<prefix><suffix>`. `taken` reports whether a candidate is already in
/// use; generation retries with a new suffix until it finds a free one.
pub fn new_id<F>(prefix: &Iri, parent: Option<&Iri>, mut taken: F) -> IdResult<Iri>
where
    F: FnMut(&Iri) -> bool,
{
    let base = match parent {
        Some(parent) => format!("{}/", parent.as_str().trim_end_matches('/')),
        None => prefix.as_str().to_string(),
    };

    for _ in 0..MAX_ATTEMPTS {
        let token = Uuid::new_v4().simple().to_string();
        let candidate = format!("{}{}", base, &token[..SUFFIX_LEN]);
        let iri = sanitized_iri(&candidate)?;
        if !taken(&iri) {
            return Ok(iri);
        }
    }

    Err(IdError::Exhausted(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn prefix() -> Iri {
        Iri::new("http://example.org/topics/").unwrap()
    }

    #[test]
    fn test_sanitize_strips_invalid_characters() {
        assert_eq!(sanitize("Knowledge Graphs"), "KnowledgeGraphs");
        assert_eq!(sanitize("a<b>c\"d`e"), "abcde");
        assert_eq!(sanitize("plain-name_1.2"), "plain-name_1.2");
    }

    #[test]
    fn test_sanitized_iri() {
        let iri = sanitized_iri("http://example.org/topics/Knowledge Graphs").unwrap();
        assert_eq!(iri.as_str(), "http://example.org/topics/KnowledgeGraphs");

        assert!(matches!(
            sanitized_iri("   "),
            Err(IdError::Unrepresentable(_))
        ));
    }

    #[test]
    fn test_new_ids_are_unique() {
        let mut seen: HashSet<String> = HashSet::new();
        for _ in 0..100 {
            let id = new_id(&prefix(), None, |candidate| {
                seen.contains(candidate.as_str())
            })
            .unwrap();
            assert!(id.as_str().starts_with(prefix().as_str()));
            assert!(seen.insert(id.as_str().to_string()));
        }
    }

    #[test]
    fn test_hierarchical_ids_embed_parent() {
        let parent = new_id(&prefix(), None, |_| false).unwrap();
        let child = new_id(&prefix(), Some(&parent), |_| false).unwrap();
        assert!(child.as_str().starts_with(parent.as_str()));
        assert!(child.as_str().len() > parent.as_str().len());

        let grandchild = new_id(&prefix(), Some(&child), |_| false).unwrap();
        assert!(grandchild.as_str().starts_with(child.as_str()));
    }

    #[test]
    fn test_collision_retry() {
        let mut rejected = 0;
        let id = new_id(&prefix(), None, |_| {
            // Refuse the first three candidates.
            rejected += 1;
            rejected <= 3
        })
        .unwrap();
        assert_eq!(rejected, 4);
        assert!(id.as_str().starts_with(prefix().as_str()));
    }

    #[test]
    fn test_exhaustion() {
        let result = new_id(&prefix(), None, |_| true);
        assert!(matches!(result, Err(IdError::Exhausted(_))));
    }
}
