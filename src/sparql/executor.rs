//! Basic graph pattern evaluation
//!
//! Nested-loop join with binding propagation: patterns run most-constrained
//! first, each solution so far instantiates the next pattern's variables
//! before it hits the store indexes.

use super::parser::{PatternTerm, PatternTriple, SelectQuery};
use super::results::Bindings;
use crate::rdf::{Iri, Term, TriplePattern, TripleStore};
use rustc_hash::{FxHashMap, FxHashSet};

type Solution = FxHashMap<String, Term>;

/// Evaluate a parsed SELECT query
pub fn evaluate(store: &TripleStore, query: &SelectQuery) -> Bindings {
    let mut patterns = query.patterns.clone();
    patterns.sort_by_key(|p| std::cmp::Reverse(p.bound_positions()));

    let mut solutions: Vec<Solution> = vec![Solution::default()];
    for pattern in &patterns {
        let mut next: Vec<Solution> = Vec::new();
        for solution in &solutions {
            extend_solutions(store, pattern, solution, &mut next);
        }
        solutions = next;
        if solutions.is_empty() {
            break;
        }
    }

    let mut rows: Vec<Vec<Option<Term>>> = solutions
        .iter()
        .map(|solution| {
            query
                .variables
                .iter()
                .map(|var| solution.get(var).cloned())
                .collect()
        })
        .collect();

    if query.distinct {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        rows.retain(|row| {
            let key = row
                .iter()
                .map(|cell| match cell {
                    Some(term) => term.to_string(),
                    None => String::new(),
                })
                .collect::<Vec<_>>()
                .join("\u{1f}");
            seen.insert(key)
        });
    }

    Bindings::new(query.variables.clone(), rows)
}

fn extend_solutions(
    store: &TripleStore,
    pattern: &PatternTriple,
    solution: &Solution,
    out: &mut Vec<Solution>,
) {
    // Instantiate the pattern under the current solution. A variable bound
    // to a literal can never sit in subject or predicate position.
    let subject = match resolve(&pattern.subject, solution) {
        Resolved::Iri(iri) => Some(iri),
        Resolved::Unbound => None,
        Resolved::NonIri => return,
    };
    let predicate = match resolve(&pattern.predicate, solution) {
        Resolved::Iri(iri) => Some(iri),
        Resolved::Unbound => None,
        Resolved::NonIri => return,
    };
    let object = match &pattern.object {
        PatternTerm::Variable(name) => solution.get(name).cloned(),
        PatternTerm::Iri(iri) => Some(Term::Iri(iri.clone())),
        PatternTerm::Literal(lit) => Some(Term::Literal(lit.clone())),
    };

    let triple_pattern = TriplePattern::new(subject, predicate, object);
    for triple in store.matching(&triple_pattern) {
        let mut extended = solution.clone();
        let ok = bind(&mut extended, &pattern.subject, Term::Iri(triple.subject))
            && bind(
                &mut extended,
                &pattern.predicate,
                Term::Iri(triple.predicate),
            )
            && bind(&mut extended, &pattern.object, triple.object);
        if ok {
            out.push(extended);
        }
    }
}

enum Resolved {
    Iri(Iri),
    Unbound,
    NonIri,
}

fn resolve(term: &PatternTerm, solution: &Solution) -> Resolved {
    match term {
        PatternTerm::Iri(iri) => Resolved::Iri(iri.clone()),
        PatternTerm::Literal(_) => Resolved::NonIri,
        PatternTerm::Variable(name) => match solution.get(name) {
            Some(Term::Iri(iri)) => Resolved::Iri(iri.clone()),
            Some(Term::Literal(_)) => Resolved::NonIri,
            None => Resolved::Unbound,
        },
    }
}

// Bind a variable position to the matched term, checking consistency when
// the same variable occurs more than once in the pattern.
fn bind(solution: &mut Solution, term: &PatternTerm, matched: Term) -> bool {
    let PatternTerm::Variable(name) = term else {
        return true;
    };
    match solution.get(name) {
        Some(existing) => *existing == matched,
        None => {
            solution.insert(name.clone(), matched);
            true
        }
    }
}
