//! Turtle reader and writer

use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::namespace::{NamespaceManager, RDF_TYPE};
use crate::rdf::types::{Iri, Literal, Term, Triple};
use rio_api::model as rio;
use rio_api::parser::TriplesParser;
use rio_turtle::TurtleParser;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::BufReader;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Serialize triples to Turtle.
///
/// Emits a `@prefix` header for every registered namespace, groups
/// statements by subject, and compacts IRIs where the local name is a safe
/// prefixed-name; everything else falls back to the `<...>` form.
pub fn write_turtle<'a>(
    triples: impl IntoIterator<Item = &'a Triple>,
    namespaces: &NamespaceManager,
) -> SerializeResult<String> {
    let mut out = String::new();
    for (prefix, iri) in namespaces.prefixes() {
        writeln!(out, "@prefix {}: <{}> .", prefix, iri)
            .map_err(|e| SerializeError::Format(e.to_string()))?;
    }

    // Deterministic output: subjects sorted, statements sorted within each.
    let mut by_subject: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for triple in triples {
        let predicate = if triple.predicate.as_str() == RDF_TYPE {
            "a".to_string()
        } else {
            render_iri(&triple.predicate, namespaces)
        };
        let object = render_term(&triple.object, namespaces);
        by_subject
            .entry(triple.subject.as_str().to_string())
            .or_default()
            .push((predicate, object));
    }

    for (subject, mut statements) in by_subject {
        statements.sort();
        let subject_iri =
            Iri::new(subject.clone()).map_err(|_| SerializeError::UnserializableIri(subject))?;
        writeln!(out).map_err(|e| SerializeError::Format(e.to_string()))?;
        write!(out, "{}", render_iri(&subject_iri, namespaces))
            .map_err(|e| SerializeError::Format(e.to_string()))?;
        let last = statements.len() - 1;
        for (i, (predicate, object)) in statements.into_iter().enumerate() {
            let terminator = if i == last { " ." } else { " ;" };
            write!(out, "\n    {} {}{}", predicate, object, terminator)
                .map_err(|e| SerializeError::Format(e.to_string()))?;
        }
        writeln!(out).map_err(|e| SerializeError::Format(e.to_string()))?;
    }

    Ok(out)
}

/// Parse Turtle text into triples.
///
/// Blank nodes are rejected: every subject in this store is IRI-identified.
pub fn parse_turtle(input: &str) -> ParseResult<Vec<Triple>> {
    let mut parser = TurtleParser::new(BufReader::new(input.as_bytes()), None);
    let mut triples = Vec::new();
    let mut bad_term: Option<ParseError> = None;

    let parsed: Result<(), rio_turtle::TurtleError> = parser.parse_all(&mut |t| {
        match convert_triple(&t) {
            Ok(triple) => triples.push(triple),
            Err(e) => {
                if bad_term.is_none() {
                    bad_term = Some(e);
                }
            }
        }
        Ok(())
    });

    if let Some(e) = bad_term {
        return Err(e);
    }
    match parsed {
        Ok(()) => Ok(triples),
        Err(e) => Err(ParseError::Syntax(e.to_string())),
    }
}

fn render_iri(iri: &Iri, namespaces: &NamespaceManager) -> String {
    if let Some((prefix, local)) = namespaces.compact(iri.as_str()) {
        if is_safe_local_name(&local) {
            return format!("{}:{}", prefix, local);
        }
    }
    format!("<{}>", iri.as_str())
}

fn render_term(term: &Term, namespaces: &NamespaceManager) -> String {
    match term {
        Term::Iri(iri) => render_iri(iri, namespaces),
        Term::Literal(lit) => {
            let lexical = escape_literal(lit.value());
            if let Some(lang) = lit.language() {
                format!("\"{}\"@{}", lexical, lang)
            } else {
                let datatype = lit.datatype();
                if datatype.as_str() == XSD_STRING {
                    format!("\"{}\"", lexical)
                } else {
                    format!("\"{}\"^^{}", lexical, render_iri(&datatype, namespaces))
                }
            }
        }
    }
}

// Conservative subset of Turtle's PN_LOCAL; anything richer (slashes from
// hierarchical identifiers, percent escapes) falls back to the <...> form.
fn is_safe_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphanumeric() || first == '_') {
        return false;
    }
    if local.ends_with('.') {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn convert_triple(t: &rio::Triple<'_>) -> ParseResult<Triple> {
    let subject = match t.subject {
        rio::Subject::NamedNode(n) => {
            Iri::new(n.iri).map_err(|e| ParseError::UnsupportedTerm(e.to_string()))?
        }
        other => return Err(ParseError::UnsupportedTerm(other.to_string())),
    };
    let predicate =
        Iri::new(t.predicate.iri).map_err(|e| ParseError::UnsupportedTerm(e.to_string()))?;
    let object = convert_object(&t.object)?;
    Ok(Triple::new(subject, predicate, object))
}

fn convert_object(term: &rio::Term<'_>) -> ParseResult<Term> {
    match term {
        rio::Term::NamedNode(n) => Ok(Term::Iri(
            Iri::new(n.iri).map_err(|e| ParseError::UnsupportedTerm(e.to_string()))?,
        )),
        rio::Term::Literal(l) => match l {
            rio::Literal::Simple { value } => Ok(Term::Literal(Literal::new_string(*value))),
            rio::Literal::LanguageTaggedString { value, language } => Ok(Term::Literal(
                Literal::new_language_tagged(*value, *language)
                    .map_err(|e| ParseError::UnsupportedTerm(e.to_string()))?,
            )),
            rio::Literal::Typed { value, datatype } => {
                let dt = Iri::new(datatype.iri)
                    .map_err(|e| ParseError::UnsupportedTerm(e.to_string()))?;
                Ok(Term::Literal(Literal::new_typed(*value, dt)))
            }
        },
        other => Err(ParseError::UnsupportedTerm(other.to_string())),
    }
}
