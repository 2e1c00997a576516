//! SPARQL SELECT queries against committed state.

mod common;

use tempfile::TempDir;
use trestle::{SparqlError, StoreError};

#[test]
fn select_names_of_people() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "select-names");
    common::populate(&store);

    let bindings = store
        .select(
            "PREFIX sch: <http://example.org/schema/> \
             PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> \
             PREFIX typ: <http://example.org/types/> \
             SELECT ?name WHERE { \
                ?person rdf:type typ:Person . \
                ?person sch:name ?name \
             }",
        )
        .unwrap();

    assert_eq!(bindings.variables(), &["name"]);
    let mut names: Vec<String> = bindings
        .iter()
        .map(|row| row.get("name").unwrap().as_literal().unwrap().value().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Alice Smith", "Bob Jones", "Charlie Brown"]);
}

#[test]
fn select_joins_publications_to_authors() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "select-joins");
    common::populate(&store);

    let bindings = store
        .select(
            "PREFIX sch: <http://example.org/schema/> \
             SELECT ?title WHERE { \
                ?pub sch:author ?person . \
                ?person sch:name \"Alice Smith\" . \
                ?pub sch:title ?title \
             }",
        )
        .unwrap();

    let mut titles: Vec<String> = bindings
        .iter()
        .map(|row| row.get("title").unwrap().as_literal().unwrap().value().to_string())
        .collect();
    titles.sort();
    assert_eq!(
        titles,
        vec![
            "A Survey of Semantic Web Technologies",
            "Entity Graphs in Embedded Stores",
        ]
    );
}

#[test]
fn select_distinct_collapses_duplicates() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "select-distinct");
    common::populate(&store);

    let bindings = store
        .select(
            "PREFIX sch: <http://example.org/schema/> \
             SELECT DISTINCT ?pub WHERE { ?pub sch:author ?anyone }",
        )
        .unwrap();
    assert_eq!(bindings.len(), 3);
}

#[test]
fn bindings_render_as_json() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "select-json");
    common::populate(&store);

    let bindings = store
        .select(
            "PREFIX sch: <http://example.org/schema/> \
             SELECT ?who ?name WHERE { ?who sch:name \"Alice Smith\" . ?who sch:name ?name }",
        )
        .unwrap();
    let json = bindings.to_json();

    assert_eq!(json["head"]["vars"][0], "who");
    let binding = &json["results"]["bindings"][0];
    assert_eq!(binding["who"]["type"], "uri");
    assert_eq!(binding["name"]["type"], "literal");
    assert_eq!(binding["name"]["value"], "Alice Smith");
}

#[test]
fn unmatched_patterns_yield_empty_bindings() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "select-empty");
    common::populate(&store);

    let bindings = store
        .select(
            "PREFIX sch: <http://example.org/schema/> \
             SELECT ?who WHERE { ?who sch:name \"Nobody At All\" }",
        )
        .unwrap();
    assert!(bindings.is_empty());
}

#[test]
fn unsupported_query_forms_are_reported() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "select-unsupported");
    common::populate(&store);

    let result = store.select("ASK { ?s ?p ?o }");
    assert!(matches!(
        result,
        Err(StoreError::Query(SparqlError::Unsupported(_)))
    ));

    let result = store.select("SELECT ?s WHERE { ?s ?p ?o } ORDER BY ?s");
    assert!(matches!(
        result,
        Err(StoreError::Query(SparqlError::Unsupported(_)))
    ));

    let result = store.select("SELECT ?s WHERE { ?s ?p ");
    assert!(matches!(
        result,
        Err(StoreError::Query(SparqlError::Parse(_)))
    ));
}
