//! Tabular query results

use crate::rdf::Term;
use serde_json::{json, Map, Value as Json};

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Variable bindings returned by a SELECT query.
///
/// Row order is unspecified.
#[derive(Debug, Clone)]
pub struct Bindings {
    variables: Vec<String>,
    rows: Vec<Vec<Option<Term>>>,
}

impl Bindings {
    pub(crate) fn new(variables: Vec<String>, rows: Vec<Vec<Option<Term>>>) -> Self {
        Self { variables, rows }
    }

    /// Projected variable names
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row {
            variables: &self.variables,
            cells,
        })
    }

    /// Render as SPARQL-results JSON
    pub fn to_json(&self) -> Json {
        let bindings: Vec<Json> = self
            .rows
            .iter()
            .map(|cells| {
                let mut object = Map::new();
                for (variable, cell) in self.variables.iter().zip(cells) {
                    if let Some(term) = cell {
                        object.insert(variable.clone(), term_json(term));
                    }
                }
                Json::Object(object)
            })
            .collect();

        json!({
            "head": { "vars": self.variables },
            "results": { "bindings": bindings },
        })
    }
}

/// One result row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    variables: &'a [String],
    cells: &'a [Option<Term>],
}

impl<'a> Row<'a> {
    /// Get the term bound to a variable, if any
    pub fn get(&self, variable: &str) -> Option<&'a Term> {
        self.variables
            .iter()
            .position(|v| v == variable)
            .and_then(|i| self.cells.get(i))
            .and_then(|cell| cell.as_ref())
    }
}

fn term_json(term: &Term) -> Json {
    match term {
        Term::Iri(iri) => json!({ "type": "uri", "value": iri.as_str() }),
        Term::Literal(lit) => {
            let mut object = Map::new();
            object.insert("type".to_string(), json!("literal"));
            object.insert("value".to_string(), json!(lit.value()));
            if let Some(language) = lit.language() {
                object.insert("xml:lang".to_string(), json!(language));
            } else {
                let datatype = lit.datatype();
                if datatype.as_str() != XSD_STRING {
                    object.insert("datatype".to_string(), json!(datatype.as_str()));
                }
            }
            Json::Object(object)
        }
    }
}
