//! RDF layer: triple primitives, the indexed triple store, namespace
//! prefixes, and Turtle interchange.

pub mod namespace;
pub mod serialization;
pub mod store;
pub mod types;

pub use namespace::{rdf_type_iri, NamespaceManager, PrefixError, PrefixResult, RDF_TYPE};
pub use serialization::{
    parse_turtle, write_turtle, ParseError, ParseResult, SerializeError, SerializeResult,
};
pub use store::TripleStore;
pub use types::{Iri, Literal, RdfError, RdfResult, Term, Triple, TriplePattern};
