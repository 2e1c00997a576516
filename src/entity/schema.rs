//! Entity schema registry
//!
//! Property and relation mappings are declared up front as explicit tables:
//! each entity type names its storage predicates, value kinds, and relation
//! targets. Nothing is discovered at runtime.
//!
//! Inverse relations are declared on the *target* type and reference the
//! forward relation on the source type; they are computed views and are
//! never written directly.

use super::ident::{self, IdError};
use super::value::ValueKind;
use crate::rdf::Iri;
use indexmap::IndexMap;
use thiserror::Error;

/// Schema declaration errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Type registered twice
    #[error("duplicate entity type: {0}")]
    DuplicateType(String),

    /// Property or relation name reused within a type
    #[error("duplicate member {name} on type {kind}")]
    DuplicateMember { kind: String, name: String },

    /// Reference to an unregistered type
    #[error("unknown entity type: {0}")]
    UnknownType(String),

    /// Inverse declaration references a relation that does not exist
    #[error("inverse {name} on {kind}: no relation {forward} on {source}")]
    DanglingInverse {
        kind: String,
        name: String,
        source: String,
        forward: String,
    },

    /// Inverse declaration references a relation that points elsewhere
    #[error("inverse {name} on {kind}: relation {source}.{forward} does not target {kind}")]
    InverseMismatch {
        kind: String,
        name: String,
        source: String,
        forward: String,
    },

    /// Invalid identifier in a declaration
    #[error(transparent)]
    Identifier(#[from] IdError),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// A scalar property declaration
#[derive(Debug, Clone)]
pub struct PropertyDef {
    name: String,
    predicate: Iri,
    kind: ValueKind,
    required: bool,
}

impl PropertyDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// A forward relation declaration
#[derive(Debug, Clone)]
pub struct RelationDef {
    name: String,
    predicate: Iri,
    target: String,
    many: bool,
}

impl RelationDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    /// Target entity type name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the relation holds a collection
    pub fn is_many(&self) -> bool {
        self.many
    }
}

/// A computed inverse-relation declaration
#[derive(Debug, Clone)]
pub struct InverseDef {
    name: String,
    source: String,
    forward: String,
}

impl InverseDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type that owns the forward relation
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the forward relation on the source type
    pub fn forward(&self) -> &str {
        &self.forward
    }
}

/// An entity type declaration
#[derive(Debug, Clone)]
pub struct TypeDef {
    name: String,
    type_iri: Iri,
    id_prefix: Iri,
    properties: IndexMap<String, PropertyDef>,
    relations: IndexMap<String, RelationDef>,
    inverses: IndexMap<String, InverseDef>,
}

impl TypeDef {
    /// Declare a type with its `rdf:type` IRI and identifier namespace.
    ///
    /// Both IRIs are sanitized; a string that cannot be made a valid IRI is
    /// rejected.
    pub fn new(name: impl Into<String>, type_iri: &str, id_prefix: &str) -> SchemaResult<Self> {
        Ok(Self {
            name: name.into(),
            type_iri: ident::sanitized_iri(type_iri)?,
            id_prefix: ident::sanitized_iri(id_prefix)?,
            properties: IndexMap::new(),
            relations: IndexMap::new(),
            inverses: IndexMap::new(),
        })
    }

    /// Declare an optional scalar property
    pub fn property(self, name: &str, predicate: &str, kind: ValueKind) -> SchemaResult<Self> {
        self.add_property(name, predicate, kind, false)
    }

    /// Declare a required scalar property; commits validate its presence
    pub fn required(self, name: &str, predicate: &str, kind: ValueKind) -> SchemaResult<Self> {
        self.add_property(name, predicate, kind, true)
    }

    fn add_property(
        mut self,
        name: &str,
        predicate: &str,
        kind: ValueKind,
        required: bool,
    ) -> SchemaResult<Self> {
        self.check_member_free(name)?;
        self.properties.insert(
            name.to_string(),
            PropertyDef {
                name: name.to_string(),
                predicate: ident::sanitized_iri(predicate)?,
                kind,
                required,
            },
        );
        Ok(self)
    }

    /// Declare a collection-valued relation
    pub fn relation(self, name: &str, predicate: &str, target: &str) -> SchemaResult<Self> {
        self.add_relation(name, predicate, target, true)
    }

    /// Declare a single-valued relation
    pub fn single_relation(self, name: &str, predicate: &str, target: &str) -> SchemaResult<Self> {
        self.add_relation(name, predicate, target, false)
    }

    fn add_relation(
        mut self,
        name: &str,
        predicate: &str,
        target: &str,
        many: bool,
    ) -> SchemaResult<Self> {
        self.check_member_free(name)?;
        self.relations.insert(
            name.to_string(),
            RelationDef {
                name: name.to_string(),
                predicate: ident::sanitized_iri(predicate)?,
                target: target.to_string(),
                many,
            },
        );
        Ok(self)
    }

    /// Declare a computed inverse of `source`'s relation `forward`
    pub fn inverse(mut self, name: &str, source: &str, forward: &str) -> SchemaResult<Self> {
        self.check_member_free(name)?;
        self.inverses.insert(
            name.to_string(),
            InverseDef {
                name: name.to_string(),
                source: source.to_string(),
                forward: forward.to_string(),
            },
        );
        Ok(self)
    }

    fn check_member_free(&self, name: &str) -> SchemaResult<()> {
        if self.properties.contains_key(name)
            || self.relations.contains_key(name)
            || self.inverses.contains_key(name)
        {
            return Err(SchemaError::DuplicateMember {
                kind: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_iri(&self) -> &Iri {
        &self.type_iri
    }

    pub fn id_prefix(&self) -> &Iri {
        &self.id_prefix
    }

    pub fn property_def(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    pub fn relation_def(&self, name: &str) -> Option<&RelationDef> {
        self.relations.get(name)
    }

    pub fn inverse_def(&self, name: &str) -> Option<&InverseDef> {
        self.inverses.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.values()
    }

    pub fn relations(&self) -> impl Iterator<Item = &RelationDef> {
        self.relations.values()
    }

    pub fn inverses(&self) -> impl Iterator<Item = &InverseDef> {
        self.inverses.values()
    }

    pub(crate) fn property_by_predicate(&self, predicate: &Iri) -> Option<&PropertyDef> {
        self.properties.values().find(|p| p.predicate() == predicate)
    }

    pub(crate) fn relation_by_predicate(&self, predicate: &Iri) -> Option<&RelationDef> {
        self.relations.values().find(|r| r.predicate() == predicate)
    }
}

/// Registry of entity types and domain namespaces
#[derive(Debug, Clone, Default)]
pub struct Schema {
    types: IndexMap<String, TypeDef>,
    namespaces: Vec<(String, String)>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace prefix for the Turtle export
    pub fn add_namespace(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.namespaces.push((prefix.into(), iri.into()));
    }

    /// Register an entity type
    pub fn register(&mut self, def: TypeDef) -> SchemaResult<()> {
        if self.types.contains_key(def.name()) {
            return Err(SchemaError::DuplicateType(def.name().to_string()));
        }
        self.types.insert(def.name().to_string(), def);
        Ok(())
    }

    /// Look up a type by name
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Look up a type by name, failing if unregistered
    pub fn require(&self, name: &str) -> SchemaResult<&TypeDef> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Resolve a type name from its `rdf:type` object IRI
    pub fn kind_for_type_iri(&self, iri: &Iri) -> Option<&str> {
        self.types
            .values()
            .find(|t| t.type_iri() == iri)
            .map(|t| t.name())
    }

    /// All registered types, in registration order
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Registered domain namespaces
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    /// Check cross-type references: relation targets must be registered and
    /// every inverse must name an existing forward relation that points back
    /// at the declaring type.
    pub fn validate(&self) -> SchemaResult<()> {
        for def in self.types.values() {
            for relation in def.relations() {
                self.require(relation.target())?;
            }
            for inverse in def.inverses() {
                let source = self.require(inverse.source())?;
                let Some(forward) = source.relation_def(inverse.forward()) else {
                    return Err(SchemaError::DanglingInverse {
                        kind: def.name().to_string(),
                        name: inverse.name().to_string(),
                        source: inverse.source().to_string(),
                        forward: inverse.forward().to_string(),
                    });
                };
                if forward.target() != def.name() {
                    return Err(SchemaError::InverseMismatch {
                        kind: def.name().to_string(),
                        name: inverse.name().to_string(),
                        source: inverse.source().to_string(),
                        forward: inverse.forward().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> TypeDef {
        TypeDef::new(
            "Person",
            "http://example.org/types/Person",
            "http://example.org/people/",
        )
        .unwrap()
        .required("name", "http://example.org/schema/name", ValueKind::String)
        .unwrap()
        .property("email", "http://example.org/schema/email", ValueKind::String)
        .unwrap()
        .single_relation("employer", "http://example.org/schema/employer", "Company")
        .unwrap()
    }

    fn company() -> TypeDef {
        TypeDef::new(
            "Company",
            "http://example.org/types/Company",
            "http://example.org/companies/",
        )
        .unwrap()
        .required("name", "http://example.org/schema/name", ValueKind::String)
        .unwrap()
        .inverse("employees", "Person", "employer")
        .unwrap()
    }

    #[test]
    fn test_registration_and_lookup() {
        let mut schema = Schema::new();
        schema.register(person()).unwrap();
        schema.register(company()).unwrap();
        schema.validate().unwrap();

        let def = schema.require("Person").unwrap();
        assert_eq!(def.property_def("name").unwrap().kind(), ValueKind::String);
        assert!(def.property_def("name").unwrap().is_required());
        assert!(!def.property_def("email").unwrap().is_required());
        assert_eq!(def.relation_def("employer").unwrap().target(), "Company");
        assert!(!def.relation_def("employer").unwrap().is_many());

        let type_iri = def.type_iri().clone();
        assert_eq!(schema.kind_for_type_iri(&type_iri), Some("Person"));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut schema = Schema::new();
        schema.register(person()).unwrap();
        assert!(matches!(
            schema.register(person()),
            Err(SchemaError::DuplicateType(_))
        ));
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let result = person().property(
            "name",
            "http://example.org/schema/name2",
            ValueKind::String,
        );
        assert!(matches!(result, Err(SchemaError::DuplicateMember { .. })));
    }

    #[test]
    fn test_validate_catches_unknown_relation_target() {
        let mut schema = Schema::new();
        schema.register(person()).unwrap();
        // Person.employer targets Company, which is not registered.
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownType(_))
        ));
    }

    #[test]
    fn test_validate_catches_dangling_inverse() {
        let mut schema = Schema::new();
        schema.register(person()).unwrap();
        let bad = TypeDef::new(
            "Company",
            "http://example.org/types/Company",
            "http://example.org/companies/",
        )
        .unwrap()
        .inverse("employees", "Person", "no_such_relation")
        .unwrap();
        schema.register(bad).unwrap();
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::DanglingInverse { .. })
        ));
    }

    #[test]
    fn test_sanitized_declarations() {
        // Whitespace is stripped from declared IRIs.
        let def = TypeDef::new(
            "Topic",
            "http://example.org/types/Topic",
            "http://example.org/topics/my topics/",
        )
        .unwrap();
        assert_eq!(def.id_prefix().as_str(), "http://example.org/topics/mytopics/");
    }
}
