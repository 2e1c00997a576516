//! Entity layer: schema registry, values, identifier generation, and the
//! projection of typed entities onto triples.

pub mod entity;
pub mod ident;
pub mod mapper;
pub mod schema;
pub mod value;

pub use entity::Entity;
pub use ident::{IdError, IdResult};
pub use mapper::Mapper;
pub use schema::{
    InverseDef, PropertyDef, RelationDef, Schema, SchemaError, SchemaResult, TypeDef,
};
pub use value::{Value, ValueError, ValueKind, ValueResult};

use thiserror::Error;

/// Validation errors raised while staging or committing entity mutations
#[derive(Error, Debug)]
pub enum EntityError {
    /// Type tag not present in the schema
    #[error("unknown entity type: {0}")]
    UnknownType(String),

    /// Property not declared on any of the entity's types
    #[error("no property {name} on {kind}")]
    UnknownProperty { kind: String, name: String },

    /// Relation not declared on any of the entity's types
    #[error("no relation {name} on {kind}")]
    UnknownRelation { kind: String, name: String },

    /// Write attempted against a computed inverse relation
    #[error("relation {0} is a computed inverse and cannot be written")]
    InverseWrite(String),

    /// Value kind does not match the property declaration
    #[error("property {property} expects {expected}, got {found}")]
    KindMismatch {
        property: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// Required property missing at commit time
    #[error("entity {id} is missing required {kind} property {property}")]
    MissingRequired {
        id: String,
        kind: String,
        property: String,
    },

    /// More than one target staged for a single-valued relation
    #[error("relation {0} is single-valued")]
    SingleValued(String),

    /// Mutation staged against an entity already deleted in this session
    #[error("entity {0} is deleted in this session")]
    Deleted(String),

    /// Codec failure
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Schema lookup failure
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type EntityResult<T> = Result<T, EntityError>;
