//! Entity ↔ triple projection
//!
//! The mapper translates between [`Entity`] snapshots and their triple
//! representation using the schema's predicate tables: one `rdf:type`
//! triple per type tag, one literal triple per property, one IRI triple per
//! relation target. Loading reverses the projection; triples whose
//! predicate is not declared for any of the subject's types are left alone.

use super::entity::Entity;
use super::schema::{PropertyDef, RelationDef, Schema};
use super::value::Value;
use super::{EntityError, EntityResult};
use crate::rdf::namespace::rdf_type_iri;
use crate::rdf::{Iri, Term, Triple, TripleStore};

/// Schema-driven projection between entities and triples
pub struct Mapper<'a> {
    schema: &'a Schema,
}

impl<'a> Mapper<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    fn rdf_type(&self) -> Iri {
        rdf_type_iri()
    }

    /// Project an entity to its full triple set
    pub fn triples_of(&self, entity: &Entity) -> EntityResult<Vec<Triple>> {
        let rdf_type = self.rdf_type();
        let mut triples = Vec::new();

        for kind in entity.kinds() {
            let def = self
                .schema
                .get(kind)
                .ok_or_else(|| EntityError::UnknownType(kind.to_string()))?;
            triples.push(Triple::new(
                entity.id().clone(),
                rdf_type.clone(),
                def.type_iri().clone(),
            ));
        }

        for name in entity.property_names() {
            let def = self.find_property(entity, name)?;
            let Some(value) = entity.get(name) else {
                continue;
            };
            if value.kind() != def.kind() {
                return Err(EntityError::KindMismatch {
                    property: name.to_string(),
                    expected: def.kind(),
                    found: value.kind(),
                });
            }
            triples.push(Triple::new(
                entity.id().clone(),
                def.predicate().clone(),
                value.to_literal(),
            ));
        }

        for name in entity.relation_names() {
            let def = self.find_relation(entity, name)?;
            for target in entity.relation(name) {
                triples.push(Triple::new(
                    entity.id().clone(),
                    def.predicate().clone(),
                    target.clone(),
                ));
            }
        }

        Ok(triples)
    }

    /// Load an entity from its subject triples.
    ///
    /// Returns `None` when the subject has no triples or carries no type tag
    /// known to the schema.
    pub fn load(&self, store: &TripleStore, id: &Iri) -> EntityResult<Option<Entity>> {
        let triples = store.subject_triples(id);
        if triples.is_empty() {
            return Ok(None);
        }

        let rdf_type = self.rdf_type();
        let mut kinds: Vec<&str> = Vec::new();
        for triple in &triples {
            if triple.predicate == rdf_type {
                if let Some(type_iri) = triple.object.as_iri() {
                    if let Some(kind) = self.schema.kind_for_type_iri(type_iri) {
                        kinds.push(kind);
                    }
                }
            }
        }
        kinds.sort_unstable();
        let Some((first, rest)) = kinds.split_first() else {
            return Ok(None);
        };

        let mut entity = Entity::new(id.clone(), *first);
        for kind in rest {
            entity.add_kind(*kind);
        }

        let mut relation_targets: Vec<(String, Iri)> = Vec::new();
        for triple in &triples {
            if triple.predicate == rdf_type {
                continue;
            }
            if let Some(def) = self.property_for_predicate(&entity, &triple.predicate) {
                let name = def.name().to_string();
                let kind = def.kind();
                if let Some(literal) = triple.object.as_literal() {
                    entity.set_value(name, Value::from_literal(literal, kind)?);
                }
            } else if let Some(def) = self.relation_for_predicate(&entity, &triple.predicate) {
                if let Some(target) = triple.object.as_iri() {
                    relation_targets.push((def.name().to_string(), target.clone()));
                }
            }
            // Predicates outside the schema belong to raw triples and are
            // not part of the entity view.
        }

        relation_targets.sort_by(|a, b| (a.0.as_str(), a.1.as_str()).cmp(&(b.0.as_str(), b.1.as_str())));
        let mut grouped: Vec<(String, Vec<Iri>)> = Vec::new();
        for (name, target) in relation_targets {
            match grouped.last_mut() {
                Some((current, targets)) if *current == name => targets.push(target),
                _ => grouped.push((name, vec![target])),
            }
        }
        for (name, targets) in grouped {
            entity.set_targets(name, targets);
        }

        Ok(Some(entity))
    }

    /// Resolve a computed inverse relation by reverse lookup
    pub fn inverse_targets(
        &self,
        store: &TripleStore,
        entity: &Entity,
        name: &str,
    ) -> EntityResult<Vec<Iri>> {
        for kind in entity.kinds() {
            let def = self
                .schema
                .get(kind)
                .ok_or_else(|| EntityError::UnknownType(kind.to_string()))?;
            if let Some(inverse) = def.inverse_def(name) {
                let source = self.schema.require(inverse.source())?;
                let forward = source.relation_def(inverse.forward()).ok_or_else(|| {
                    EntityError::UnknownRelation {
                        kind: inverse.source().to_string(),
                        name: inverse.forward().to_string(),
                    }
                })?;
                let mut subjects = store
                    .subjects_with(forward.predicate(), &Term::Iri(entity.id().clone()));
                subjects.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
                return Ok(subjects);
            }
        }
        Err(EntityError::UnknownRelation {
            kind: self.kinds_label(entity),
            name: name.to_string(),
        })
    }

    /// Check required properties for every type tag the entity carries
    pub fn validate_required(&self, entity: &Entity) -> EntityResult<()> {
        for kind in entity.kinds() {
            let def = self
                .schema
                .get(kind)
                .ok_or_else(|| EntityError::UnknownType(kind.to_string()))?;
            for property in def.properties() {
                if property.is_required() && entity.get(property.name()).is_none() {
                    return Err(EntityError::MissingRequired {
                        id: entity.id().as_str().to_string(),
                        kind: kind.to_string(),
                        property: property.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Find a property declaration across the entity's type tags
    pub fn find_property(&self, entity: &Entity, name: &str) -> EntityResult<&'a PropertyDef> {
        for kind in entity.kinds() {
            let def = self
                .schema
                .get(kind)
                .ok_or_else(|| EntityError::UnknownType(kind.to_string()))?;
            if let Some(property) = def.property_def(name) {
                return Ok(property);
            }
        }
        Err(EntityError::UnknownProperty {
            kind: self.kinds_label(entity),
            name: name.to_string(),
        })
    }

    /// Find a forward relation declaration across the entity's type tags.
    ///
    /// A name that resolves to an inverse declaration is a write to a
    /// computed view and is rejected.
    pub fn find_relation(&self, entity: &Entity, name: &str) -> EntityResult<&'a RelationDef> {
        for kind in entity.kinds() {
            let def = self
                .schema
                .get(kind)
                .ok_or_else(|| EntityError::UnknownType(kind.to_string()))?;
            if def.inverse_def(name).is_some() {
                return Err(EntityError::InverseWrite(name.to_string()));
            }
            if let Some(relation) = def.relation_def(name) {
                return Ok(relation);
            }
        }
        Err(EntityError::UnknownRelation {
            kind: self.kinds_label(entity),
            name: name.to_string(),
        })
    }

    fn property_for_predicate(&self, entity: &Entity, predicate: &Iri) -> Option<&PropertyDef> {
        entity
            .kinds()
            .filter_map(|kind| self.schema.get(kind))
            .find_map(|def| def.property_by_predicate(predicate))
    }

    fn relation_for_predicate(&self, entity: &Entity, predicate: &Iri) -> Option<&RelationDef> {
        entity
            .kinds()
            .filter_map(|kind| self.schema.get(kind))
            .find_map(|def| def.relation_by_predicate(predicate))
    }

    fn kinds_label(&self, entity: &Entity) -> String {
        entity.kinds().collect::<Vec<_>>().join("+")
    }
}
