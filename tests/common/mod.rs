//! Shared fixture: the academic knowledge-graph schema and sample data.

#![allow(dead_code)]

use trestle::{Iri, Schema, Store, StoreConfig, TypeDef, ValueKind};

pub const SCHEMA_NS: &str = "http://example.org/schema/";
pub const TYPES_NS: &str = "http://example.org/types/";

fn sch(name: &str) -> String {
    format!("{SCHEMA_NS}{name}")
}

fn typ(name: &str) -> String {
    format!("{TYPES_NS}{name}")
}

/// People, companies, publications, topics, and researchers.
pub fn academic_schema() -> Schema {
    let mut schema = Schema::new();
    schema.add_namespace("ppl", "http://example.org/people/");
    schema.add_namespace("co", "http://example.org/companies/");
    schema.add_namespace("pub", "http://example.org/publications/");
    schema.add_namespace("top", "http://example.org/topics/");
    schema.add_namespace("sch", SCHEMA_NS);
    schema.add_namespace("typ", TYPES_NS);

    schema
        .register(
            TypeDef::new("Person", &typ("Person"), "http://example.org/people/")
                .unwrap()
                .required("name", &sch("name"), ValueKind::String)
                .unwrap()
                .property("email", &sch("email"), ValueKind::String)
                .unwrap()
                .property("organization", &sch("organization"), ValueKind::String)
                .unwrap()
                .property("modified", &sch("modified"), ValueKind::DateTime)
                .unwrap()
                .single_relation("employer", &sch("employer"), "Company")
                .unwrap()
                .inverse("publications", "Publication", "authors")
                .unwrap(),
        )
        .unwrap();

    schema
        .register(
            TypeDef::new("Company", &typ("Company"), "http://example.org/companies/")
                .unwrap()
                .required("name", &sch("companyName"), ValueKind::String)
                .unwrap()
                .property("modified", &sch("modified"), ValueKind::DateTime)
                .unwrap()
                .inverse("employees", "Person", "employer")
                .unwrap(),
        )
        .unwrap();

    schema
        .register(
            TypeDef::new(
                "Publication",
                &typ("Publication"),
                "http://example.org/publications/",
            )
            .unwrap()
            .required("title", &sch("title"), ValueKind::String)
            .unwrap()
            .property("published", &sch("published"), ValueKind::DateTime)
            .unwrap()
            .property("abstract", &sch("abstract"), ValueKind::String)
            .unwrap()
            .property("modified", &sch("modified"), ValueKind::DateTime)
            .unwrap()
            .relation("authors", &sch("author"), "Person")
            .unwrap()
            .relation("topics", &sch("topic"), "Topic")
            .unwrap()
            .relation("references", &sch("references"), "Publication")
            .unwrap()
            .inverse("cited_by", "Publication", "references")
            .unwrap(),
        )
        .unwrap();

    schema
        .register(
            TypeDef::new("Topic", &typ("Topic"), "http://example.org/topics/")
                .unwrap()
                .required("name", &sch("topicName"), ValueKind::String)
                .unwrap()
                .property("description", &sch("description"), ValueKind::String)
                .unwrap()
                .property("modified", &sch("modified"), ValueKind::DateTime)
                .unwrap()
                .single_relation("parent", &sch("parentTopic"), "Topic")
                .unwrap()
                .inverse("sub_topics", "Topic", "parent")
                .unwrap()
                .inverse("publications", "Publication", "topics")
                .unwrap(),
        )
        .unwrap();

    schema
        .register(
            TypeDef::new("Researcher", &typ("Researcher"), "http://example.org/people/")
                .unwrap()
                .required("h_index", &sch("hIndex"), ValueKind::Integer)
                .unwrap()
                .property("orcid", &sch("orcid"), ValueKind::String)
                .unwrap(),
        )
        .unwrap();

    schema
}

pub fn open_store(dir: &std::path::Path, name: &str) -> Store {
    Store::open(StoreConfig::new(dir, name), academic_schema()).unwrap()
}

/// Identifiers of the committed sample graph.
pub struct Sample {
    pub knowledge_graphs: Iri,
    pub semantic_web: Iri,
    pub rdf_databases: Iri,
    pub meridian: Iri,
    pub institute: Iri,
    pub alice: Iri,
    pub bob: Iri,
    pub charlie: Iri,
    pub pub1: Iri,
    pub pub2: Iri,
    pub pub3: Iri,
}

/// Populate a store with the sample academic graph and commit it.
pub fn populate(store: &Store) -> Sample {
    let mut session = store.session();

    let knowledge_graphs = session.create("Topic").unwrap();
    session
        .set(knowledge_graphs.id(), "name", "Knowledge Graphs")
        .unwrap();
    session
        .set(
            knowledge_graphs.id(),
            "description",
            "Structured knowledge as graphs",
        )
        .unwrap();

    let semantic_web = session
        .create_child("Topic", knowledge_graphs.id())
        .unwrap();
    session
        .set(semantic_web.id(), "name", "Semantic Web")
        .unwrap();
    session
        .set_relation(
            semantic_web.id(),
            "parent",
            &[knowledge_graphs.id().clone()],
        )
        .unwrap();

    let rdf_databases = session.create_child("Topic", semantic_web.id()).unwrap();
    session
        .set(rdf_databases.id(), "name", "RDF Databases")
        .unwrap();
    session
        .set_relation(rdf_databases.id(), "parent", &[semantic_web.id().clone()])
        .unwrap();

    let meridian = session.create("Company").unwrap();
    session
        .set(meridian.id(), "name", "Meridian Analytics")
        .unwrap();

    let institute = session.create("Company").unwrap();
    session
        .set(institute.id(), "name", "Institute of Graph Research")
        .unwrap();

    let alice = session.create("Person").unwrap();
    session.set(alice.id(), "name", "Alice Smith").unwrap();
    session
        .set(alice.id(), "email", "alice.smith@example.org")
        .unwrap();
    session
        .set_relation(alice.id(), "employer", &[institute.id().clone()])
        .unwrap();

    let bob = session.create("Person").unwrap();
    session.set(bob.id(), "name", "Bob Jones").unwrap();
    session
        .set_relation(bob.id(), "employer", &[institute.id().clone()])
        .unwrap();

    let charlie = session.create("Person").unwrap();
    session.set(charlie.id(), "name", "Charlie Brown").unwrap();
    session
        .set_relation(charlie.id(), "employer", &[meridian.id().clone()])
        .unwrap();

    let pub1 = session.create("Publication").unwrap();
    session
        .set(pub1.id(), "title", "Entity Graphs in Embedded Stores")
        .unwrap();
    session
        .set_relation(
            pub1.id(),
            "authors",
            &[alice.id().clone(), bob.id().clone()],
        )
        .unwrap();
    session
        .set_relation(pub1.id(), "topics", &[knowledge_graphs.id().clone()])
        .unwrap();

    let pub2 = session.create("Publication").unwrap();
    session
        .set(pub2.id(), "title", "A Survey of Semantic Web Technologies")
        .unwrap();
    session
        .set_relation(pub2.id(), "authors", &[alice.id().clone()])
        .unwrap();
    session
        .set_relation(pub2.id(), "topics", &[semantic_web.id().clone()])
        .unwrap();

    let pub3 = session.create("Publication").unwrap();
    session
        .set(pub3.id(), "title", "Triple Stores Under Optimistic Concurrency")
        .unwrap();
    session
        .set_relation(
            pub3.id(),
            "authors",
            &[bob.id().clone(), charlie.id().clone()],
        )
        .unwrap();
    session
        .set_relation(pub3.id(), "topics", &[rdf_databases.id().clone()])
        .unwrap();
    session
        .set_relation(pub3.id(), "references", &[pub1.id().clone()])
        .unwrap();

    session.commit().unwrap();

    Sample {
        knowledge_graphs: knowledge_graphs.id().clone(),
        semantic_web: semantic_web.id().clone(),
        rdf_databases: rdf_databases.id().clone(),
        meridian: meridian.id().clone(),
        institute: institute.id().clone(),
        alice: alice.id().clone(),
        bob: bob.id().clone(),
        charlie: charlie.id().clone(),
        pub1: pub1.id().clone(),
        pub2: pub2.id().clone(),
        pub3: pub3.id().clone(),
    }
}
