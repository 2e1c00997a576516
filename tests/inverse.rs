//! Inverse relations: computed views over forward edges.

mod common;

use tempfile::TempDir;
use trestle::{EntityError, StoreError};

#[test]
fn author_publications_materialize_from_authorship() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "authorship");
    let sample = common::populate(&store);

    // Alice never had "publications" set; the view is computed from the
    // publications' author edges.
    let mut session = store.session();
    let alices = session.inverse(&sample.alice, "publications").unwrap();
    assert_eq!(alices.len(), 2);
    assert!(alices.contains(&sample.pub1));
    assert!(alices.contains(&sample.pub2));

    let charlies = session.inverse(&sample.charlie, "publications").unwrap();
    assert_eq!(charlies, vec![sample.pub3.clone()]);
}

#[test]
fn employees_materialize_from_employer() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "employees");
    let sample = common::populate(&store);

    let mut session = store.session();
    let staff = session.inverse(&sample.institute, "employees").unwrap();
    assert_eq!(staff.len(), 2);
    assert!(staff.contains(&sample.alice));
    assert!(staff.contains(&sample.bob));

    let meridian_staff = session.inverse(&sample.meridian, "employees").unwrap();
    assert_eq!(meridian_staff, vec![sample.charlie.clone()]);
}

#[test]
fn citations_resolve_and_empty_means_none() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "citations");
    let sample = common::populate(&store);

    let mut session = store.session();

    // pub3 references pub1, so pub1 is cited by pub3.
    let citing = session.inverse(&sample.pub1, "cited_by").unwrap();
    assert_eq!(citing, vec![sample.pub3.clone()]);

    // An uncited publication has an empty view, not an error.
    let uncited = session.inverse(&sample.pub2, "cited_by").unwrap();
    assert!(uncited.is_empty());
}

#[test]
fn inverse_views_track_forward_updates() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "inverse-updates");
    let sample = common::populate(&store);

    let mut session = store.session();
    session
        .set_relation(&sample.pub2, "authors", &[sample.bob.clone()])
        .unwrap();
    session.commit().unwrap();

    let mut reader = store.session();
    let alices = reader.inverse(&sample.alice, "publications").unwrap();
    assert_eq!(alices, vec![sample.pub1.clone()]);
    let bobs = reader.inverse(&sample.bob, "publications").unwrap();
    assert_eq!(bobs.len(), 3);
}

#[test]
fn writing_an_inverse_relation_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = common::open_store(dir.path(), "inverse-write");
    let sample = common::populate(&store);

    let mut session = store.session();
    let result = session.set_relation(
        &sample.alice,
        "publications",
        &[sample.pub1.clone()],
    );
    assert!(matches!(
        result,
        Err(StoreError::Entity(EntityError::InverseWrite(_)))
    ));

    let result = session.set_relation(&sample.institute, "employees", &[]);
    assert!(matches!(
        result,
        Err(StoreError::Entity(EntityError::InverseWrite(_)))
    ));
}
