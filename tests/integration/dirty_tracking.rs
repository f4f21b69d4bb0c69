//! Pending-change tracking: added, changed, and the two kinds of save

use memrepo::builder::{node, repository};
use memrepo::{ItemHandle, Repository};

#[test]
fn test_set_property_marks_node_modified_until_save() {
    let session = repository().node(node("/a")).build().unwrap().login();
    let a = session.get_node("/a").unwrap();

    a.set_property("p", "v").unwrap();
    assert!(a.is_modified());
    assert!(session.has_pending_changes());

    session.save().unwrap();
    assert!(!a.is_modified());
}

#[test]
fn test_save_is_idempotent() {
    let session = Repository::new().login();
    session.root_node().add_node("a").unwrap();

    session.save().unwrap();
    assert!(!session.has_pending_changes());
    session.save().unwrap();
    assert!(!session.has_pending_changes());
}

#[test]
fn test_added_then_modified_stays_added() {
    let session = Repository::new().login();
    let a = session.root_node().add_node("a").unwrap();
    a.set_property("p", 1i64).unwrap();
    a.set_property("p", 2i64).unwrap();

    assert!(a.is_new());
    assert!(!a.is_modified());
    let p = a.property("p").unwrap();
    assert!(p.is_new());
    assert!(!p.is_modified());
}

#[test]
fn test_scoped_save_leaves_other_paths_pending() {
    let session = repository()
        .node(node("/a"))
        .node(node("/b"))
        .build()
        .unwrap()
        .login();
    let a = session.get_node("/a").unwrap();
    let b = session.get_node("/b").unwrap();
    let child = a.add_node("child").unwrap();
    b.set_property("p", true).unwrap();

    a.save().unwrap();
    assert!(!child.is_new());
    assert!(!a.is_modified());
    assert!(b.is_modified());
    assert!(session.has_pending_changes());
}

#[test]
fn test_removal_clears_pending_entries() {
    let session = Repository::new().login();
    let a = session.root_node().add_node("a").unwrap();
    a.add_node("b").unwrap();
    session.save().unwrap();

    let c = session.get_node("/a/b").unwrap().add_node("c").unwrap();
    assert!(c.is_new());
    session.remove_item("/a/b").unwrap();

    assert!(!c.is_new());
    assert!(a.is_modified());
    assert!(session.verify_index().is_ok());
}

#[test]
fn test_builder_leaves_nothing_pending() {
    let session = repository()
        .node(node("/a").property("p", "v").child(node("/a/b")))
        .build()
        .unwrap()
        .login();
    assert!(!session.has_pending_changes());
    assert!(!session.get_node("/a/b").unwrap().is_new());
}
