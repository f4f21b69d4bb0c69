//! Item store operations through the public session API

use memrepo::builder::{node, repository};
use memrepo::{ItemHandle, Repository, RepositoryError, Session, Value};

fn tree() -> Session {
    repository()
        .node(node("/a").child(node("/a/b").child(node("/a/b/c").property("p", "v"))))
        .node(node("/x"))
        .build()
        .unwrap()
        .login()
}

#[test]
fn test_add_nodes_and_enumerate_children() {
    let session = Repository::new().login();
    let a = session.root_node().add_node_with_type("a", "x").unwrap();
    a.add_node_with_type("b", "y").unwrap();

    assert!(session.node_exists("/a/b"));
    let children: Vec<_> = session.get_node("/a").unwrap().nodes().unwrap().collect();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name(), "b");
    assert!(children[0].is_node_type("y"));
}

#[test]
fn test_move_subtree() {
    let session = tree();
    let c = session.get_node("/a/b/c").unwrap();

    session.move_item("/a/b", "/x/b").unwrap();

    assert!(!session.node_exists("/a/b"));
    assert!(session.node_exists("/x/b/c"));
    assert!(session.property_exists("/x/b/c/p"));
    assert_eq!(c.path(), "/x/b/c");
    assert_eq!(c.property("p").unwrap().path(), "/x/b/c/p");
    assert!(session.get_node("/a").unwrap().is_modified());
    assert!(session.get_node("/x").unwrap().is_modified());
    assert!(session.verify_index().is_ok());
}

#[test]
fn test_move_requires_existing_parents() {
    let session = tree();
    assert!(matches!(
        session.move_item("/a/b", "/missing/b"),
        Err(RepositoryError::PathNotFound(_))
    ));
    assert!(matches!(
        session.move_item("/nope/b", "/x/b"),
        Err(RepositoryError::PathNotFound(_))
    ));
    assert!(session.node_exists("/a/b/c"));
}

#[test]
fn test_move_onto_occupied_path_fails() {
    let session = tree();
    assert!(matches!(
        session.move_item("/a/b", "/x"),
        Err(RepositoryError::AlreadyExists(_))
    ));
    assert!(session.node_exists("/a/b"));
    assert!(!session.has_pending_changes());
}

#[test]
fn test_move_does_not_touch_sibling_with_shared_prefix() {
    let session = repository()
        .node(node("/a").child(node("/a/b")).child(node("/a/bc")))
        .node(node("/x"))
        .build()
        .unwrap()
        .login();

    session.move_item("/a/b", "/x/b").unwrap();
    assert!(session.node_exists("/a/bc"));
    assert!(session.node_exists("/x/b"));
}

#[test]
fn test_move_into_own_subtree_fails() {
    let session = tree();
    assert!(matches!(
        session.move_item("/a", "/a/b/c/a"),
        Err(RepositoryError::InvalidPath(_))
    ));
    assert!(matches!(
        session.move_item("/", "/x/root"),
        Err(RepositoryError::InvalidPath(_))
    ));
}

#[test]
fn test_remove_subtree() {
    let session = tree();
    let c = session.get_node("/a/b/c").unwrap();

    session.remove_item("/a/b").unwrap();

    for path in ["/a/b", "/a/b/c", "/a/b/c/p"] {
        assert!(!session.item_exists(path), "{} should be gone", path);
    }
    assert!(session.node_exists("/a"));
    assert!(session.get_node("/a").unwrap().is_modified());
    assert!(!c.is_live());
    assert!(session.verify_index().is_ok());
}

#[test]
fn test_remove_root_and_missing() {
    let session = tree();
    assert!(matches!(
        session.root_node().remove(),
        Err(RepositoryError::ItemNotFound(_))
    ));
    assert!(matches!(
        session.remove_item("/missing"),
        Err(RepositoryError::PathNotFound(_))
    ));
}

#[test]
fn test_lookup_type_mismatch() {
    let session = tree();
    assert!(matches!(
        session.get_property("/a"),
        Err(RepositoryError::TypeMismatch(_))
    ));
    assert!(matches!(
        session.get_node("/a/b/c/p"),
        Err(RepositoryError::TypeMismatch(_))
    ));
    assert!(!session.node_exists("/a/b/c/p"));
    assert!(!session.property_exists("/a/b"));
}

#[test]
fn test_mismatch_is_distinct_from_absence() {
    let session = tree();
    let mismatch = session.get_node("/a/b/c/p").unwrap_err();
    let missing = session.get_node("/a/b/c/nope").unwrap_err();
    assert!(matches!(mismatch, RepositoryError::TypeMismatch(_)));
    assert!(matches!(missing, RepositoryError::PathNotFound(_)));
    assert!(matches!(
        session.get_property("/a/b/c/nope"),
        Err(RepositoryError::PathNotFound(_))
    ));
}

#[test]
fn test_multi_valued_property() {
    let session = tree();
    let a = session.get_node("/a").unwrap();
    a.set_property("tags", vec!["x", "y"]).unwrap();

    let tags = session.get_property("/a/tags").unwrap();
    assert_eq!(tags.values().unwrap().len(), 2);
    assert!(matches!(
        tags.get_string(),
        Err(RepositoryError::ValueFormat(_))
    ));
    assert_eq!(tags.values().unwrap()[1], Value::from("y"));
}

#[test]
fn test_iterators_are_snapshots() {
    let session = tree();
    let a = session.get_node("/a").unwrap();
    let mut nodes = a.nodes().unwrap();
    a.add_node("late").unwrap();

    assert_eq!(nodes.size(), 1);
    assert_eq!(nodes.next().unwrap().name(), "b");
    assert!(nodes.next().is_none());
    assert_eq!(a.nodes().unwrap().size(), 2);
}

#[test]
fn test_children_are_in_insertion_order() {
    let session = repository()
        .node(
            node("/list")
                .child(node("/list/z"))
                .child(node("/list/a"))
                .child(node("/list/m")),
        )
        .build()
        .unwrap()
        .login();
    let names: Vec<String> = session
        .get_node("/list")
        .unwrap()
        .nodes()
        .unwrap()
        .map(|n| n.name())
        .collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

#[test]
fn test_stale_handle_after_recreation() {
    let session = tree();
    let old = session.get_node("/x").unwrap();
    session.remove_item("/x").unwrap();
    let new = session.root_node().add_node("x").unwrap();

    assert!(!old.is_live());
    assert!(new.is_live());
    assert!(!old.is_same(&new));
    assert_eq!(old.path(), new.path());
}

#[test]
fn test_workspace_copy_and_move() {
    let session = tree();
    let workspace = session.workspace();

    workspace.copy("/a", "/x/a").unwrap();
    assert!(session.property_exists("/a/b/c/p"));
    assert!(session.property_exists("/x/a/b/c/p"));

    workspace.move_item("/x/a", "/moved").unwrap();
    assert!(session.node_exists("/moved/b/c"));
    assert!(!session.get_node("/moved").unwrap().is_new());
    assert!(session.verify_index().is_ok());
}
