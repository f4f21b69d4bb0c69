//! Builder DSL: declarative trees materialized into fresh repositories

use memrepo::builder::{node, property, repository, typed_node, ItemBuilder};
use memrepo::item::{NT_FILE, NT_FOLDER, NT_UNSTRUCTURED};
use memrepo::{ItemHandle, RepositoryError, ValueType};

#[test]
fn test_builder_round_trip() {
    let repository = repository()
        .node(node("/a").property("t", "hello").child(node("/a/b")))
        .build()
        .unwrap();
    let session = repository.login();

    let a = session.get_node("/a").unwrap();
    let t = a.property("t").unwrap();
    assert_eq!(t.value_type().unwrap(), ValueType::String);
    assert_eq!(t.get_string().unwrap(), "hello");

    let children: Vec<String> = a.nodes().unwrap().map(|n| n.name()).collect();
    assert_eq!(children, vec!["b"]);
}

#[test]
fn test_children_built_in_declaration_order() {
    let repository = repository()
        .node(
            node("/a")
                .property("first", 1i64)
                .child(node("/a/n2"))
                .property("second", 2i64)
                .child(node("/a/n1")),
        )
        .build()
        .unwrap();
    let a = repository.login().get_node("/a").unwrap();

    let props: Vec<String> = a.properties().unwrap().map(|p| p.name()).collect();
    assert_eq!(props, vec!["jcr:primaryType", "first", "second"]);
    let nodes: Vec<String> = a.nodes().unwrap().map(|n| n.name()).collect();
    assert_eq!(nodes, vec!["n2", "n1"]);
}

#[test]
fn test_typed_nodes() {
    let repository = repository()
        .node(
            typed_node("/content", NT_FOLDER)
                .child(typed_node("/content/file.txt", NT_FILE))
                .child(node("/content/plain")),
        )
        .build()
        .unwrap();
    let session = repository.login();

    assert!(session.get_node("/content").unwrap().is_node_type(NT_FOLDER));
    assert!(session
        .get_node("/content/file.txt")
        .unwrap()
        .is_node_type(NT_FILE));
    assert!(session
        .get_node("/content/plain")
        .unwrap()
        .is_node_type(NT_UNSTRUCTURED));
}

#[test]
fn test_single_element_array_forces_multi_value() {
    let repository = repository()
        .node(
            node("/a")
                .with(property("one", ["x"]))
                .with(property("list", vec![1i64, 2, 3]))
                .with(property("scalar", "x")),
        )
        .build()
        .unwrap();
    let session = repository.login();

    assert!(session.get_property("/a/one").unwrap().is_multiple().unwrap());
    assert_eq!(
        session.get_property("/a/list").unwrap().values().unwrap().len(),
        3
    );
    assert!(!session
        .get_property("/a/scalar")
        .unwrap()
        .is_multiple()
        .unwrap());
}

#[test]
fn test_deep_nesting() {
    let mut deepest = node("/l0/l1/l2/l3/l4").property("depth", 5i64);
    for level in (1..5).rev() {
        let path = (0..level)
            .map(|i| format!("/l{}", i))
            .collect::<String>();
        deepest = node(&path).child(deepest);
    }
    let repository = repository().node(deepest).build().unwrap();
    let session = repository.login();

    let leaf = session.get_node("/l0/l1/l2/l3/l4").unwrap();
    assert_eq!(leaf.depth(), 5);
    assert_eq!(leaf.property("depth").unwrap().get_long().unwrap(), 5);
    assert_eq!(leaf.ancestor(2).unwrap().path(), "/l0/l1");
}

#[test]
fn test_builder_error_surfaces() {
    let result = repository()
        .node(node("/a").child(node("/a/b")).child(node("/a/b")))
        .build();
    assert!(matches!(result, Err(RepositoryError::AlreadyExists(_))));
}

#[test]
fn test_builders_are_reusable() {
    let template = node("/a").property("p", "v");
    let first = repository().node(template.clone()).build().unwrap();
    let second = repository().node(template).build().unwrap();
    assert!(!first.login().same_session(&second.login()));
    assert!(second.login().property_exists("/a/p"));
}

#[test]
fn test_item_builder_conversions() {
    let items: Vec<ItemBuilder> = vec![node("/n/c").into(), property("p", 1.5).into()];
    let built = node("/n").with_all(items).build(None).unwrap();
    assert!(built.has_node("c"));
    assert_eq!(built.property("p").unwrap().get_double().unwrap(), 1.5);
}
