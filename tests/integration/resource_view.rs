//! Resource view: lookups, writes and commits through a resolver

use memrepo::builder::{node, repository, resource};
use memrepo::query::{query, query_manager, result, XPATH};
use memrepo::resource::RESOURCE_TYPE;
use memrepo::{ItemHandle, PropertyValue, RepositoryError, ResourceResolver, ResourceView};

fn site() -> ResourceResolver {
    repository()
        .node(
            node("/content")
                .property(RESOURCE_TYPE, "site/root")
                .child(node("/content/home").property("title", "Home"))
                .child(node("/content/about")),
        )
        .build()
        .unwrap()
        .resource_resolver()
}

#[test]
fn test_relative_lookup() {
    let resolver = site();
    let content = resolver.get_resource("/content").unwrap();

    let home = resolver.get_resource_from(Some(&content), "home").unwrap();
    assert_eq!(home.path(), "/content/home");
    let absolute = resolver.get_resource_from(Some(&home), "/content/about").unwrap();
    assert_eq!(absolute.name(), "about");
    assert_eq!(
        resolver.get_resource_from(None, "content").unwrap().path(),
        "/content"
    );
    assert!(resolver.get_resource_from(Some(&content), "nope").is_none());
    assert_eq!(home.parent().unwrap().path(), "/content");
    assert!(resolver.get_resource("/").unwrap().parent().is_none());
}

#[test]
fn test_create_commit_and_changes() {
    let resolver = site();
    let content = resolver.get_resource("/content").unwrap();
    assert!(!resolver.has_changes());

    let news = resolver
        .create(
            &content,
            "news",
            vec![
                ("title", PropertyValue::from("News")),
                ("tags", PropertyValue::from(["a", "b"])),
            ],
        )
        .unwrap();
    assert_eq!(news.path(), "/content/news");
    assert!(resolver.has_changes());
    assert!(resolver.session().node_exists("/content/news"));

    let map = news.value_map().unwrap();
    assert_eq!(map.get_string("title").unwrap(), "News");
    assert_eq!(map.get_strings("tags").unwrap(), vec!["a", "b"]);

    resolver.commit().unwrap();
    assert!(!resolver.has_changes());

    // creating again returns the existing node untouched
    let again = resolver
        .create(&content, "news", vec![("title", "Other")])
        .unwrap();
    assert!(again.item().is_same(news.item()));
    assert_eq!(again.value_map().unwrap().get_string("title").unwrap(), "News");
    assert!(!resolver.has_changes());
}

#[test]
fn test_create_under_property_fails() {
    let resolver = site();
    let title = resolver.get_resource("/content/home/title").unwrap();
    let empty: Vec<(&str, &str)> = Vec::new();
    assert!(matches!(
        resolver.create(&title, "child", empty),
        Err(RepositoryError::TypeMismatch(_))
    ));
}

#[test]
fn test_delete_removes_subtree() {
    let resolver = site();
    let content = resolver.get_resource("/content").unwrap();
    let home = content.child("home").unwrap();

    resolver.delete(&home).unwrap();
    assert!(resolver.get_resource("/content/home").is_none());
    assert!(resolver.get_resource("/content/home/title").is_none());
    assert!(resolver.has_changes());

    let names: Vec<String> = content.children().map(|r| r.name()).collect();
    assert_eq!(names, vec!["about"]);

    // a stale resource does not delete whatever now lives at its path
    resolver
        .create(&content, "home", Vec::<(&str, &str)>::new())
        .unwrap();
    assert!(matches!(
        resolver.delete(&home),
        Err(RepositoryError::ItemNotFound(_))
    ));
    assert!(resolver.session().node_exists("/content/home"));
}

#[test]
fn test_resource_types_and_views() {
    let resolver = site();
    let home = resolver.get_resource("/content/home").unwrap();
    assert_eq!(resolver.parent_resource_type(&home).unwrap(), "site/root");

    let title = home.child("title").unwrap();
    assert!(resolver.is_resource_type(&title, "nt:unstructured/title"));
    match title.view().unwrap() {
        ResourceView::Property(value) => assert_eq!(value, PropertyValue::from("Home")),
        ResourceView::Node(_) => panic!("expected a property view"),
    }
}

#[test]
fn test_find_resources_uses_seeded_queries() {
    let resolver = site();
    let home = resolver.session().get_node("/content/home").unwrap();
    query_manager(resolver.session())
        .query(query("//home", XPATH, result([home])))
        .build();

    let found: Vec<String> = resolver
        .find_resources("//home", XPATH)
        .map(|r| r.path())
        .collect();
    assert_eq!(found, vec!["/content/home"]);
    assert_eq!(resolver.find_resources("//other", XPATH).size(), 0);
}

#[test]
fn test_resource_builder_in_existing_resolver() {
    let resolver = site();
    let built = resource(node("/extra").property("n", 1i64))
        .build_in(&resolver)
        .unwrap();
    assert_eq!(built.path(), "/extra");
    assert!(resolver.get_resource("/extra/n").is_some());
    assert_eq!(built.value_map().unwrap().get_long("n").unwrap(), 1);
}
