//! Property-based tests for the path utilities

use memrepo::path;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9:._-]{1,8}"
}

fn absolute_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..6).prop_map(|segments| format!("/{}", segments.join("/")))
}

/// Joining a path's parent and basename gives the path back
#[test]
fn test_parent_basename_resolve_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(absolute_path(), any::<bool>()), |(p, trailing)| {
            let input = if trailing { format!("{}/", p) } else { p.clone() };
            let rebuilt = path::resolve(&path::parent(&input), path::basename(&input));
            assert_eq!(rebuilt, path::strip_trailing_separator(&input));
            Ok(())
        })
        .unwrap();
}

/// Depth grows by one per segment and every parent is an ancestor
#[test]
fn test_depth_and_ancestry_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(absolute_path(), segment()), |(p, child)| {
            let joined = path::resolve(&p, &child);
            assert_eq!(path::depth(&joined), path::depth(&p) + 1);
            assert_eq!(path::parent(&joined), p);
            assert!(path::is_ancestor(&p, &joined));
            assert!(!path::is_ancestor(&joined, &p));
            assert!(path::is_ancestor(path::ROOT, &joined));
            assert!(path::is_self_or_ancestor(&p, &p));
            assert!(!path::is_ancestor(&p, &p));
            Ok(())
        })
        .unwrap();
}

/// A sibling sharing a name prefix is never an ancestor
#[test]
fn test_prefix_is_not_ancestry_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(absolute_path(), segment()), |(p, extra)| {
            let sibling = format!("{}{}", p, extra);
            assert!(!path::is_ancestor(&p, &sibling));
            assert!(!path::is_self_or_ancestor(&sibling, &p));
            Ok(())
        })
        .unwrap();
}

/// Head and tail split the first segment off
#[test]
fn test_head_tail_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&absolute_path(), |p| {
            let head = path::head(&p);
            let tail = path::tail(&p);
            if tail.is_empty() {
                assert_eq!(format!("/{}", head), p);
            } else {
                assert_eq!(format!("/{}/{}", head, tail), p);
            }
            Ok(())
        })
        .unwrap();
}

/// Rebasing moves a descendant under the new prefix, keeping its suffix
#[test]
fn test_rebase_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(absolute_path(), segment(), absolute_path()),
            |(src, child, dest)| {
                let descendant = path::resolve(&src, &child);
                let moved = path::rebase(&descendant, &src, &dest).unwrap();
                assert_eq!(moved, path::resolve(&dest, &child));
                assert_eq!(path::rebase(&src, &src, &dest).unwrap(), dest);
                Ok(())
            },
        )
        .unwrap();
}
