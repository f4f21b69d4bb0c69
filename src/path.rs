//! Path utilities for slash-delimited repository paths
//!
//! All functions are pure and total: an empty string is a valid (relative,
//! segment-less) input everywhere. Absolute paths start with `/`; the root is
//! exactly `/`.

use unicode_normalization::UnicodeNormalization;

/// Path separator
pub const SEPARATOR: char = '/';

/// The root path
pub const ROOT: &str = "/";

/// Returns the first segment of the path, ignoring a leading separator.
pub fn head(path: &str) -> &str {
    let path = strip_root(path);
    match path.find(SEPARATOR) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Returns everything after the first segment, or `""` if there is only one.
pub fn tail(path: &str) -> &str {
    let path = strip_root(path);
    match path.find(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => "",
    }
}

/// Returns the path with its final segment removed.
///
/// A leading separator is preserved for absolute, non-root paths, so
/// `parent("/a") == "/"`. The root has parent `""`; the empty path, which
/// stands in for a missing path, has parent `"/"`.
/// A single trailing separator is ignored.
pub fn parent(path: &str) -> String {
    if is_root(path) {
        return String::new();
    }
    if path.is_empty() {
        return ROOT.to_string();
    }
    let path = strip_trailing_separator(path);
    let prefix = if is_absolute(path) { ROOT } else { "" };
    let rest = strip_root(path);
    match rest.rfind(SEPARATOR) {
        Some(idx) => format!("{}{}", prefix, &rest[..idx]),
        None => prefix.to_string(),
    }
}

/// Returns the final segment of the path, or the path itself if it has no separator.
///
/// A single trailing separator is ignored; `basename("/") == ""`.
pub fn basename(path: &str) -> &str {
    let path = strip_trailing_separator(path);
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Number of non-empty segments; `0` for the root and the empty path.
pub fn depth(path: &str) -> usize {
    segments(path).count()
}

/// Iterate the non-empty segments of a path.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// True when `ancestor` is a strict ancestor of `path`.
///
/// Segment-aware: `/ab` is not an ancestor of `/abc`.
pub fn is_ancestor(ancestor: &str, path: &str) -> bool {
    is_self_or_ancestor(ancestor, path)
        && strip_trailing_separator(ancestor) != strip_trailing_separator(path)
}

/// True when `ancestor` equals `path` or is an ancestor of it.
///
/// An empty `ancestor` only matches an empty `path`. The root matches every
/// absolute path. A trailing separator on either side is ignored.
pub fn is_self_or_ancestor(ancestor: &str, path: &str) -> bool {
    if ancestor.is_empty() {
        return path.is_empty();
    }
    let ancestor = strip_trailing_separator(ancestor);
    let path = strip_trailing_separator(path);
    if ancestor == path {
        return true;
    }
    if is_root(ancestor) {
        return is_absolute(path);
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(SEPARATOR)
}

/// Resolve `relative` against `base`.
///
/// Absolute `relative` paths are returned unchanged. An empty or root base is
/// concatenated directly; any other base is joined with one separator.
pub fn resolve(base: &str, relative: &str) -> String {
    if is_absolute(relative) {
        relative.to_string()
    } else if base.is_empty() || is_root(base) {
        format!("{}{}", base, relative)
    } else {
        format!("{}{}{}", base, SEPARATOR, relative)
    }
}

/// Remove exactly one trailing separator, unless the path is the root.
pub fn strip_trailing_separator(path: &str) -> &str {
    if !is_root(path) && path.ends_with(SEPARATOR) {
        &path[..path.len() - 1]
    } else {
        path
    }
}

/// Rewrite the `src` prefix of `path` to `dest`.
///
/// Returns `None` when `src` is not `path` itself or one of its ancestors.
pub fn rebase(path: &str, src: &str, dest: &str) -> Option<String> {
    if !is_self_or_ancestor(src, path) {
        return None;
    }
    let src = strip_trailing_separator(src);
    let suffix = &path[src.len()..];
    if is_root(src) {
        // every absolute path is under the root; keep the separator
        return Some(resolve(dest, suffix));
    }
    Some(format!("{}{}", strip_trailing_separator(dest), suffix))
}

/// Normalize a path string for use as a store key
///
/// Normalizes Unicode to NFC and removes one trailing separator (except root).
pub fn normalize(path: &str) -> String {
    let normalized: String = path.nfc().collect();
    strip_trailing_separator(&normalized).to_string()
}

fn strip_root(path: &str) -> &str {
    path.strip_prefix(SEPARATOR).unwrap_or(path)
}
