//! Path algebra for the coordination store's hierarchical namespace
//!
//! Paths are absolute and `/`-separated, with no trailing slash except the
//! root itself. Segments are opaque; only candidate names carry structure
//! (`{lock_name}-{digits}`).

use std::sync::LazyLock;

/// Matches the root, or one or more non-empty `/`-separated segments
static PATH_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^/$|^(/[^/]+)+$").expect("invalid path pattern"));

/// Path shape errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path must be absolute with non-empty segments: '{0}'")]
    Malformed(String),
}

/// Validate an absolute namespace path
///
/// # Examples
///
/// ```
/// use taro_common::validate_path;
///
/// assert!(validate_path("/").is_ok());
/// assert!(validate_path("/lock/work").is_ok());
/// assert!(validate_path("lock").is_err());
/// assert!(validate_path("/lock/").is_err());
/// assert!(validate_path("/lock//work").is_err());
/// ```
pub fn validate_path(path: &str) -> Result<(), PathError> {
    if PATH_PATTERN.is_match(path) {
        Ok(())
    } else {
        Err(PathError::Malformed(path.to_string()))
    }
}

/// Join a parent path and a child name
pub fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Parent of an absolute path; `None` for the root
pub fn parent(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Cumulative ancestor prefixes of `path`, shallowest first, ending with
/// `path` itself. The root is omitted; it always exists.
///
/// # Examples
///
/// ```
/// use taro_common::ancestors;
///
/// assert_eq!(ancestors("/a/b/c"), vec!["/a", "/a/b", "/a/b/c"]);
/// assert!(ancestors("/").is_empty());
/// ```
pub fn ancestors(path: &str) -> Vec<String> {
    if path == "/" {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (idx, _) in path.match_indices('/').skip(1) {
        out.push(path[..idx].to_string());
    }
    out.push(path.to_string());
    out
}

/// Parse the store-assigned sequence number from a sibling name
///
/// Returns `None` when the name does not belong to `lock_name`'s contention
/// queue: a different lock sharing the namespace root, or a non-numeric
/// suffix. Parsing is numeric, so ordering never depends on how wide the
/// store pads its counters.
pub fn sequence_suffix(name: &str, lock_name: &str) -> Option<u64> {
    let rest = name.strip_prefix(lock_name)?;
    let digits = rest.strip_prefix(crate::SEQUENCE_SEPARATOR)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
