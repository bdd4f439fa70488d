//! Key-to-object-name mapping.
//!
//! Object names are `<root>/<key>` with the root path normalized (no leading
//! slash, no slash runs) and the two parts joined by exactly one slash. For a
//! fixed root the mapping is 1:1; recovering the key from an object name is
//! a prefix strip.

use crate::error::{DatastoreError, Result};
use crate::keys::Key;

/// Normalize a store-relative root path.
///
/// The backing store has no absolute-path concept, so leading slashes are
/// stripped; slash runs collapse and a trailing slash is dropped.
pub fn normalize_root(root: &str) -> String {
    root.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Map a key to its object name under `root`.
///
/// Pure string transform; malformed key content passes through to the
/// backing store unchanged.
pub fn object_name(root: &str, key: &Key) -> String {
    let root = normalize_root(root);
    let rel = key.as_str().trim_start_matches('/');
    if root.is_empty() {
        rel.to_string()
    } else if rel.is_empty() {
        root
    } else {
        format!("{root}/{rel}")
    }
}

/// Join a root and an already-canonical key prefix into an object-name
/// prefix for listing.
pub(crate) fn object_prefix(root: &str, key_prefix: &str) -> String {
    let root = normalize_root(root);
    let rel = key_prefix.trim_start_matches('/');
    if root.is_empty() {
        rel.to_string()
    } else if rel.is_empty() {
        root
    } else {
        format!("{root}/{rel}")
    }
}

/// Recover the abstract key from an object name returned by the store.
///
/// Returns a protocol violation if the name is shorter than the root path
/// or does not sit under it.
pub fn key_from_object_name(root: &str, name: &str) -> Result<Key> {
    let root = normalize_root(root);
    if root.is_empty() {
        return Ok(Key::new(name));
    }
    if name == root {
        return Ok(Key::new("/"));
    }
    if name.len() < root.len() {
        return Err(DatastoreError::ProtocolViolation {
            detail: format!("listed object name '{name}' is shorter than root path '{root}'"),
        });
    }
    match name.strip_prefix(&format!("{root}/")) {
        Some(rest) => Ok(Key::new(rest)),
        None => Err(DatastoreError::ProtocolViolation {
            detail: format!("listed object name '{name}' is outside root path '{root}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("/blocks"), "blocks");
        assert_eq!(normalize_root("blocks/"), "blocks");
        assert_eq!(normalize_root("//a//b//"), "a/b");
        assert_eq!(normalize_root(""), "");
        assert_eq!(normalize_root("/"), "");
    }

    #[test]
    fn test_object_name_single_join_slash() {
        let key = Key::new("/a/b");
        assert_eq!(object_name("blocks", &key), "blocks/a/b");
        assert_eq!(object_name("/blocks/", &key), "blocks/a/b");
        assert_eq!(object_name("", &key), "a/b");
    }

    #[test]
    fn test_round_trip() {
        for root in ["blocks", "/deep/root/", ""] {
            for raw in ["/a", "/a/b/c", "/x-1/y_2"] {
                let key = Key::new(raw);
                let name = object_name(root, &key);
                let recovered = key_from_object_name(root, &name).unwrap();
                assert_eq!(recovered, key, "root={root:?} raw={raw:?}");
            }
        }
    }

    #[test]
    fn test_short_name_is_protocol_violation() {
        let err = key_from_object_name("blocks", "blk").unwrap_err();
        assert!(matches!(err, DatastoreError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_foreign_name_is_protocol_violation() {
        let err = key_from_object_name("blocks", "elsewhere/a").unwrap_err();
        assert!(matches!(err, DatastoreError::ProtocolViolation { .. }));
    }
}
