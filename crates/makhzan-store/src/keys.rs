//! Abstract datastore keys.
//!
//! A key is a slash-delimited, case-sensitive path-like identifier. Keys have
//! a canonical string form: exactly one leading `/`, no empty segments, no
//! trailing slash. Beyond string prefix relationships keys carry no sense of
//! directory versus leaf.
//!
//! No escaping is performed. Callers are responsible for key content being
//! safe as a literal object name; the backing store may reject names it
//! considers malformed.

use std::fmt;

/// Canonical slash-delimited key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    /// Create a key from any slash-delimited string.
    ///
    /// Runs of slashes collapse to one, a leading slash is added if missing,
    /// and a trailing slash is dropped. The empty string becomes the root
    /// key `/`.
    pub fn new(input: impl AsRef<str>) -> Self {
        let input = input.as_ref();
        let mut canonical = String::with_capacity(input.len() + 1);
        canonical.push('/');
        for segment in input.split('/').filter(|s| !s.is_empty()) {
            if canonical.len() > 1 {
                canonical.push('/');
            }
            canonical.push_str(segment);
        }
        Key(canonical)
    }

    /// Canonical string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning its canonical string form.
    pub fn into_string(self) -> String {
        self.0
    }

    /// True for the root key `/`.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::new(s)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_form() {
        assert_eq!(Key::new("/a/b").as_str(), "/a/b");
        assert_eq!(Key::new("a/b").as_str(), "/a/b");
        assert_eq!(Key::new("//a///b/").as_str(), "/a/b");
        assert_eq!(Key::new("").as_str(), "/");
        assert_eq!(Key::new("/").as_str(), "/");
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(Key::new("/A"), Key::new("/a"));
    }

    #[test]
    fn test_ordering_follows_string_form() {
        let mut keys = vec![Key::new("/b"), Key::new("/a/c"), Key::new("/a")];
        keys.sort();
        let ordered: Vec<&str> = keys.iter().map(Key::as_str).collect();
        assert_eq!(ordered, vec!["/a", "/a/c", "/b"]);
    }
}
