//! Prefix-scoped key and entry enumeration.
//!
//! Enumeration is a lazy sequence driven by an explicit cursor loop: one
//! page is fetched at a time, the continuation marker comes from the page
//! (falling back to the last name observed when the backend omits it), and
//! a caller-supplied cancellation token is checked once per page fetch.
//! Each call produces a fresh, restartable sequence; nothing is cached.
//!
//! An empty page ends enumeration as a valid empty result -- "the prefix
//! matched nothing" is an ordinary outcome, not an error.

use std::sync::Arc;

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt, TryStreamExt};
use makhzan_client::ListRequest;
use tokio_util::sync::CancellationToken;

use crate::datastore::ObjectDatastore;
use crate::error::{DatastoreError, Result};
use crate::keys::Key;
use crate::paths::{key_from_object_name, normalize_root, object_prefix};

/// Number of objects requested per listing page.
pub const QUERY_PAGE_SIZE: usize = 100;

/// A key/value pair produced by entry enumeration.
#[derive(Debug, Clone)]
pub struct Entry {
    pub key: Key,
    pub value: Bytes,
}

/// Parameters for a key or entry query.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Only keys whose string form starts with exactly this prefix are
    /// returned. The backing store's own prefix matching can be coarser
    /// than required, so the filter is applied to the recovered keys too.
    pub prefix: Option<String>,
}

impl Query {
    /// Query matching every key in the datastore.
    pub fn all() -> Self {
        Self::default()
    }

    /// Query scoped to a key prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

/// Canonicalize a query prefix, preserving a trailing slash so `/a/` keeps
/// meaning "children of /a" rather than "/a itself and its children".
fn normalize_prefix(prefix: &str) -> String {
    let key = Key::new(prefix);
    if prefix.ends_with('/') && !key.is_root() {
        format!("{}/", key.as_str())
    } else {
        key.into_string()
    }
}

#[derive(Debug, Default)]
struct PageCursor {
    marker: Option<String>,
    done: bool,
}

impl ObjectDatastore {
    /// Enumerate keys matching `query`, page by page.
    ///
    /// The sequence stops yielding without error once `cancel` is
    /// triggered; an in-flight page fetch is not interrupted.
    pub fn query_keys(
        &self,
        query: Query,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Result<Key>> + Send {
        let client = Arc::clone(self.client());
        let root = self.root().to_string();

        let key_prefix = query
            .prefix
            .as_deref()
            .map(normalize_prefix)
            .filter(|p| p.as_str() != "/");
        let scan_prefix = match &key_prefix {
            Some(prefix) => object_prefix(&root, prefix),
            None => {
                let base = normalize_root(&root);
                if base.is_empty() {
                    String::new()
                } else {
                    format!("{base}/")
                }
            }
        };

        stream::try_unfold(PageCursor::default(), move |mut cursor| {
            let client = Arc::clone(&client);
            let root = root.clone();
            let key_prefix = key_prefix.clone();
            let scan_prefix = scan_prefix.clone();
            let cancel = cancel.clone();
            async move {
                if cursor.done || cancel.is_cancelled() {
                    return Ok(None);
                }

                let page = client
                    .list(ListRequest {
                        prefix: scan_prefix.clone(),
                        max_keys: QUERY_PAGE_SIZE,
                        marker: cursor.marker.take(),
                    })
                    .await
                    .map_err(|source| DatastoreError::Backend {
                        op: "list",
                        name: scan_prefix.clone(),
                        source,
                    })?;

                if page.objects.is_empty() {
                    return Ok(None);
                }

                let last_name = page.objects.last().map(|o| o.name.clone());
                let mut keys: Vec<Result<Key>> = Vec::with_capacity(page.objects.len());
                for object in &page.objects {
                    let key = key_from_object_name(&root, &object.name)?;
                    if let Some(prefix) = &key_prefix {
                        if !key.as_str().starts_with(prefix.as_str()) {
                            continue;
                        }
                    }
                    keys.push(Ok(key));
                }

                if page.is_truncated {
                    // Backends may truncate without a cursor; resume from
                    // the last name observed in that case.
                    cursor.marker = page.next_marker.or(last_name);
                } else {
                    cursor.done = true;
                }

                Ok(Some((stream::iter(keys), cursor)))
            }
        })
        .try_flatten()
    }

    /// Enumerate entries (key and value) matching `query`.
    ///
    /// Each key costs one additional `get`. A key that vanishes between the
    /// listing and its read was deleted concurrently and is skipped; every
    /// other read failure is propagated.
    pub fn query(
        &self,
        query: Query,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Result<Entry>> + Send {
        let store = self.clone();
        self.query_keys(query, cancel)
            .then(move |result| {
                let store = store.clone();
                async move {
                    match result {
                        Ok(key) => match store.get(&key).await {
                            Ok(value) => Some(Ok(Entry { key, value })),
                            Err(DatastoreError::NotFound { .. }) => None,
                            Err(err) => Some(Err(err)),
                        },
                        Err(err) => Some(Err(err)),
                    }
                }
            })
            .filter_map(|item| async move { item })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/ab"), "/ab");
        assert_eq!(normalize_prefix("ab"), "/ab");
        assert_eq!(normalize_prefix("/a/"), "/a/");
        assert_eq!(normalize_prefix("//a//b"), "/a/b");
        assert_eq!(normalize_prefix("/"), "/");
    }
}
