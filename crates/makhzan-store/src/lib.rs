//! # makhzan-store
//!
//! A key-value datastore over remote object storage, plus an advisory
//! repository lock built on the same store.
//!
//! Abstract slash-delimited keys are mapped under a store-relative root path
//! to flat object names; all state lives in the backing store and nothing is
//! cached locally. The backing store offers put/get/head/delete/list and
//! nothing more, so the guarantees here are exactly what those primitives
//! allow: last write wins, no isolation, advisory locking only.
//!
//! ## Architecture
//!
//! - **Key mapper**: root-path normalization and key-to-object-name mapping
//! - **CRUD engine**: [`ObjectDatastore`] with put/get/has/delete/open/close
//!   and error remapping onto the datastore taxonomy
//! - **Key enumerator**: lazy, marker-paginated prefix queries with
//!   cooperative cancellation
//! - **Batch accumulator**: [`Batch`], a best-effort concurrent fan-out
//! - **Exclusive lock**: [`RepoLock`], a sentinel object under the
//!   repository directory
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use makhzan_client::MemoryClient;
//! use makhzan_store::{Key, ObjectDatastore};
//!
//! let client = Arc::new(MemoryClient::new("repo"));
//! let store = ObjectDatastore::new(client, "blocks", false);
//! store.open().await?;
//! store.put(&Key::new("/a/b"), Bytes::from(vec![1, 2, 3])).await?;
//! ```

pub mod batch;
pub mod config;
pub mod datastore;
pub mod error;
pub mod keys;
pub mod lock;
pub mod paths;
pub mod query;

pub use batch::Batch;
pub use config::DatastoreConfig;
pub use datastore::ObjectDatastore;
pub use error::{DatastoreError, Result};
pub use keys::Key;
pub use lock::{LockGuard, RepoLock, LOCK_FILE};
pub use query::{Entry, Query, QUERY_PAGE_SIZE};
