//! # makhzan-client
//!
//! Object store client interface for the Makhzan datastore.
//!
//! An object store is a remote service that addresses opaque byte blobs by
//! flat string names. This crate defines the minimal capability surface the
//! datastore consumes -- put/get/head/delete plus marker-paginated listing
//! and bucket administration -- together with the error vocabulary needed to
//! tell "the key is absent" apart from "the request failed".
//!
//! ## Architecture
//!
//! - **`ObjectClient`**: the async capability trait. All backends implement
//!   the same trait; callers hold an `Arc<dyn ObjectClient>`.
//! - **`MemoryClient`**: `BTreeMap`-backed store for tests and embedding.
//! - **`RemoteClient`**: adapter over the `object_store` crate for
//!   S3-compatible endpoints, built from [`ConnectOptions`].
//!
//! Clients are shared, externally owned resources: the datastore layered on
//! top never closes or reconnects them.

pub mod error;
pub mod memory;
pub mod remote;
pub mod traits;
pub mod types;

pub use error::{ClientError, ClientResult};
pub use memory::MemoryClient;
pub use remote::{ConnectOptions, RemoteClient};
pub use traits::ObjectClient;
pub use types::{
    BucketAcl, BucketOptions, DataRedundancy, GetResponse, ListPage, ListRequest, ObjectInfo,
    StorageClass,
};
