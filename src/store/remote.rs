//! Client traits for the remote store.
//!
//! The dashboard talks to three capabilities of the hosted backend: row reads,
//! row writes and object storage. Each is its own trait so tests can mock one
//! while keeping a real implementation for the others. [`Remote`] bundles them
//! the way hooks receive them.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::store::{Condition, FileEntry, Row, Select, Selection, StoreResult, UploadOptions};

/// Row reads.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Run a select and return the matching slice (and count when requested).
    async fn select(&self, query: &Select) -> StoreResult<Selection>;
}

/// Row writes. Every method returns the affected rows.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MutationClient: Send + Sync {
    /// Insert rows into `table`.
    async fn insert(&self, table: &str, rows: Vec<Row>) -> StoreResult<Vec<Row>>;

    /// Apply `patch` to every row of `table` matching all `filter` conditions.
    async fn update(&self, table: &str, patch: Row, filter: &[Condition])
    -> StoreResult<Vec<Row>>;

    /// Delete every row of `table` matching all `filter` conditions.
    async fn delete(&self, table: &str, filter: &[Condition]) -> StoreResult<Vec<Row>>;
}

/// Object storage.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Store `bytes` at `path` and return the stored path.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> StoreResult<String>;

    /// Public URL of an object. Does not check that the object exists.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Objects directly under `prefix` (empty for the bucket root).
    async fn list(&self, bucket: &str, prefix: &str) -> StoreResult<Vec<FileEntry>>;

    /// Remove objects by path.
    async fn remove(&self, bucket: &str, paths: &[String]) -> StoreResult<()>;
}

/// The injected remote: all three capabilities behind one handle.
pub trait Remote: Send + Sync {
    fn query(&self) -> &dyn QueryClient;

    fn mutate(&self) -> &dyn MutationClient;

    fn storage(&self) -> &dyn StorageClient;
}
