//! The document store backing the application.
//!
//! Records live in named collections keyed by a per-document identifier.
//! Services receive collection handles as trait objects so the backing
//! implementation can be swapped without touching call sites.

pub mod json;
pub mod memory;

use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// A record that can be persisted in a named collection.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The type identifying the document within its collection.
    type Key: Clone + Display + PartialEq + Send + Sync;

    /// The name of the collection the document belongs to.
    const COLLECTION: &'static str;

    fn key(&self) -> Self::Key;
}

/// Operations supported by every collection in the store.
#[async_trait]
pub trait Collection<D: Document> {
    /// Fetch every document in the collection.
    async fn list_all(&self) -> anyhow::Result<Vec<D>>;

    /// Fetch a single document by its key.
    async fn get(&self, key: &D::Key) -> anyhow::Result<Option<D>>;

    /// Persist a new document and return the stored copy.
    async fn insert(&self, document: &D) -> anyhow::Result<D>;

    /// Replace the document stored under `key` and return the stored copy.
    ///
    /// Fails if no document with that key exists. Callers are expected to
    /// resolve the document first.
    async fn replace(&self, key: &D::Key, document: &D) -> anyhow::Result<D>;

    /// Delete the document stored under `key`, returning its prior state if
    /// it existed.
    async fn remove(&self, key: &D::Key) -> anyhow::Result<Option<D>>;
}

pub type DynCollection<D> = Arc<dyn Collection<D> + Send + Sync>;
