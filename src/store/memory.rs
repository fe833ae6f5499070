//! An in-memory collection used for tests and ephemeral runs.

use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collection, Document};

/// A collection holding its documents in process memory. Contents are lost
/// when the process exits.
#[derive(Default)]
pub struct MemoryCollection<D> {
    documents: RwLock<Vec<D>>,
}

impl<D: Document> MemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<D: Document> Collection<D> for MemoryCollection<D> {
    async fn list_all(&self) -> anyhow::Result<Vec<D>> {
        Ok(self.documents.read().await.clone())
    }

    async fn get(&self, key: &D::Key) -> anyhow::Result<Option<D>> {
        let documents = self.documents.read().await;

        Ok(documents.iter().find(|d| d.key() == *key).cloned())
    }

    async fn insert(&self, document: &D) -> anyhow::Result<D> {
        let mut documents = self.documents.write().await;
        documents.push(document.clone());

        Ok(document.clone())
    }

    async fn replace(&self, key: &D::Key, document: &D) -> anyhow::Result<D> {
        let mut documents = self.documents.write().await;

        match documents.iter().position(|d| d.key() == *key) {
            Some(index) => {
                documents[index] = document.clone();

                Ok(document.clone())
            }
            None => bail!("no document with key {} in {:?}", key, D::COLLECTION),
        }
    }

    async fn remove(&self, key: &D::Key) -> anyhow::Result<Option<D>> {
        let mut documents = self.documents.write().await;

        match documents.iter().position(|d| d.key() == *key) {
            Some(index) => Ok(Some(documents.remove(index))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    struct Note {
        id: i64,
        body: String,
    }

    impl Document for Note {
        type Key = i64;

        const COLLECTION: &'static str = "notes";

        fn key(&self) -> i64 {
            self.id
        }
    }

    fn note(id: i64, body: &str) -> Note {
        Note {
            id,
            body: body.to_owned(),
        }
    }

    #[tokio::test]
    async fn insert_then_get() -> anyhow::Result<()> {
        let collection = MemoryCollection::new();

        collection.insert(&note(1, "first")).await?;

        assert_eq!(Some(note(1, "first")), collection.get(&1).await?);
        assert_eq!(None, collection.get(&2).await?);

        Ok(())
    }

    #[tokio::test]
    async fn replace_swaps_the_stored_document() -> anyhow::Result<()> {
        let collection = MemoryCollection::new();
        collection.insert(&note(1, "first")).await?;

        collection.replace(&1, &note(1, "edited")).await?;

        assert_eq!(Some(note(1, "edited")), collection.get(&1).await?);
        assert_eq!(1, collection.list_all().await?.len());

        Ok(())
    }

    #[tokio::test]
    async fn replace_missing_key_fails() {
        let collection = MemoryCollection::new();

        let result = collection.replace(&1, &note(1, "orphan")).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn remove_returns_prior_state() -> anyhow::Result<()> {
        let collection = MemoryCollection::new();
        collection.insert(&note(1, "first")).await?;

        assert_eq!(Some(note(1, "first")), collection.remove(&1).await?);
        assert_eq!(None, collection.remove(&1).await?);
        assert!(collection.list_all().await?.is_empty());

        Ok(())
    }
}
