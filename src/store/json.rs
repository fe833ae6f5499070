//! Filesystem-backed JSON persistence.
//!
//! Each collection lives in a single JSON file holding an array of
//! documents. Writes go to a temporary file first and are renamed into
//! place so a crash mid-write never truncates the collection.

use std::{
    fs::{self, File},
    io::BufReader,
    marker::PhantomData,
    path::PathBuf,
};

use anyhow::{bail, Context};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Collection, Document};

const COLLECTION_EXTENSION: &str = "json";
const TMP_EXTENSION: &str = "tmp";

/// A directory of collection files.
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}.", data_dir))?;

        Ok(Self { data_dir })
    }

    /// Obtain a handle to the collection storing documents of type `D`.
    pub fn collection<D: Document>(&self) -> JsonCollection<D> {
        let file_name = format!("{}.{}", D::COLLECTION, COLLECTION_EXTENSION);

        JsonCollection {
            path: self.data_dir.join(file_name),
            write_lock: Mutex::new(()),
            _document: PhantomData,
        }
    }
}

/// A single collection persisted as a JSON file.
pub struct JsonCollection<D> {
    path: PathBuf,
    // Serializes read-modify-write cycles against the collection file.
    write_lock: Mutex<()>,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> JsonCollection<D> {
    fn read_documents(&self) -> anyhow::Result<Vec<D>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open collection file {:?}.", self.path))?;

        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse collection file {:?}.", self.path))
    }

    fn write_documents(&self, documents: &[D]) -> anyhow::Result<()> {
        let tmp_path = self.path.with_extension(TMP_EXTENSION);
        let contents = serde_json::to_vec_pretty(documents)
            .with_context(|| format!("Failed to serialize the {:?} collection.", D::COLLECTION))?;

        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write collection file {:?}.", tmp_path))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace collection file {:?}.", self.path))?;

        Ok(())
    }
}

#[async_trait]
impl<D: Document> Collection<D> for JsonCollection<D> {
    async fn list_all(&self) -> anyhow::Result<Vec<D>> {
        self.read_documents()
    }

    async fn get(&self, key: &D::Key) -> anyhow::Result<Option<D>> {
        let documents = self.read_documents()?;

        Ok(documents.into_iter().find(|d| d.key() == *key))
    }

    async fn insert(&self, document: &D) -> anyhow::Result<D> {
        let _guard = self.write_lock.lock().await;

        let mut documents = self.read_documents()?;
        documents.push(document.clone());
        self.write_documents(&documents)?;

        Ok(document.clone())
    }

    async fn replace(&self, key: &D::Key, document: &D) -> anyhow::Result<D> {
        let _guard = self.write_lock.lock().await;

        let mut documents = self.read_documents()?;
        match documents.iter().position(|d| d.key() == *key) {
            Some(index) => documents[index] = document.clone(),
            None => bail!("no document with key {} in {:?}", key, D::COLLECTION),
        }
        self.write_documents(&documents)?;

        Ok(document.clone())
    }

    async fn remove(&self, key: &D::Key) -> anyhow::Result<Option<D>> {
        let _guard = self.write_lock.lock().await;

        let mut documents = self.read_documents()?;
        let removed = match documents.iter().position(|d| d.key() == *key) {
            Some(index) => documents.remove(index),
            None => return Ok(None),
        };
        self.write_documents(&documents)?;

        Ok(Some(removed))
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
    async fn missing_file_reads_as_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonStore::open(dir.path())?;

        let collection = store.collection::<Note>();

        assert!(collection.list_all().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn documents_survive_reopening_the_store() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        {
            let store = JsonStore::open(dir.path())?;
            let collection = store.collection::<Note>();

            collection.insert(&note(1, "first")).await?;
            collection.insert(&note(2, "second")).await?;
            collection.replace(&2, &note(2, "edited")).await?;
        }

        let store = JsonStore::open(dir.path())?;
        let collection = store.collection::<Note>();

        assert_eq!(
            vec![note(1, "first"), note(2, "edited")],
            collection.list_all().await?
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_deletes_from_disk() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonStore::open(dir.path())?;
        let collection = store.collection::<Note>();

        collection.insert(&note(1, "first")).await?;

        assert_eq!(Some(note(1, "first")), collection.remove(&1).await?);
        assert_eq!(None, collection.get(&1).await?);

        Ok(())
    }
}
