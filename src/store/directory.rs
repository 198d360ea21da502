use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{validate_collection_name, Document, DocumentStore, StoreError};

/// Directory-backed document store
///
/// Each collection is a `<name>.jsonl` file holding one JSON document per
/// line. Batches are appended with a single buffered write and fsync.
///
/// ```text
/// store/
/// ├── sweeps.jsonl            # quantity containers
/// └── sweeps.metadata.jsonl   # metadata entities
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    root: PathBuf,
}

impl JsonDirectoryStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all collections, sorted
    pub fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "jsonl") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf, StoreError> {
        validate_collection_name(collection)?;
        Ok(self.root.join(format!("{}.jsonl", collection)))
    }

    fn append(&self, collection: &str, documents: &[Document]) -> Result<(), StoreError> {
        let path = self.collection_path(collection)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        for document in documents {
            serde_json::to_writer(&mut writer, document)?;
            writer.write_all(b"\n")?;
        }
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_data()?;
        Ok(())
    }
}

impl DocumentStore for JsonDirectoryStore {
    fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.append(collection, std::slice::from_ref(&document))
    }

    fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<(), StoreError> {
        self.append(collection, &documents)
    }

    fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let path = self.collection_path(collection)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(path)?);
        let mut documents = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            documents.push(serde_json::from_str(&line)?);
        }
        Ok(documents)
    }

    fn collection_exists(&self, collection: &str) -> Result<bool, StoreError> {
        Ok(self.collection_path(collection)?.exists())
    }

    fn create_collection(&self, collection: &str) -> Result<(), StoreError> {
        let path = self.collection_path(collection)?;
        OpenOptions::new().create(true).append(true).open(path)?;
        Ok(())
    }
}
