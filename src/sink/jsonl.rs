use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{Document, DocumentStore};
use crate::error::ConvertError;

/// On-disk document store: a database directory holding one JSONL file
/// per collection, one document per line.
pub struct JsonlStore {
    root: PathBuf,
    writers: HashMap<String, BufWriter<File>>,
    counts: HashMap<String, u64>,
}

impl JsonlStore {
    /// Open (creating if needed) the database directory. Fails with
    /// `SinkUnavailable` before any destructive step runs.
    pub fn open(root: &Path) -> Result<Self, ConvertError> {
        fs::create_dir_all(root).map_err(ConvertError::SinkUnavailable)?;
        Ok(Self {
            root: root.to_path_buf(),
            writers: HashMap::new(),
            counts: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.jsonl", collection))
    }

    fn writer(&mut self, collection: &str) -> Result<&mut BufWriter<File>, ConvertError> {
        if !self.writers.contains_key(collection) {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.collection_path(collection))?;
            self.writers
                .insert(collection.to_string(), BufWriter::new(file));
        }
        Ok(self.writers.get_mut(collection).unwrap())
    }
}

impl DocumentStore for JsonlStore {
    fn insert(&mut self, collection: &str, document: &Document) -> Result<(), ConvertError> {
        let line = serde_json::to_string(document)?;
        let writer = self.writer(collection)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        *self.counts.entry(collection.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn clear_collection(&mut self, collection: &str) -> Result<(), ConvertError> {
        self.writers.remove(collection);
        self.counts.remove(collection);
        let path = self.collection_path(collection);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn drop_all(&mut self) -> Result<(), ConvertError> {
        self.writers.clear();
        self.counts.clear();
        fs::remove_dir_all(&self.root)?;
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<u64, ConvertError> {
        if let Some(count) = self.counts.get(collection) {
            return Ok(*count);
        }

        // Not written in this session; count what is on disk.
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(0);
        }
        let reader = BufReader::new(File::open(path)?);
        let mut count = 0u64;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }

    fn flush(&mut self) -> Result<(), ConvertError> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_count_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(dir.path()).unwrap();

        store.insert("types", &json!({"uniqueId": 1})).unwrap();
        store.insert("types", &json!({"uniqueId": 2})).unwrap();
        store.insert("regions", &json!({"uniqueId": 10})).unwrap();

        assert_eq!(store.count("types").unwrap(), 2);
        assert_eq!(store.count("regions").unwrap(), 1);
        assert_eq!(store.count("missing").unwrap(), 0);
    }

    #[test]
    fn count_reads_existing_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = JsonlStore::open(dir.path()).unwrap();
            store.insert("types", &json!({"uniqueId": 1})).unwrap();
            store.flush().unwrap();
        }

        let store = JsonlStore::open(dir.path()).unwrap();
        assert_eq!(store.count("types").unwrap(), 1);
    }

    #[test]
    fn clear_collection_resets_one_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(dir.path()).unwrap();

        store.insert("types", &json!({"uniqueId": 1})).unwrap();
        store.insert("regions", &json!({"uniqueId": 10})).unwrap();
        store.clear_collection("types").unwrap();

        assert_eq!(store.count("types").unwrap(), 0);
        assert_eq!(store.count("regions").unwrap(), 1);
        assert!(!dir.path().join("types.jsonl").exists());
    }

    #[test]
    fn drop_all_empties_the_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::open(dir.path()).unwrap();

        store.insert("types", &json!({"uniqueId": 1})).unwrap();
        store.drop_all().unwrap();

        assert_eq!(store.count("types").unwrap(), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        // The store stays usable after the drop.
        store.insert("types", &json!({"uniqueId": 2})).unwrap();
        assert_eq!(store.count("types").unwrap(), 1);
    }
}
