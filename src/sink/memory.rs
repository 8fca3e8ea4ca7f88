use std::collections::HashMap;

use super::{Document, DocumentStore};
use crate::error::ConvertError;

/// In-memory document store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents in one collection, in insertion order.
    pub fn collection(&self, name: &str) -> &[Document] {
        self.collections.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&mut self, collection: &str, document: &Document) -> Result<(), ConvertError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(())
    }

    fn clear_collection(&mut self, collection: &str) -> Result<(), ConvertError> {
        self.collections.remove(collection);
        Ok(())
    }

    fn drop_all(&mut self) -> Result<(), ConvertError> {
        self.collections.clear();
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<u64, ConvertError> {
        Ok(self.collection(collection).len() as u64)
    }

    fn flush(&mut self) -> Result<(), ConvertError> {
        Ok(())
    }
}
