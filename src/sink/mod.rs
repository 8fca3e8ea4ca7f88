//! The document store the converters write into.
//!
//! The store is schemaless: documents are JSON objects with nested
//! objects and lists. `JsonlStore` is the on-disk implementation (one
//! JSONL file per collection under a database directory); `MemoryStore`
//! backs tests and embedding.

mod jsonl;
mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use crate::error::ConvertError;

/// An output document. Shapers produce these; nothing mutates them
/// after insertion.
pub type Document = serde_json::Value;

pub trait DocumentStore {
    /// Insert one whole document into a collection.
    fn insert(&mut self, collection: &str, document: &Document) -> Result<(), ConvertError>;

    /// Remove every document in one collection.
    fn clear_collection(&mut self, collection: &str) -> Result<(), ConvertError>;

    /// Remove every collection. This is the destructive step the
    /// pipeline runs before the first insert.
    fn drop_all(&mut self) -> Result<(), ConvertError>;

    /// Number of documents currently in a collection.
    fn count(&self, collection: &str) -> Result<u64, ConvertError>;

    /// Flush buffered writes. A no-op for stores without buffers.
    fn flush(&mut self) -> Result<(), ConvertError>;
}
