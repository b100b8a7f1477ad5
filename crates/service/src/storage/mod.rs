//! Storage abstractions for service layer
//!
//! A `DocumentStore` holds exactly one serialized document. The item service
//! decides what goes into it; stores only move bytes.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod file_store;
pub mod memory_store;

pub use file_store::FileDocumentStore;
pub use memory_store::MemoryDocumentStore;

/// Trait abstraction for whole-document storage.
/// Implementations can be file-backed, in-memory, or remote.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The full document, or `None` if nothing has been stored yet.
    async fn read(&self) -> Result<Option<Vec<u8>>, ServiceError>;

    /// Replace the full document.
    async fn write(&self, bytes: Vec<u8>) -> Result<(), ServiceError>;

    /// Short human-readable location, used in logs.
    fn describe(&self) -> String;
}
