//! Service layer: the item store and the storage it persists through.
//! - `storage` holds the byte-level document stores (file, memory).
//! - `items` implements list/get/create/update/delete over a whole-document
//!   read-modify-write cycle.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod items;
