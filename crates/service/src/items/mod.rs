//! Item store: CRUD over the whole collection held in one document.

pub mod service;

pub use service::ItemService;
