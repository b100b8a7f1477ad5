use std::sync::Arc;

use service::items::ItemService;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub items: Arc<ItemService>,
}

impl ServerState {
    pub fn new(items: ItemService) -> Self {
        Self { items: Arc::new(items) }
    }
}
