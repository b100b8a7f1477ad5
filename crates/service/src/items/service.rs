use std::sync::Arc;

use models::item::{self, Fields, Item, Record};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

/// Document written when a store is first created.
pub const EMPTY_DOCUMENT: &[u8] = b"[]";

/// CRUD over a collection of items persisted as one JSON array.
///
/// Every call loads the whole document. Mutations hold `write_lock` from the
/// load until the new document is written, so two writers in this process
/// never interleave. Other processes writing the same file are not covered.
pub struct ItemService {
    store: Arc<dyn DocumentStore>,
    write_lock: Mutex<()>,
    pretty: bool,
}

impl ItemService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, write_lock: Mutex::new(()), pretty: true }
    }

    /// Compact output instead of the default four-space indent.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Decode the stored collection. A missing document, or one that is not a
    /// JSON array, yields an empty collection; only I/O failures are reported.
    /// Array elements are kept even when they carry no integer id.
    async fn load(&self) -> Result<Vec<Record>, ServiceError> {
        let Some(bytes) = self.store.read().await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice::<Vec<Record>>(&bytes) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(store = %self.store.describe(), error = %e, "store contents unreadable; treating collection as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, records: &[Record]) -> Result<(), ServiceError> {
        let bytes = encode(records, self.pretty)?;
        self.store.write(bytes).await
    }

    /// Every stored record in order, including ones without an integer id.
    pub async fn list(&self) -> Result<Vec<Record>, ServiceError> {
        let records = self.load().await?;
        debug!(count = records.len(), "listed items");
        Ok(records)
    }

    /// First item whose id matches.
    pub async fn get(&self, id: i64) -> Result<Item, ServiceError> {
        self.load()
            .await?
            .into_iter()
            .find_map(|record| match record {
                Record::Item(item) if item.id == id => Some(item),
                _ => None,
            })
            .ok_or(ServiceError::NotFound(id))
    }

    /// Append a new item built from `payload` and persist.
    pub async fn create(&self, payload: Fields) -> Result<Item, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let item = Item::from_payload(payload, &records)?;
        records.push(Record::Item(item.clone()));
        self.save(&records).await?;
        info!(id = item.id, total = records.len(), "created item");
        Ok(item)
    }

    /// Like [`create`](Self::create), decoding a raw request body first.
    pub async fn create_from_slice(&self, body: &[u8]) -> Result<Item, ServiceError> {
        let payload = item::parse_object(body)?;
        self.create(payload).await
    }

    /// Shallow-merge `patch` into the first item with `id` and persist.
    /// Nothing is written when no item matches or the patch is rejected.
    pub async fn update(&self, id: i64, patch: Fields) -> Result<Item, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let target = records
            .iter_mut()
            .find_map(|record| record.as_item_mut(id))
            .ok_or(ServiceError::NotFound(id))?;
        target.merge(patch)?;
        let updated = target.clone();
        self.save(&records).await?;
        info!(id, new_id = updated.id, "updated item");
        Ok(updated)
    }

    /// Like [`update`](Self::update), decoding a raw request body first.
    pub async fn update_from_slice(&self, id: i64, body: &[u8]) -> Result<Item, ServiceError> {
        let patch = item::parse_object(body)?;
        self.update(id, patch).await
    }

    /// Remove the first item with `id` and persist.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let index = records
            .iter()
            .position(|record| record.id() == Some(id))
            .ok_or(ServiceError::NotFound(id))?;
        records.remove(index);
        self.save(&records).await?;
        info!(id, total = records.len(), "deleted item");
        Ok(())
    }
}

fn encode(records: &[Record], pretty: bool) -> Result<Vec<u8>, ServiceError> {
    if !pretty {
        return serde_json::to_vec(records).map_err(ServiceError::storage);
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser).map_err(ServiceError::storage)?;
    Ok(buf)
}
