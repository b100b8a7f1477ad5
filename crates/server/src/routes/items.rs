use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Message;
use models::{Item, Record};
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::metrics;
use crate::state::ServerState;

/// Only unsigned decimal segments address an item; anything else (signs,
/// whitespace, fractions) answers 404.
fn parse_id(raw: &str) -> Result<i64, JsonApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(JsonApiError::not_found());
    }
    raw.parse::<i64>().map_err(|_| JsonApiError::not_found())
}

fn outcome<T>(res: &Result<T, ServiceError>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(ServiceError::NotFound(_)) => "not_found",
        Err(ServiceError::InvalidInput(_)) => "invalid",
        Err(ServiceError::Storage(_)) => "error",
    }
}

fn finish<T>(op: &str, started: Instant, res: Result<T, ServiceError>) -> Result<T, JsonApiError> {
    metrics::observe(op, outcome(&res), started);
    res.map_err(JsonApiError::from)
}

#[utoipa::path(
    get, path = "/api/items", tag = "items",
    responses(
        (status = 200, description = "A list of items", body = [crate::openapi::ItemDoc])
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Record>>, JsonApiError> {
    let started = Instant::now();
    let res = state.items.list().await;
    finish("list", started, res).map(Json)
}

#[utoipa::path(
    get, path = "/api/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "The ID of the item to retrieve")),
    responses(
        (status = 200, description = "The item details", body = crate::openapi::ItemDoc),
        (status = 404, description = "Item not found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(raw_id): Path<String>) -> Result<Json<Item>, JsonApiError> {
    let id = parse_id(&raw_id)?;
    let started = Instant::now();
    let res = state.items.get(id).await;
    finish("get", started, res).map(Json)
}

#[utoipa::path(
    post, path = "/api/items", tag = "items",
    request_body = crate::openapi::ItemInputDoc,
    responses(
        (status = 201, description = "Item created", body = crate::openapi::ItemDoc),
        (status = 400, description = "Invalid item data", body = crate::openapi::MessageDoc)
    )
)]
pub async fn create(State(state): State<ServerState>, body: Bytes) -> Result<(StatusCode, Json<Item>), JsonApiError> {
    let started = Instant::now();
    let res = state.items.create_from_slice(&body).await;
    finish("create", started, res).map(|item| (StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put, path = "/api/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "The ID of the item to update")),
    request_body = crate::openapi::ItemInputDoc,
    responses(
        (status = 200, description = "Item updated", body = crate::openapi::ItemDoc),
        (status = 400, description = "Invalid item data", body = crate::openapi::MessageDoc),
        (status = 404, description = "Item not found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Item>, JsonApiError> {
    let id = parse_id(&raw_id)?;
    let started = Instant::now();
    let res = state.items.update_from_slice(id, &body).await;
    finish("update", started, res).map(Json)
}

#[utoipa::path(
    delete, path = "/api/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "The ID of the item to delete")),
    responses(
        (status = 200, description = "Item deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Item not found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(raw_id): Path<String>) -> Result<Json<Message>, JsonApiError> {
    let id = parse_id(&raw_id)?;
    let started = Instant::now();
    let res = state.items.delete(id).await;
    finish("delete", started, res).map(|()| Json(Message::new("Item deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_integer_ids_are_not_found() {
        assert_eq!(parse_id("12").ok(), Some(12));
        assert_eq!(parse_id("007").ok(), Some(7));
        for raw in ["abc", "1.5", "", "99999999999999999999", "-3", "+5", " 5", "5 "] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.status, StatusCode::NOT_FOUND);
        }
    }
}
