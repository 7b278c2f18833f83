//! Success response shapes.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreatedId {
    pub id: i64,
}

/// `{ "id": <id> }` for create routes.
pub fn created(id: i64) -> Json<CreatedId> {
    Json(CreatedId { id })
}

/// `{ "<column>": "<url>" }` for image routes, keyed by the entity's URL column.
pub fn stored_url(column: &str, url: String) -> Json<serde_json::Value> {
    let mut body = serde_json::Map::new();
    body.insert(column.to_string(), serde_json::Value::String(url));
    Json(serde_json::Value::Object(body))
}
