//! Route handlers, one module per record type.

pub mod edits;
pub mod genes;
pub mod species;

use crate::error::ApiError;
use axum::Json;
use genaxis_core::ListQuery;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// `limit` / `offset` query parameters of list routes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
}

impl From<Pagination> for ListQuery {
    fn from(page: Pagination) -> Self {
        Self {
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// Lists the collection routes.
pub async fn api_root() -> Json<Value> {
    Json(json!({
        "species": "/species",
        "genes": "/genes",
        "edits": "/edits",
    }))
}

/// Unparsable ids address nothing, so they are reported as 404.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(entity))
}

/// Overlays the top-level fields of `patch` onto `current`.
pub(crate) fn merge_patch(mut current: Value, patch: Value) -> Result<Value, ApiError> {
    let Value::Object(fields) = patch else {
        return Err(ApiError::bad_request("patch body must be a JSON object"));
    };
    if let Value::Object(target) = &mut current {
        target.extend(fields);
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_patch_overrides_only_given_fields() {
        let merged = merge_patch(
            json!({"name": "a", "common_name": "x"}),
            json!({"common_name": "y"}),
        )
        .unwrap();
        assert_eq!(merged, json!({"name": "a", "common_name": "y"}));
    }

    #[test]
    fn merge_patch_rejects_non_objects() {
        let err = merge_patch(json!({}), json!([1, 2])).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_id_is_not_found() {
        let err = parse_id("not-a-uuid", "gene").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
        assert_eq!(err.message, "gene not found");
    }
}
