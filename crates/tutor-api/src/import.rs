//! Handler for `POST /services/bulk_import`.
//!
//! The body is `{"services": [...]}`. Records are passed to the store
//! undecoded so that one malformed record is reported on its own rather than
//! failing the request.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tutor_core::store::DirectoryStore;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct BulkBody {
  pub services: Option<Vec<serde_json::Value>>,
}

/// `POST /services/bulk_import`: returns 201 + `{"imported": n, "errors": [...]}`.
pub async fn bulk<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<BulkBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body?;
  let records = body
    .services
    .ok_or_else(|| ApiError::BadRequest("expected { services: [...] }".to_owned()))?;

  let report = store
    .bulk_import(records)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(report)))
}
