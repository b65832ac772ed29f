//! Handlers for `/subjects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | Ordered by name |
//! | `GET`  | `/subjects/by_name` | `?name=<substring>`; 404 if nothing matches |
//! | `POST` | `/subjects` | Body: `{"name": "...", "description": "..."}`; 409 on duplicate name |
//! | `GET`  | `/subjects/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tutor_core::{
  store::DirectoryStore,
  subject::{NewSubject, Subject, SubjectCreation},
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /subjects`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subjects = store
    .list_subjects()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(subjects))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /subjects/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Subject>, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Path(id) = id?;
  let subject = store
    .get_subject(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("not found".to_owned()))?;
  Ok(Json(subject))
}

// ─── Search by name ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ByNameParams {
  /// Case-insensitive substring of the subject name.
  pub name: Option<String>,
}

/// `GET /subjects/by_name?name=<substring>`
pub async fn by_name<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ByNameParams>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let name = params
    .name
    .filter(|n| !n.is_empty())
    .ok_or_else(|| ApiError::BadRequest("missing parameter 'name'".to_owned()))?;

  let subjects = store
    .find_subjects(&name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if subjects.is_empty() {
    return Err(ApiError::NotFound("not found".to_owned()));
  }
  Ok(Json(subjects))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /subjects`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        Option<String>,
  pub description: Option<String>,
}

/// `POST /subjects`: returns 201 + the stored [`Subject`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body?;
  let name = body
    .name
    .filter(|n| !n.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("missing field 'name'".to_owned()))?;

  let created = store
    .create_subject(NewSubject { name, description: body.description })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  match created {
    SubjectCreation::Created(subject) => Ok((StatusCode::CREATED, Json(subject))),
    SubjectCreation::NameTaken => Err(ApiError::Conflict(
      "subject with this name already exists".to_owned(),
    )),
  }
}
