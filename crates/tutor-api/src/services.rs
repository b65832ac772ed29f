//! Handlers for `/services` endpoints (advertisement listings).
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/services` | `?page`, `?per_page`, `?subject_id`, `?subject_name`, `?q`; paginated envelope |
//! | `GET`  | `/services/:id` | 404 if not found |
//! | `POST` | `/services` | Body: [`CreateBody`]; returns 201 + stored advertisement |

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
  advertisement::{Advertisement, NewAdvertisement},
  filter::ListingQuery,
  pagination::{Page, Pagination},
  store::DirectoryStore,
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// Raw query-string values; parsed and validated in the handler so that a
/// bad value produces a JSON error naming the parameter.
#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub page:         Option<String>,
  pub per_page:     Option<String>,
  pub subject_id:   Option<String>,
  pub subject_name: Option<String>,
  pub q:            Option<String>,
}

/// `GET /services[?page=..][&per_page=..][&subject_id=..][&subject_name=..][&q=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Advertisement>>, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let pagination =
    Pagination::from_params(params.page.as_deref(), params.per_page.as_deref())?;
  let query = ListingQuery::from_params(
    params.subject_id.as_deref(),
    params.subject_name.as_deref(),
    params.q.as_deref(),
  )?;

  let page = store
    .list_advertisements(&query, pagination)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /services/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Advertisement>, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Path(id) = id?;
  let ad = store
    .get_advertisement(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("not found".to_owned()))?;
  Ok(Json(ad))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /services`. Required fields are optional here
/// so that all missing ones can be reported together.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:            Option<String>,
  pub description:      Option<String>,
  pub contact_info:     Option<String>,
  pub subject_id:       Option<i64>,
  pub price:            Option<f64>,
  pub education_format: Option<String>,
}

impl TryFrom<CreateBody> for NewAdvertisement {
  type Error = ApiError;

  fn try_from(b: CreateBody) -> Result<Self, ApiError> {
    match (b.title, b.description, b.contact_info, b.subject_id) {
      (Some(title), Some(description), Some(contact_info), Some(subject_id)) => {
        Ok(NewAdvertisement {
          title,
          description,
          price: b.price,
          education_format: b.education_format,
          contact_info,
          subject_id,
        })
      }
      (title, description, contact_info, subject_id) => {
        let missing: Vec<&str> = [
          ("title", title.is_none()),
          ("description", description.is_none()),
          ("contact_info", contact_info.is_none()),
          ("subject_id", subject_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();
        Err(ApiError::BadRequest(format!("missing fields: {missing:?}")))
      }
    }
  }
}

/// `POST /services`: returns 201 + the stored [`Advertisement`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body?;
  let input = NewAdvertisement::try_from(body)?;

  let ad = store
    .create_advertisement(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(ad)))
}
