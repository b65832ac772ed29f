//! JSON REST API for the tutoring directory.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tutor_core::store::DirectoryStore`]. TLS, tracing layers and other
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = tutor_api::api_router(Arc::new(store));
//! ```

pub mod error;
pub mod import;
pub mod services;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use serde_json::{Value, json};
use tutor_core::store::DirectoryStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DirectoryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(index))
    // Subjects
    .route("/subjects", get(subjects::list::<S>).post(subjects::create::<S>))
    .route("/subjects/by_name", get(subjects::by_name::<S>))
    .route("/subjects/{id}", get(subjects::get_one::<S>))
    // Services
    .route("/services", get(services::list::<S>).post(services::create::<S>))
    .route("/services/bulk_import", post(import::bulk::<S>))
    .route("/services/{id}", get(services::get_one::<S>))
    .with_state(store)
}

/// `GET /`: liveness and a map of the top-level resources.
async fn index() -> Json<Value> {
  Json(json!({ "status": "ok", "routes": ["/services", "/subjects"] }))
}
