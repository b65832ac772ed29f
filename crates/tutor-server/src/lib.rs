//! HTTP server for the tutoring directory.
//!
//! Wires the JSON API in `tutor-api` to the SQLite store, adds request
//! tracing, and owns the runtime configuration.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tutor_core::store::DirectoryStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered from built-in defaults, an optional TOML file, and `TUTOR_*`
/// environment variables, later sources winning.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub database_path: PathBuf,
}

impl ServerConfig {
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 5000_i64)?
      .set_default("database_path", "tutor.db")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("TUTOR"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `database_path` with a leading `~` expanded to the user's home.
  pub fn resolved_database_path(&self) -> PathBuf { expand_tilde(&self.database_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: API routes plus per-request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: DirectoryStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  tutor_api::api_router(store).layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use tutor_core::{advertisement::Advertisement, pagination::Page};
  use tutor_store_sqlite::SqliteStore;

  async fn make_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    app(Arc::new(store))
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
      })
    };
    (status, value)
  }

  async fn create_subject(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/subjects", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
  }

  fn service(id: i64, title: &str, subject_id: i64) -> Value {
    json!({
      "id": id,
      "title": title,
      "description": "imported",
      "price": 20,
      "contact_info": "@tutor",
      "subject_id": subject_id,
    })
  }

  // ── Index ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn index_reports_status() {
    let app = make_app().await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "routes": ["/services", "/subjects"] }));
  }

  // ── Subjects ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn duplicate_subject_name_returns_409() {
    let app = make_app().await;
    create_subject(&app, "Math").await;

    let (status, body) = send(&app, "POST", "/subjects", Some(json!({ "name": "math" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn subject_without_name_returns_400() {
    let app = make_app().await;
    let (status, body) =
      send(&app, "POST", "/subjects", Some(json!({ "description": "no name" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "missing field 'name'" }));
  }

  #[tokio::test]
  async fn malformed_subject_body_returns_400() {
    let app = make_app().await;
    let (status, body) = send(&app, "POST", "/subjects", Some(json!({ "name": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "POST", "/subjects", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn subjects_are_listed_by_name_and_fetched_by_id() {
    let app = make_app().await;
    create_subject(&app, "Physics").await;
    let biology = create_subject(&app, "Biology").await;

    let (status, body) = send(&app, "GET", "/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body.as_array().unwrap().iter().map(|s| s["name"].clone()).collect();
    assert_eq!(names, [json!("Biology"), json!("Physics")]);

    let (status, body) = send(&app, "GET", &format!("/subjects/{biology}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Biology");
    assert_eq!(body["description"], Value::Null);
  }

  #[tokio::test]
  async fn unknown_subject_returns_404() {
    let app = make_app().await;
    let (status, body) = send(&app, "GET", "/subjects/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not found" }));

    let (status, _) = send(&app, "GET", "/subjects/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn subjects_by_name() {
    let app = make_app().await;
    create_subject(&app, "Chemistry").await;
    create_subject(&app, "Biochemistry").await;

    let (status, body) = send(&app, "GET", "/subjects/by_name?name=CHEM", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/subjects/by_name?name=geo", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/subjects/by_name", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "missing parameter 'name'" }));
  }

  // ── Services ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn chemistry_end_to_end() {
    let app = make_app().await;

    let (status, subject) =
      send(&app, "POST", "/subjects", Some(json!({ "name": "Chemistry" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let subject_id = subject["id"].as_i64().expect("assigned id");

    let (status, created) = send(
      &app,
      "POST",
      "/services",
      Some(json!({
        "title": "Tutor",
        "description": "x",
        "contact_info": "y",
        "subject_id": subject_id,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");

    let (status, body) =
      send(&app, "GET", &format!("/services?subject_id={subject_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let page: Page<Advertisement> = serde_json::from_value(body).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, created["id"].as_i64().unwrap());
    assert_eq!(page.items[0].title, "Tutor");
    assert_eq!((page.page, page.per_page, page.total, page.pages), (1, 20, 1, 1));

    let (status, body) =
      send(&app, "GET", &format!("/services/{}", page.items[0].id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact_info"], "y");
  }

  #[tokio::test]
  async fn unknown_service_returns_404_with_error_body() {
    let app = make_app().await;
    let (status, body) = send(&app, "GET", "/services/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not found" }));
  }

  #[tokio::test]
  async fn create_service_lists_missing_fields() {
    let app = make_app().await;
    let (status, body) =
      send(&app, "POST", "/services", Some(json!({ "title": "Tutor", "description": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": r#"missing fields: ["contact_info", "subject_id"]"# }));
  }

  #[tokio::test]
  async fn create_service_for_unknown_subject_is_a_store_error() {
    let app = make_app().await;
    let (status, body) = send(
      &app,
      "POST",
      "/services",
      Some(json!({
        "title": "Tutor",
        "description": "x",
        "contact_info": "y",
        "subject_id": 77,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn non_numeric_pagination_returns_400() {
    let app = make_app().await;
    for uri in ["/services?page=abc", "/services?per_page=ten", "/services?page=0"] {
      let (status, body) = send(&app, "GET", uri, None).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
      assert!(body["error"].is_string(), "{uri}");
    }

    let (status, _) = send(&app, "GET", "/services?subject_id=chem", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn unmatched_subject_name_returns_empty_envelope() {
    let app = make_app().await;
    let math = create_subject(&app, "Math").await;
    send(&app, "POST", "/services/bulk_import", Some(json!({
      "services": [service(1, "Algebra", math)]
    })))
    .await;

    let (status, body) = send(
      &app,
      "GET",
      &format!("/services?subject_name=zoology&subject_id={math}&page=2&per_page=5"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!({ "items": [], "page": 2, "per_page": 5, "total": 0, "pages": 0 })
    );
  }

  #[tokio::test]
  async fn listing_filters_by_subject_name_and_title() {
    let app = make_app().await;
    let math = create_subject(&app, "Mathematics").await;
    let art = create_subject(&app, "Art").await;
    send(&app, "POST", "/services/bulk_import", Some(json!({
      "services": [
        service(1, "Exam prep", math),
        service(2, "Homework", math),
        service(3, "Exam portfolio", art),
      ]
    })))
    .await;

    let (_, body) = send(&app, "GET", "/services?subject_name=math&q=EXAM", None).await;
    let page: Page<Advertisement> = serde_json::from_value(body).unwrap();
    let ids: Vec<_> = page.items.iter().map(|ad| ad.id).collect();
    assert_eq!(ids, [1]);

    let (_, body) = send(&app, "GET", "/services?per_page=2&page=2", None).await;
    let page: Page<Advertisement> = serde_json::from_value(body).unwrap();
    assert_eq!((page.items.len(), page.total, page.pages), (1, 3, 2));
  }

  // ── Bulk import ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn bulk_import_without_services_returns_400() {
    let app = make_app().await;
    let (status, body) =
      send(&app, "POST", "/services/bulk_import", Some(json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "expected { services: [...] }" }));
  }

  #[tokio::test]
  async fn bulk_import_reports_partial_failure() {
    let app = make_app().await;
    let math = create_subject(&app, "Math").await;

    let mut broken = service(3, "Broken", math);
    broken.as_object_mut().unwrap().remove("contact_info");
    let batch = json!({
      "services": [
        service(1, "One", math),
        service(2, "Two", math),
        broken,
        service(4, "Four", math),
        service(5, "Five", math),
      ]
    });

    let (status, body) = send(&app, "POST", "/services/bulk_import", Some(batch.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["imported"], 4);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["index"], 2);
    assert!(errors[0]["error"].as_str().unwrap().contains("contact_info"));

    // Replaying the batch skips existing ids and reports the same summary.
    let (status, replay) = send(&app, "POST", "/services/bulk_import", Some(batch)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(replay, body);

    let (_, listing) = send(&app, "GET", "/services", None).await;
    assert_eq!(listing["total"], 4);
  }
}
