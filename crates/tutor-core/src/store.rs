//! The `DirectoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tutor-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  advertisement::{Advertisement, NewAdvertisement},
  filter::ListingQuery,
  import::ImportReport,
  pagination::{Page, Pagination},
  subject::{NewSubject, Subject, SubjectCreation},
};

/// Abstraction over a directory backend.
///
/// Each method is one unit of work against the store: it either completes
/// and commits, or fails and leaves no partial writes behind. The one
/// exception is [`bulk_import`](DirectoryStore::bulk_import), which isolates
/// failures per record.
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// All subjects ordered by name.
  fn list_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Retrieve a subject by id. Returns `None` if not found.
  fn get_subject(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// Subjects whose name contains `fragment`, ignoring case, ordered by name.
  fn find_subjects<'a>(
    &'a self,
    fragment: &'a str,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + 'a;

  /// Create a subject unless the name is already taken (ignoring case).
  fn create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<SubjectCreation, Self::Error>> + Send + '_;

  // ── Advertisements ────────────────────────────────────────────────────

  /// Retrieve an advertisement by id. Returns `None` if not found.
  fn get_advertisement(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Advertisement>, Self::Error>> + Send + '_;

  /// Persist a new advertisement with a store-assigned id and timestamps.
  fn create_advertisement(
    &self,
    input: NewAdvertisement,
  ) -> impl Future<Output = Result<Advertisement, Self::Error>> + Send + '_;

  /// One page of advertisements matching `query`, newest first, together
  /// with the total match count.
  ///
  /// If `query.subject_name` matches no subject the returned page is empty
  /// and advertisements are not queried at all.
  fn list_advertisements<'a>(
    &'a self,
    query: &'a ListingQuery,
    pagination: Pagination,
  ) -> impl Future<Output = Result<Page<Advertisement>, Self::Error>> + Send + 'a;

  /// Insert a batch of raw records with caller-supplied ids.
  ///
  /// Records whose id already exists are skipped without modification. A
  /// record that fails (undecodable, constraint violation) is reported in
  /// [`ImportReport::errors`] and does not affect the others. Only a failure
  /// to commit the batch as a whole is returned as `Err`.
  fn bulk_import(
    &self,
    records: Vec<serde_json::Value>,
  ) -> impl Future<Output = Result<ImportReport, Self::Error>> + Send + '_;
}
