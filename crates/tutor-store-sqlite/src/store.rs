//! [`SqliteStore`], the SQLite implementation of [`DirectoryStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::{Connection, OptionalExtension as _, types::Value};
use tutor_core::{
  advertisement::{Advertisement, NewAdvertisement},
  filter::{Composed, ListingQuery, compose},
  import::ImportReport,
  pagination::{Page, Pagination},
  store::DirectoryStore,
  subject::{NewSubject, Subject, SubjectCreation, fold_case},
};

use crate::{
  Result,
  encode::{
    ADVERTISEMENT_COLUMNS, RawAdvertisement, RawSubject, SUBJECT_COLUMNS,
    contains_pattern, encode_dt,
  },
  import::import_batch,
  query::WhereClause,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A directory store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All work is
/// serialised onto the connection's worker thread, and every operation runs
/// as one closure there, so a transaction opened inside it never outlives
/// the operation: it is committed explicitly or rolled back on drop.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Ids of all subjects whose name contains `fragment`, ignoring case.
fn subject_ids_matching(conn: &Connection, fragment: &str) -> rusqlite::Result<Vec<i64>> {
  let mut stmt =
    conn.prepare("SELECT id FROM subjects WHERE name_key LIKE ?1 ESCAPE '\\'")?;
  let ids = stmt
    .query_map(rusqlite::params![contains_pattern(fragment)], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<i64>>>()?;
  Ok(ids)
}

fn sql_int(n: u64) -> Value { Value::Integer(i64::try_from(n).unwrap_or(i64::MAX)) }

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = crate::Error;

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn list_subjects(&self) -> Result<Vec<Subject>> {
    let raws: Vec<RawSubject> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLUMNS} FROM subjects ORDER BY name_key, name, id"
        ))?;
        let rows = stmt
          .query_map([], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawSubject::into_subject).collect())
  }

  async fn get_subject(&self, id: i64) -> Result<Option<Subject>> {
    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = ?1"),
            rusqlite::params![id],
            RawSubject::from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawSubject::into_subject))
  }

  async fn find_subjects(&self, fragment: &str) -> Result<Vec<Subject>> {
    let pattern = contains_pattern(fragment);

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLUMNS} FROM subjects
           WHERE name_key LIKE ?1 ESCAPE '\\'
           ORDER BY name_key, name, id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawSubject::into_subject).collect())
  }

  async fn create_subject(&self, input: NewSubject) -> Result<SubjectCreation> {
    let name_key = fold_case(&input.name);

    let created: Option<Subject> = self
      .conn
      .call(move |conn| {
        // The existence check and the insert share one transaction.
        let tx = conn.transaction()?;

        let taken = tx
          .query_row(
            "SELECT 1 FROM subjects WHERE name_key = ?1",
            rusqlite::params![name_key],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO subjects (name, name_key, description) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.name, name_key, input.description],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Some(Subject { id, name: input.name, description: input.description }))
      })
      .await?;

    Ok(match created {
      Some(subject) => {
        tracing::info!(id = subject.id, name = %subject.name, "subject created");
        SubjectCreation::Created(subject)
      }
      None => SubjectCreation::NameTaken,
    })
  }

  // ── Advertisements ────────────────────────────────────────────────────────

  async fn get_advertisement(&self, id: i64) -> Result<Option<Advertisement>> {
    let raw: Option<RawAdvertisement> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ADVERTISEMENT_COLUMNS} FROM advertisements WHERE id = ?1"),
            rusqlite::params![id],
            RawAdvertisement::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAdvertisement::into_advertisement).transpose()
  }

  async fn create_advertisement(&self, input: NewAdvertisement) -> Result<Advertisement> {
    // Truncated to the precision the column keeps.
    let now = Utc::now().trunc_subsecs(6);
    let now_str = encode_dt(now);
    let title_key = fold_case(&input.title);
    let row = input.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO advertisements (
             title, title_key, description, price, education_format,
             contact_info, subject_id, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            row.title,
            title_key,
            row.description,
            row.price,
            row.education_format,
            row.contact_info,
            row.subject_id,
            now_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::info!(id, subject_id = input.subject_id, "advertisement created");

    Ok(Advertisement {
      id,
      title: input.title,
      description: input.description,
      price: input.price,
      education_format: input.education_format,
      contact_info: input.contact_info,
      subject_id: input.subject_id,
      created_at: now,
      updated_at: now,
    })
  }

  async fn list_advertisements(
    &self,
    query: &ListingQuery,
    pagination: Pagination,
  ) -> Result<Page<Advertisement>> {
    let query = query.clone();

    let found: Option<(Vec<RawAdvertisement>, i64)> = self
      .conn
      .call(move |conn| {
        // Read-only: both queries see one snapshot, and dropping the
        // transaction ends it.
        let tx = conn.transaction()?;

        let criteria = match compose(&query, |name| subject_ids_matching(&tx, name))? {
          Composed::Empty => {
            tracing::debug!(subject_name = ?query.subject_name, "no subject matches; empty listing");
            return Ok(None);
          }
          Composed::Filter(criteria) => criteria,
        };
        tracing::debug!(?criteria, "composed listing filter");

        let clause = WhereClause::from_criteria(&criteria);
        let where_sql = clause.sql();

        let mut params = clause.params().to_vec();
        params.push(sql_int(pagination.limit()));
        params.push(sql_int(pagination.offset()));

        let items = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {ADVERTISEMENT_COLUMNS} FROM advertisements
             {where_sql}
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?"
          ))?;
          stmt
            .query_map(rusqlite::params_from_iter(params), RawAdvertisement::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let total: i64 = tx.query_row(
          &format!("SELECT COUNT(*) FROM advertisements {where_sql}"),
          rusqlite::params_from_iter(clause.params()),
          |row| row.get(0),
        )?;

        Ok(Some((items, total)))
      })
      .await?;

    let Some((raws, total)) = found else {
      return Ok(Page::empty(pagination));
    };

    let items = raws
      .into_iter()
      .map(RawAdvertisement::into_advertisement)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, pagination, u64::try_from(total).unwrap_or(0)))
  }

  async fn bulk_import(&self, records: Vec<serde_json::Value>) -> Result<ImportReport> {
    let submitted = records.len();
    let now = Utc::now();

    let report = self
      .conn
      .call(move |conn| Ok(import_batch(conn, records, now)?))
      .await?;

    tracing::info!(
      submitted,
      imported = report.imported,
      failed = report.errors.len(),
      "bulk import committed"
    );
    Ok(report)
  }
}
