//! Bulk import: many records, one commit, failures isolated per record.
//!
//! The batch runs inside a single transaction. Each record gets its own
//! savepoint, so a record that fails is rolled back on its own while the
//! records before and after it stay pending for the final commit.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction};
use tutor_core::{
  import::{ImportCandidate, ImportReport},
  subject::fold_case,
};

use crate::{encode::encode_dt, error::RecordError};

/// Existing ids are left untouched, which makes replays idempotent.
const INSERT_SKIP_EXISTING: &str = "
  INSERT INTO advertisements (
    id, title, title_key, description, price, education_format,
    contact_info, subject_id, created_at, updated_at
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
  ON CONFLICT (id) DO NOTHING";

/// Import `records` in order. `now` stands in for missing timestamps.
///
/// Only a failure to open or commit the batch transaction is returned as an
/// error; everything else ends up in the report.
pub fn import_batch(
  conn: &mut Connection,
  records: Vec<serde_json::Value>,
  now: DateTime<Utc>,
) -> rusqlite::Result<ImportReport> {
  let mut tx = conn.transaction()?;
  let mut report = ImportReport::default();

  for (index, record) in records.into_iter().enumerate() {
    match import_record(&mut tx, record, now) {
      Ok(()) => report.record_success(),
      Err(e) => {
        tracing::warn!(index, error = %e, "bulk import record rejected");
        report.record_failure(index, e);
      }
    }
  }

  tx.commit()?;
  Ok(report)
}

fn import_record(
  tx: &mut Transaction<'_>,
  record: serde_json::Value,
  now: DateTime<Utc>,
) -> Result<(), RecordError> {
  let candidate = ImportCandidate::from_json(record)?;
  let created_at = candidate.created_at.unwrap_or(now);
  let updated_at = candidate.updated_at.unwrap_or(created_at);

  // Dropping the savepoint without committing rolls it back.
  let sp = tx.savepoint()?;
  sp.execute(
    INSERT_SKIP_EXISTING,
    rusqlite::params![
      candidate.id,
      candidate.title,
      fold_case(&candidate.title),
      candidate.description,
      candidate.price,
      candidate.education_format,
      candidate.contact_info,
      candidate.subject_id,
      encode_dt(created_at),
      encode_dt(updated_at),
    ],
  )?;
  sp.commit()?;
  Ok(())
}
