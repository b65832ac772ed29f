//! Error type for `tutor-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

/// Why a single bulk-import record was rejected. The `Display` text is what
/// callers see in the import report.
#[derive(Debug, Error)]
pub enum RecordError {
  #[error("invalid record: {0}")]
  Decode(#[from] tutor_core::Error),

  #[error("{0}")]
  Database(#[from] rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
