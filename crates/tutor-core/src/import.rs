//! Bulk-import record and report types.
//!
//! Records arrive as untyped JSON so that one malformed record can be
//! reported on its own instead of rejecting the whole batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One bulk-import record after decoding. Unlike
/// [`NewAdvertisement`](crate::advertisement::NewAdvertisement) the id is
/// supplied by the caller, and so may be the timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportCandidate {
  pub id:               i64,
  pub title:            String,
  pub description:      String,
  pub price:            Option<f64>,
  pub education_format: Option<String>,
  pub contact_info:     String,
  pub subject_id:       i64,
  pub created_at:       Option<DateTime<Utc>>,
  pub updated_at:       Option<DateTime<Utc>>,
}

impl ImportCandidate {
  pub fn from_json(record: serde_json::Value) -> crate::Result<Self> {
    Ok(serde_json::from_value(record)?)
  }
}

/// A record that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
  /// Position of the record in the submitted batch.
  pub index: usize,
  pub error: String,
}

/// Summary returned by a bulk import.
///
/// `imported` counts records that went through without error, including
/// records skipped because their id already existed. Replaying a batch
/// therefore reports the same count again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
  pub imported: usize,
  pub errors:   Vec<ImportFailure>,
}

impl ImportReport {
  pub fn record_success(&mut self) { self.imported += 1; }

  pub fn record_failure(&mut self, index: usize, error: impl ToString) {
    self.errors.push(ImportFailure { index, error: error.to_string() });
  }
}
