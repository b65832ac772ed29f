//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision, so ordering by the text column orders chronologically.

use chrono::{DateTime, SecondsFormat, Utc};
use tutor_core::{advertisement::Advertisement, subject::Subject};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Build a `LIKE ... ESCAPE '\'` pattern matching any string that contains
/// `fragment`. The fragment is case-folded to match the `*_key` columns.
pub fn contains_pattern(fragment: &str) -> String {
  let folded = tutor_core::subject::fold_case(fragment);
  let mut pattern = String::with_capacity(folded.len() + 2);
  pattern.push('%');
  for c in folded.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const SUBJECT_COLUMNS: &str = "id, name, description";

/// Raw values read directly from a `subjects` row.
pub struct RawSubject {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
}

impl RawSubject {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
    })
  }

  pub fn into_subject(self) -> Subject {
    Subject { id: self.id, name: self.name, description: self.description }
  }
}

pub const ADVERTISEMENT_COLUMNS: &str = "id, title, description, price, education_format, \
                                         contact_info, subject_id, created_at, updated_at";

/// Raw values read directly from an `advertisements` row.
pub struct RawAdvertisement {
  pub id:               i64,
  pub title:            String,
  pub description:      String,
  pub price:            Option<f64>,
  pub education_format: Option<String>,
  pub contact_info:     String,
  pub subject_id:       i64,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawAdvertisement {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      title:            row.get(1)?,
      description:      row.get(2)?,
      price:            row.get(3)?,
      education_format: row.get(4)?,
      contact_info:     row.get(5)?,
      subject_id:       row.get(6)?,
      created_at:       row.get(7)?,
      updated_at:       row.get(8)?,
    })
  }

  pub fn into_advertisement(self) -> Result<Advertisement> {
    Ok(Advertisement {
      id:               self.id,
      title:            self.title,
      description:      self.description,
      price:            self.price,
      education_format: self.education_format,
      contact_info:     self.contact_info,
      subject_id:       self.subject_id,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn contains_pattern_escapes_wildcards() {
    assert_eq!(contains_pattern("Math"), "%math%");
    assert_eq!(contains_pattern("100%"), "%100\\%%");
    assert_eq!(contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
  }

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let later = earlier + chrono::Duration::microseconds(1500);
    assert!(encode_dt(earlier) < encode_dt(later));
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }
}
