//! Advertisements: tutoring service listings, each filed under one subject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted service listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
  pub id:               i64,
  pub title:            String,
  pub description:      String,
  pub price:            Option<f64>,
  /// Free-form tag such as `"online"` or `"in person"`.
  pub education_format: Option<String>,
  pub contact_info:     String,
  pub subject_id:       i64,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Input to [`crate::store::DirectoryStore::create_advertisement`].
/// The id and both timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAdvertisement {
  pub title:            String,
  pub description:      String,
  pub price:            Option<f64>,
  pub education_format: Option<String>,
  pub contact_info:     String,
  pub subject_id:       i64,
}

impl NewAdvertisement {
  /// Convenience constructor with the optional fields left empty.
  pub fn new(
    title: impl Into<String>,
    description: impl Into<String>,
    contact_info: impl Into<String>,
    subject_id: i64,
  ) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      price: None,
      education_format: None,
      contact_info: contact_info.into(),
      subject_id,
    }
  }
}
