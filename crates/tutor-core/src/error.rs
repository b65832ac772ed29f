//! Error types for `tutor-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// `page` or `per_page` was not a positive integer.
  #[error("invalid value for '{param}': {value:?} (expected a positive integer)")]
  InvalidPagination { param: &'static str, value: String },

  #[error("invalid value for '{param}': {value:?} (expected an integer)")]
  InvalidParameter { param: &'static str, value: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
