//! Subjects: the categories advertisements are filed under.

use serde::{Deserialize, Serialize};

/// A subject as stored. `name` is unique case-insensitively; the store
/// enforces that on creation, not the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
}

/// Input to [`crate::store::DirectoryStore::create_subject`].
#[derive(Debug, Clone)]
pub struct NewSubject {
  pub name:        String,
  pub description: Option<String>,
}

/// Outcome of a subject creation attempt.
#[derive(Debug, Clone)]
pub enum SubjectCreation {
  Created(Subject),
  /// Another subject already uses this name, ignoring case.
  NameTaken,
}

/// Fold a name or title into the key used for case-insensitive comparison.
///
/// SQLite's `LIKE` and `lower()` only fold ASCII, so stores keep a
/// pre-folded copy next to the display value.
pub fn fold_case(s: &str) -> String { s.to_lowercase() }
