//! Filter composition for advertisement listings.
//!
//! A [`ListingQuery`] is turned into a conjunction of typed [`Criterion`]s.
//! Backends render each criterion to a fixed predicate with one bound
//! parameter; user input never becomes part of the query text.

use crate::{Error, Result};

/// Optional listing criteria as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
  /// Exact subject id. Ignored when `subject_name` is set.
  pub subject_id:   Option<i64>,
  /// Case-insensitive substring of a subject name.
  pub subject_name: Option<String>,
  /// Case-insensitive substring of the advertisement title.
  pub q:            Option<String>,
}

impl ListingQuery {
  /// Build a query from raw query-string values. Empty strings count as
  /// absent; a `subject_id` that is not an integer is rejected.
  pub fn from_params(
    subject_id: Option<&str>,
    subject_name: Option<&str>,
    q: Option<&str>,
  ) -> Result<Self> {
    let subject_id = match subject_id.map(str::trim) {
      None | Some("") => None,
      Some(raw) => Some(raw.parse::<i64>().map_err(|_| Error::InvalidParameter {
        param: "subject_id",
        value: raw.to_owned(),
      })?),
    };
    Ok(Self {
      subject_id,
      subject_name: non_empty(subject_name),
      q: non_empty(q),
    })
  }
}

fn non_empty(s: Option<&str>) -> Option<String> {
  s.filter(|s| !s.is_empty()).map(str::to_owned)
}

/// One conjunct of a listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
  /// `subject_id` is one of the given ids.
  SubjectIn(Vec<i64>),
  SubjectEq(i64),
  /// Title contains the substring, ignoring case.
  TitleContains(String),
}

/// The result of composing a [`ListingQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composed {
  /// A precondition matched nothing; the listing is empty and the main query
  /// must not be issued.
  Empty,
  /// All criteria must hold. An empty list matches every row.
  Filter(Vec<Criterion>),
}

/// Compose `query` into criteria.
///
/// `resolve_subject_ids` maps a subject-name substring to the ids of all
/// matching subjects. It is called at most once, and only when
/// `subject_name` is set; its errors are returned unchanged.
pub fn compose<E>(
  query: &ListingQuery,
  resolve_subject_ids: impl FnOnce(&str) -> std::result::Result<Vec<i64>, E>,
) -> std::result::Result<Composed, E> {
  let mut criteria = Vec::new();

  if let Some(name) = &query.subject_name {
    let ids = resolve_subject_ids(name)?;
    if ids.is_empty() {
      return Ok(Composed::Empty);
    }
    criteria.push(Criterion::SubjectIn(ids));
  } else if let Some(id) = query.subject_id {
    criteria.push(Criterion::SubjectEq(id));
  }

  if let Some(q) = &query.q {
    criteria.push(Criterion::TitleContains(q.clone()));
  }

  Ok(Composed::Filter(criteria))
}
