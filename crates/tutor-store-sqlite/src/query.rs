//! Rendering of composed listing criteria into SQL.
//!
//! Every [`Criterion`] maps to one fixed predicate and exactly one bound
//! parameter. Predicates are joined with `AND`.

use rusqlite::types::Value;
use tutor_core::filter::Criterion;

use crate::encode::contains_pattern;

/// A conjunction of fixed SQL predicates together with their parameters, in
/// placeholder order.
#[derive(Debug, Default)]
pub struct WhereClause {
  predicates: Vec<&'static str>,
  params:     Vec<Value>,
}

impl WhereClause {
  pub fn from_criteria(criteria: &[Criterion]) -> Self {
    let mut clause = Self::default();
    for criterion in criteria {
      clause.push(criterion);
    }
    clause
  }

  fn push(&mut self, criterion: &Criterion) {
    let (predicate, param) = match criterion {
      // The id set travels as a single JSON-array parameter.
      Criterion::SubjectIn(ids) => (
        "subject_id IN (SELECT value FROM json_each(?))",
        Value::Text(serde_json::Value::from(ids.clone()).to_string()),
      ),
      Criterion::SubjectEq(id) => ("subject_id = ?", Value::Integer(*id)),
      Criterion::TitleContains(fragment) => {
        ("title_key LIKE ? ESCAPE '\\'", Value::Text(contains_pattern(fragment)))
      }
    };
    self.predicates.push(predicate);
    self.params.push(param);
  }

  /// The `WHERE ...` clause, or an empty string when there are no predicates.
  pub fn sql(&self) -> String {
    if self.predicates.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.predicates.join(" AND "))
    }
  }

  pub fn params(&self) -> &[Value] { &self.params }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_criteria_render_no_clause() {
    let clause = WhereClause::from_criteria(&[]);
    assert_eq!(clause.sql(), "");
    assert!(clause.params().is_empty());
  }

  #[test]
  fn criteria_render_in_order_with_one_param_each() {
    let clause = WhereClause::from_criteria(&[
      Criterion::SubjectIn(vec![1, 2]),
      Criterion::TitleContains("O'Brien 50%".into()),
    ]);
    assert_eq!(
      clause.sql(),
      "WHERE subject_id IN (SELECT value FROM json_each(?)) AND title_key LIKE ? ESCAPE '\\'"
    );
    assert_eq!(clause.params(), [
      Value::Text("[1,2]".into()),
      Value::Text("%o'brien 50\\%%".into()),
    ]);
  }

  #[test]
  fn subject_equality_binds_integer() {
    let clause = WhereClause::from_criteria(&[Criterion::SubjectEq(9)]);
    assert_eq!(clause.sql(), "WHERE subject_id = ?");
    assert_eq!(clause.params(), [Value::Integer(9)]);
  }
}
