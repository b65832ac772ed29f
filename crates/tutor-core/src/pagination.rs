//! Page arithmetic and the paginated response envelope.
//!
//! `page` and `per_page` come straight from the query string, so they are
//! parsed and range-checked here before any offset is computed.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  page:     u32,
  per_page: u32,
}

impl Pagination {
  /// Both values must be at least 1.
  pub fn new(page: u32, per_page: u32) -> Result<Self> {
    if page == 0 {
      return Err(Error::InvalidPagination { param: "page", value: page.to_string() });
    }
    if per_page == 0 {
      return Err(Error::InvalidPagination {
        param: "per_page",
        value: per_page.to_string(),
      });
    }
    Ok(Self { page, per_page })
  }

  /// Parse raw query-string values. Absent or empty values take the
  /// defaults; anything that is not a positive integer is rejected.
  pub fn from_params(page: Option<&str>, per_page: Option<&str>) -> Result<Self> {
    let page = parse_positive("page", page, DEFAULT_PAGE)?;
    let per_page = parse_positive("per_page", per_page, DEFAULT_PER_PAGE)?;
    Self::new(page, per_page)
  }

  pub fn page(&self) -> u32 { self.page }

  pub fn per_page(&self) -> u32 { self.per_page }

  /// Rows to skip: `(page - 1) * per_page`.
  pub fn offset(&self) -> u64 { u64::from(self.page - 1) * u64::from(self.per_page) }

  pub fn limit(&self) -> u64 { u64::from(self.per_page) }
}

impl Default for Pagination {
  fn default() -> Self { Self { page: DEFAULT_PAGE, per_page: DEFAULT_PER_PAGE } }
}

fn parse_positive(param: &'static str, raw: Option<&str>, default: u32) -> Result<u32> {
  let raw = match raw.map(str::trim) {
    None | Some("") => return Ok(default),
    Some(s) => s,
  };
  match raw.parse::<u32>() {
    Ok(n) if n >= 1 => Ok(n),
    _ => Err(Error::InvalidPagination { param, value: raw.to_owned() }),
  }
}

/// `ceil(total / per_page)`; zero exactly when `total` is zero.
pub fn total_pages(total: u64, per_page: u32) -> u64 {
  let per_page = u64::from(per_page.max(1));
  total.div_ceil(per_page)
}

/// The listing response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:    Vec<T>,
  pub page:     u32,
  pub per_page: u32,
  pub total:    u64,
  pub pages:    u64,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, pagination: Pagination, total: u64) -> Self {
    Self {
      items,
      page: pagination.page,
      per_page: pagination.per_page,
      total,
      pages: total_pages(total, pagination.per_page),
    }
  }

  /// A well-formed page with no items, echoing the requested position.
  pub fn empty(pagination: Pagination) -> Self { Self::new(Vec::new(), pagination, 0) }
}
