//! Category: the grouping every review belongs to.
//!
//! Categories are administered outside this service and are read-only from
//! its point of view.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          i64,
  /// Unique across all categories.
  pub name:        String,
  pub description: String,
}
