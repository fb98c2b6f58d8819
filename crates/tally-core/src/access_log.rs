//! Append-only record of API accesses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One audited access. Rows are only ever inserted, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLog {
  pub id:         i64,
  /// Short description of the access, e.g. `GET /reviews/trends`.
  pub text:       String,
  /// Store-assigned at insertion.
  pub created_at: DateTime<Utc>,
}
