//! Error type for `tally-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("review not found: {0}")]
  ReviewNotFound(i64),

  #[error("category not found: {0}")]
  CategoryNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
