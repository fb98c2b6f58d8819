//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (millisecond
//! precision, `Z` suffix) so that lexical order matches chronological order.
//! Reading also accepts SQLite's native `YYYY-MM-DD HH:MM:SS[.fff]` form,
//! taken as UTC, for rows stamped by other writers.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use tally_core::{
  access_log::AccessLog, category::Category, review::Review,
  trend::CategoryStats,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

const SQLITE_DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, SQLITE_DT_FORMAT)
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawReview::from_row`].
pub const REVIEW_COLUMNS: &str = "id, text, stars, review_id, tone, sentiment, \
                                  category_id, created_at, updated_at";

/// Raw values read directly from a `review` row.
pub struct RawReview {
  pub id:          i64,
  pub text:        Option<String>,
  pub stars:       i64,
  pub review_id:   String,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub category_id: i64,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawReview {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      text:        row.get(1)?,
      stars:       row.get(2)?,
      review_id:   row.get(3)?,
      tone:        row.get(4)?,
      sentiment:   row.get(5)?,
      category_id: row.get(6)?,
      created_at:  row.get(7)?,
      updated_at:  row.get(8)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      id:          self.id,
      text:        self.text,
      stars:       self.stars,
      review_id:   self.review_id,
      tone:        self.tone,
      sentiment:   self.sentiment,
      category_id: self.category_id,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// A `category` row joined with its review aggregates.
pub struct RawCategoryStats {
  pub id:            i64,
  pub name:          String,
  pub description:   String,
  pub total_reviews: i64,
  pub average_stars: Option<f64>,
}

impl RawCategoryStats {
  pub fn into_stats(self) -> CategoryStats {
    CategoryStats {
      category:      Category {
        id:          self.id,
        name:        self.name,
        description: self.description,
      },
      total_reviews: u64::try_from(self.total_reviews).unwrap_or(0),
      average_stars: self.average_stars,
    }
  }
}

/// Raw values read directly from an `access_log` row.
pub struct RawAccessLog {
  pub id:         i64,
  pub text:       String,
  pub created_at: String,
}

impl RawAccessLog {
  pub fn into_access_log(self) -> Result<AccessLog> {
    Ok(AccessLog {
      id:         self.id,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
