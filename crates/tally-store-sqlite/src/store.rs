//! [`SqliteStore`]: the SQLite implementation of [`ReviewStore`] and
//! [`AccessLogStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tally_core::{
  access_log::AccessLog,
  category::Category,
  classification::Classification,
  review::Review,
  store::{AccessLogStore, ReviewStore},
  trend::CategoryStats,
};

use crate::{
  encode::{
    decode_dt, encode_dt, RawAccessLog, RawCategoryStats, RawReview, REVIEW_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Ingestion input ─────────────────────────────────────────────────────────

/// Input to [`SqliteStore::add_review`].
#[derive(Debug, Clone)]
pub struct NewReview {
  pub category_id: i64,
  pub review_id:   String,
  pub stars:       i64,
  pub text:        Option<String>,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  /// Defaults to now; ingestion of historical reviews may backdate it.
  pub created_at:  Option<DateTime<Utc>>,
}

impl NewReview {
  /// Convenience constructor with all optional fields unset.
  pub fn new(category_id: i64, review_id: impl Into<String>, stars: i64) -> Self {
    Self {
      category_id,
      review_id: review_id.into(),
      stars,
      text: None,
      tone: None,
      sentiment: None,
      created_at: None,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A review store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Ingestion ─────────────────────────────────────────────────────────────

  /// Insert a category. Categories are normally administered by external
  /// tooling; this exists for that tooling and for tests.
  pub async fn add_category(
    &self,
    name: impl Into<String>,
    description: impl Into<String>,
  ) -> Result<Category> {
    let name        = name.into();
    let description = description.into();

    let (n, d) = (name.clone(), description.clone());
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO category (name, description) VALUES (?1, ?2)",
          rusqlite::params![n, d],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Category { id, name, description })
  }

  /// Insert a review. Returns [`Error::CategoryNotFound`] if the category
  /// does not exist.
  pub async fn add_review(&self, input: NewReview) -> Result<Review> {
    let category_id = input.category_id;
    let now         = Utc::now();
    let created_str = encode_dt(input.created_at.unwrap_or(now));
    let updated_str = encode_dt(now);

    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM category WHERE id = ?1",
            rusqlite::params![input.category_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO review (
             text, stars, review_id, tone, sentiment, category_id,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            input.text,
            input.stars,
            input.review_id,
            input.tone,
            input.sentiment,
            input.category_id,
            created_str,
            updated_str,
          ],
        )?;
        let id = tx.last_insert_rowid();
        let raw = tx.query_row(
          &format!("SELECT {REVIEW_COLUMNS} FROM review WHERE id = ?1"),
          rusqlite::params![id],
          RawReview::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw
      .ok_or(Error::CategoryNotFound(category_id))?
      .into_review()
  }
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = Error;

  async fn category_stats(&self) -> Result<Vec<CategoryStats>> {
    let raws: Vec<RawCategoryStats> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             c.id, c.name, c.description,
             COUNT(r.id)   AS total_reviews,
             AVG(r.stars)  AS average_stars
           FROM category c
           LEFT JOIN review r ON r.category_id = c.id
           GROUP BY c.id
           ORDER BY c.id",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawCategoryStats {
              id:            row.get(0)?,
              name:          row.get(1)?,
              description:   row.get(2)?,
              total_reviews: row.get(3)?,
              average_stars: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawCategoryStats::into_stats).collect())
  }

  async fn reviews_for_category(&self, category_id: i64) -> Result<Vec<Review>> {
    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVIEW_COLUMNS} FROM review
           WHERE category_id = ?1
           ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![category_id], RawReview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }

  async fn get_review(&self, id: i64) -> Result<Option<Review>> {
    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REVIEW_COLUMNS} FROM review WHERE id = ?1"),
              rusqlite::params![id],
              RawReview::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReview::into_review).transpose()
  }

  async fn fill_classification(
    &self,
    id: i64,
    classification: Classification,
  ) -> Result<Review> {
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Conditional write: a concurrent resolver that already completed
        // this review wins, and its labels are returned below.
        tx.execute(
          "UPDATE review
           SET tone = ?1, sentiment = ?2, updated_at = ?3
           WHERE id = ?4
             AND (tone IS NULL OR tone = '' OR sentiment IS NULL OR sentiment = '')",
          rusqlite::params![
            classification.tone,
            classification.sentiment,
            at_str,
            id,
          ],
        )?;
        let raw = tx
          .query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM review WHERE id = ?1"),
            rusqlite::params![id],
            RawReview::from_row,
          )
          .optional()?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.ok_or(Error::ReviewNotFound(id))?.into_review()
  }
}

// ─── AccessLogStore impl ─────────────────────────────────────────────────────

impl AccessLogStore for SqliteStore {
  type Error = Error;

  async fn append_access_log(&self, text: String) -> Result<AccessLog> {
    let at_str     = encode_dt(Utc::now());
    let created_at = decode_dt(&at_str)?;

    let t = text.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO access_log (text, created_at) VALUES (?1, ?2)",
          rusqlite::params![t, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(AccessLog { id, text, created_at })
  }

  async fn list_access_log(&self) -> Result<Vec<AccessLog>> {
    let raws: Vec<RawAccessLog> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, text, created_at FROM access_log ORDER BY id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAccessLog {
              id:         row.get(0)?,
              text:       row.get(1)?,
              created_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccessLog::into_access_log).collect()
  }
}
