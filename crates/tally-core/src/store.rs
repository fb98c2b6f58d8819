//! Storage traits consumed by the API layer.
//!
//! Implemented by storage backends (e.g. `tally-store-sqlite`). Handlers and
//! the audit worker depend on these abstractions, not on a concrete backend.

use std::future::Future;

use crate::{
  access_log::AccessLog,
  classification::Classification,
  review::Review,
  trend::CategoryStats,
};

/// Read access to categories and reviews, plus the single mutation this
/// service performs: filling in missing classification labels.
///
/// All methods return `Send` futures so the trait can be used behind `axum`
/// on a multi-threaded tokio runtime.
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every category with its review count and average star rating.
  /// Categories without reviews are included with a count of zero.
  fn category_stats(
    &self,
  ) -> impl Future<Output = Result<Vec<CategoryStats>, Self::Error>> + Send + '_;

  /// All reviews of a category, newest first. An unknown category yields an
  /// empty list.
  fn reviews_for_category(
    &self,
    category_id: i64,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Retrieve a review by id. Returns `None` if not found.
  fn get_review(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  /// Persist `classification` onto review `id` and return the stored row.
  ///
  /// The write only happens while the review is still missing a label, and
  /// bumps `updated_at`. If another writer completed the review first, its
  /// labels are kept and returned.
  fn fill_classification(
    &self,
    id: i64,
    classification: Classification,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;
}

/// Append-only access log.
pub trait AccessLogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new entry stamped with the current time.
  fn append_access_log(
    &self,
    text: String,
  ) -> impl Future<Output = Result<AccessLog, Self::Error>> + Send + '_;

  /// All entries, oldest first.
  fn list_access_log(
    &self,
  ) -> impl Future<Output = Result<Vec<AccessLog>, Self::Error>> + Send + '_;
}
