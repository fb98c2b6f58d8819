//! Handlers for `/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reviews/trends` | Top categories by average stars |
//! | `GET`  | `/reviews/` | `?category_id` required; missing labels are filled on read |

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{
  classification::Classifier,
  review::Review,
  store::ReviewStore,
  trend::{self, CategoryTrend, TREND_LIMIT},
};

use crate::{AppState, enrich, error::ApiError};

// ─── Trends ───────────────────────────────────────────────────────────────────

/// `GET /reviews/trends`
pub async fn trends<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Json<Vec<CategoryTrend>>, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  let stats = state
    .store
    .category_stats()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let trends = trend::rank(stats, TREND_LIMIT);

  state.audit.schedule("GET /reviews/trends");
  Ok(Json(trends))
}

// ─── List by category ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category_id: i64,
}

/// Public shape of a review; `updated_at` is internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
  pub id:          i64,
  pub text:        Option<String>,
  pub stars:       i64,
  pub review_id:   String,
  pub created_at:  DateTime<Utc>,
  /// `None` only when the classifier could not be reached or understood.
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub category_id: i64,
}

impl From<Review> for ReviewResponse {
  fn from(r: Review) -> Self {
    ReviewResponse {
      id:          r.id,
      text:        r.text,
      stars:       r.stars,
      review_id:   r.review_id,
      created_at:  r.created_at,
      tone:        r.tone,
      sentiment:   r.sentiment,
      category_id: r.category_id,
    }
  }
}

/// `GET /reviews/?category_id=<id>`, newest first. An unknown category is an
/// empty list, not an error.
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError>
where
  S: ReviewStore,
  C: Classifier,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let reviews = state
    .store
    .reviews_for_category(params.category_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut out = Vec::with_capacity(reviews.len());
  for review in reviews {
    let review = enrich::resolve_or_keep(&*state.store, &*state.classifier, review)
      .await?;
    out.push(ReviewResponse::from(review));
  }

  state
    .audit
    .schedule(format!("GET /reviews/?category_id={}", params.category_id));
  Ok(Json(out))
}
