//! Lazy tone/sentiment enrichment on read.
//!
//! A review whose labels are already stored is returned as-is. Otherwise the
//! classifier is asked once and the answer is written back before the review
//! is returned. The write-back is conditional (see
//! [`ReviewStore::fill_classification`]), so two concurrent resolutions of the
//! same review may both call the classifier but only the first answer sticks.

use tally_core::{classification::Classifier, review::Review, store::ReviewStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
  #[error("classifier error: {0}")]
  Classifier(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Return `review` with both labels filled, consulting `classifier` only when
/// at least one is missing.
pub async fn resolve<S, C>(
  store: &S,
  classifier: &C,
  review: Review,
) -> Result<Review, EnrichError>
where
  S: ReviewStore,
  C: Classifier,
{
  if review.classification().is_some() {
    return Ok(review);
  }

  tracing::debug!(review = review.id, "labels missing; asking classifier");
  let classification = classifier
    .classify(&review.classification_request())
    .await
    .map_err(|e| EnrichError::Classifier(Box::new(e)))?;

  store
    .fill_classification(review.id, classification)
    .await
    .map_err(|e| EnrichError::Store(Box::new(e)))
}

/// Like [`resolve`], but a classifier failure leaves the review unlabelled
/// instead of failing. Storage failures still propagate.
pub async fn resolve_or_keep<S, C>(
  store: &S,
  classifier: &C,
  review: Review,
) -> Result<Review, EnrichError>
where
  S: ReviewStore,
  C: Classifier,
{
  let id = review.id;
  let fallback = review.clone();
  match resolve(store, classifier, review).await {
    Err(EnrichError::Classifier(e)) => {
      tracing::warn!(review = id, error = %e, "classification failed; returning review unlabelled");
      Ok(fallback)
    }
    other => other,
  }
}
