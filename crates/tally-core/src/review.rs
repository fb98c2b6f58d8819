//! Review: a single rated piece of feedback tied to a category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classification::{Classification, ClassificationRequest};

/// A review row as stored. Reviews are ingested elsewhere; this service only
/// reads them and fills in missing `tone`/`sentiment` labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub id:          i64,
  pub text:        Option<String>,
  pub stars:       i64,
  /// Identifier assigned by the upstream review source.
  pub review_id:   String,
  pub tone:        Option<String>,
  pub sentiment:   Option<String>,
  pub category_id: i64,
  pub created_at:  DateTime<Utc>,
  /// Bumped by the store whenever any field changes, including a lazily
  /// filled classification.
  pub updated_at:  DateTime<Utc>,
}

impl Review {
  /// The stored labels, if both are present and non-empty.
  pub fn classification(&self) -> Option<Classification> {
    match (&self.tone, &self.sentiment) {
      (Some(tone), Some(sentiment))
        if !tone.is_empty() && !sentiment.is_empty() =>
      {
        Some(Classification {
          tone:      tone.clone(),
          sentiment: sentiment.clone(),
        })
      }
      _ => None,
    }
  }

  /// Everything the classifier is told about this review, including any
  /// label that is already known.
  pub fn classification_request(&self) -> ClassificationRequest {
    ClassificationRequest {
      text:      self.text.clone(),
      stars:     self.stars,
      tone:      self.tone.clone(),
      sentiment: self.sentiment.clone(),
    }
  }
}
