//! Test doubles shared by the handler, enrichment and audit tests.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use tally_core::{
  access_log::AccessLog,
  classification::{Classification, ClassificationRequest, Classifier},
  review::Review,
  store::{AccessLogStore, ReviewStore},
  trend::CategoryStats,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("backend unavailable")]
pub struct Unavailable;

/// Classifier returning a fixed answer (or failing) and recording each call.
pub struct FakeClassifier {
  reply:        Option<Classification>,
  pub requests: Mutex<Vec<ClassificationRequest>>,
}

impl FakeClassifier {
  pub fn answering(tone: &str, sentiment: &str) -> Self {
    Self {
      reply:    Some(Classification {
        tone:      tone.into(),
        sentiment: sentiment.into(),
      }),
      requests: Mutex::new(Vec::new()),
    }
  }

  pub fn failing() -> Self {
    Self { reply: None, requests: Mutex::new(Vec::new()) }
  }

  pub fn calls(&self) -> usize { self.requests.lock().unwrap().len() }
}

impl Classifier for FakeClassifier {
  type Error = Unavailable;

  async fn classify(
    &self,
    request: &ClassificationRequest,
  ) -> Result<Classification, Unavailable> {
    self.requests.lock().unwrap().push(request.clone());
    self.reply.clone().ok_or(Unavailable)
  }
}

/// Access log whose every write fails.
#[derive(Default)]
pub struct FailingAccessLog {
  pub attempts: AtomicUsize,
}

impl AccessLogStore for FailingAccessLog {
  type Error = Unavailable;

  async fn append_access_log(&self, _text: String) -> Result<AccessLog, Unavailable> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    Err(Unavailable)
  }

  async fn list_access_log(&self) -> Result<Vec<AccessLog>, Unavailable> {
    Err(Unavailable)
  }
}

/// Review store whose every call fails.
pub struct FailingStore;

impl ReviewStore for FailingStore {
  type Error = Unavailable;

  async fn category_stats(&self) -> Result<Vec<CategoryStats>, Unavailable> {
    Err(Unavailable)
  }

  async fn reviews_for_category(&self, _: i64) -> Result<Vec<Review>, Unavailable> {
    Err(Unavailable)
  }

  async fn get_review(&self, _: i64) -> Result<Option<Review>, Unavailable> {
    Err(Unavailable)
  }

  async fn fill_classification(
    &self,
    _: i64,
    _: Classification,
  ) -> Result<Review, Unavailable> {
    Err(Unavailable)
  }
}
