//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every unrecovered failure is rendered as
//! `{"error_kind": "...", "message": "..."}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::enrich::EnrichError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// Raised by the strict [`enrich::resolve`](crate::enrich::resolve); the
  /// listing handler degrades instead, so no route currently yields it.
  #[error("classifier error: {0}")]
  Classifier(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<EnrichError> for ApiError {
  fn from(e: EnrichError) -> Self {
    match e {
      EnrichError::Store(e) => ApiError::Store(e),
      EnrichError::Classifier(e) => ApiError::Classifier(e),
    }
  }
}

impl ApiError {
  /// Stable machine-readable discriminant for the error body.
  pub fn kind(&self) -> &'static str {
    match self {
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Store(_) => "store",
      ApiError::Classifier(_) => "classifier",
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed on storage access");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
      ApiError::Classifier(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
    };
    (status, Json(json!({ "error_kind": self.kind(), "message": message })))
      .into_response()
  }
}
