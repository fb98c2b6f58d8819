//! JSON REST API for Tally.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tally_core::store::ReviewStore`] and
//! [`tally_core::classification::Classifier`]. Every successful request
//! schedules one access-log entry on the [`audit::AuditLogger`]; tracing,
//! TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let (audit, worker) = tally_api::audit::spawn(store.clone());
//! let app = tally_api::api_router(AppState { store, classifier, audit });
//! ```

pub mod audit;
pub mod enrich;
pub mod error;
pub mod reviews;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{Router, routing::get};
use tally_core::{classification::Classifier, store::ReviewStore};

pub use audit::AuditLogger;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, C> {
  pub store:      Arc<S>,
  pub classifier: Arc<C>,
  pub audit:      AuditLogger,
}

impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      classifier: Arc::clone(&self.classifier),
      audit:      self.audit.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(state: AppState<S, C>) -> Router<()>
where
  S: ReviewStore + 'static,
  C: Classifier + 'static,
{
  Router::new()
    .route("/reviews/trends", get(reviews::trends::<S, C>))
    .route("/reviews/", get(reviews::list::<S, C>))
    .route("/reviews", get(reviews::list::<S, C>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
