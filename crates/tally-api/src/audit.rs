//! Fire-and-forget access auditing.
//!
//! Handlers hand a short description of each access to an [`AuditLogger`].
//! The handle only enqueues; a background worker drains the queue and appends
//! each entry through an [`AccessLogStore`]. Failures in the worker are
//! logged and dropped, and never reach the request that produced the entry.

use std::sync::Arc;

use tally_core::store::AccessLogStore;
use tokio::{sync::mpsc, task::JoinHandle};

/// Producer side of the audit queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AuditLogger {
  tx: mpsc::UnboundedSender<String>,
}

impl AuditLogger {
  /// Create a logger and the receiver a worker should drain.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }

  /// Enqueue `text` for durable append. Never waits on the write.
  pub fn schedule(&self, text: impl Into<String>) {
    if let Err(e) = self.tx.send(text.into()) {
      tracing::warn!(entry = %e.0, "audit worker is gone; dropping entry");
    }
  }
}

/// Start a worker on the current tokio runtime.
///
/// The worker exits once every [`AuditLogger`] clone has been dropped and the
/// queue is empty; await the handle to flush pending entries on shutdown.
pub fn spawn<L>(store: Arc<L>) -> (AuditLogger, JoinHandle<()>)
where
  L: AccessLogStore + 'static,
{
  let (logger, rx) = AuditLogger::channel();
  let handle = tokio::spawn(run_worker(store, rx));
  (logger, handle)
}

/// Drain `rx`, appending each entry to `store` in arrival order.
pub async fn run_worker<L>(store: Arc<L>, mut rx: mpsc::UnboundedReceiver<String>)
where
  L: AccessLogStore + 'static,
{
  while let Some(text) = rx.recv().await {
    // Each write runs in its own task so a panicking backend is contained.
    let store = Arc::clone(&store);
    let write = tokio::spawn(async move {
      let result = store.append_access_log(text.clone()).await;
      (text, result)
    });

    match write.await {
      Ok((_, Ok(entry))) => {
        tracing::debug!(id = entry.id, text = %entry.text, "access logged");
      }
      Ok((text, Err(e))) => {
        tracing::error!(error = %e, entry = %text, "failed to write access log");
      }
      Err(e) => {
        tracing::error!(error = %e, "access log write aborted");
      }
    }
  }
  tracing::debug!("audit worker stopped");
}
