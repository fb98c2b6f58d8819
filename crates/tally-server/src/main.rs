//! tally server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! review store, starts the access-log worker, and serves the JSON API over
//! HTTP until interrupted.
//!
//! The classifier key may come from `classifier.api_key` in the config file,
//! `TALLY_CLASSIFIER__API_KEY`, or `GEMINI_KEY` (highest precedence). A `.env`
//! file in the working directory, if present, is loaded into the environment
//! first; variables already set in the process win.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tally_api::AppState;
use tally_classifier::GeminiClassifier;
use tally_server::{expand_tilde, load_config, load_env_file};
use tally_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tally review trends server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// API key for the classifier; overrides the configured key.
  #[arg(long, env = "GEMINI_KEY", hide_env_values = true)]
  gemini_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let dotenv = load_env_file(Path::new(".env"));

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  match dotenv {
    Ok(true) => tracing::debug!("loaded .env"),
    Ok(false) => {}
    Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
  }

  let cli = Cli::parse();

  let mut server_cfg = load_config(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  if let Some(key) = cli.gemini_key {
    server_cfg.classifier.api_key = key;
  }
  if server_cfg.classifier.api_key.is_empty() {
    tracing::warn!("no classifier API key configured; unlabelled reviews will stay unlabelled");
  }

  let database_path = expand_tilde(&server_cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;
  let store = Arc::new(store);

  let classifier = GeminiClassifier::new(server_cfg.classifier.clone())
    .context("failed to build classifier client")?;

  let (audit, audit_worker) = tally_api::audit::spawn(Arc::clone(&store));

  let app = tally_server::router(AppState {
    store,
    classifier: Arc::new(classifier),
    audit,
  });
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  // The router (and with it every audit handle) is gone; let the worker
  // flush what is left in its queue.
  audit_worker.await.context("audit worker panicked")?;
  tracing::info!("Shut down cleanly");

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
  tracing::info!("Shutdown requested");
}
