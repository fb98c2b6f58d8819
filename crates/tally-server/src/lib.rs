//! Process wiring for the Tally server: configuration loading and the
//! top-level router.

use std::path::{Path, PathBuf};

use axum::Router;
use serde::Deserialize;
use tally_api::AppState;
use tally_classifier::GeminiConfig;
use tally_core::{classification::Classifier, store::ReviewStore};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TALLY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
  pub classifier:    GeminiConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "0.0.0.0".to_string(),
      port:          8080,
      database_path: PathBuf::from("database.db"),
      classifier:    GeminiConfig::default(),
    }
  }
}

/// Load configuration from an optional TOML file, overlaid with environment
/// variables such as `TALLY_PORT` or `TALLY_CLASSIFIER__MODEL`.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("TALLY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()?
    .try_deserialize()
}

/// Load a `.env`-style file into the process environment. Variables that are
/// already set keep their values. Returns `Ok(false)` if the file is absent.
pub fn load_env_file(path: &Path) -> Result<bool, dotenvy::Error> {
  match dotenvy::from_path(path) {
    Ok(()) => Ok(true),
    Err(e) if e.not_found() => Ok(false),
    Err(e) => Err(e),
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router with per-request tracing spans.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: ReviewStore + 'static,
  C: Classifier + 'static,
{
  tally_api::api_router(state).layer(TraceLayer::new_for_http())
}
