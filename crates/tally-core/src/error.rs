//! Error types for `tally-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("classifier reply is not a JSON object: {0}")]
  MalformedReply(#[from] serde_json::Error),

  #[error("classifier reply is missing a usable {0:?} field")]
  MissingLabel(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
