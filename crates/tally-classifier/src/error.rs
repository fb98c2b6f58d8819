//! Error type for `tally-classifier`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("classifier returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("classifier returned no text")]
  EmptyReply,

  #[error("unusable classifier reply: {0}")]
  Reply(#[from] tally_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
