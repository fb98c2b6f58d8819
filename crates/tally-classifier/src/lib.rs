//! Tone/sentiment classifier backed by the Gemini `generateContent` API.
//!
//! [`GeminiClassifier`] implements [`tally_core::classification::Classifier`].
//! It is constructed once from a [`GeminiConfig`] and shared; there is no
//! process-wide client state.

pub mod error;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tally_core::classification::{
  Classification, ClassificationRequest, Classifier, parse_reply,
};

pub use error::{Error, Result};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
  pub api_key:      String,
  pub base_url:     String,
  pub model:        String,
  /// Upper bound on a single classification call.
  pub timeout_secs: u64,
}

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key:      String::new(),
      base_url:     "https://generativelanguage.googleapis.com".to_string(),
      model:        "gemini-1.5-flash".to_string(),
      timeout_secs: 30,
    }
  }
}

// ─── Wire format ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
  contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
  parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
  text: Option<String>,
}

impl GenerateResponse {
  /// Concatenated text of the first candidate.
  fn into_text(self) -> Option<String> {
    let text: String = self
      .candidates
      .into_iter()
      .next()?
      .content?
      .parts
      .into_iter()
      .filter_map(|p| p.text)
      .collect();
    (!text.trim().is_empty()).then_some(text)
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// HTTP client for Gemini text generation.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GeminiClassifier {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClassifier {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }

  /// Send `prompt` and return the model's raw text reply.
  pub async fn generate(&self, prompt: &str) -> Result<String> {
    let body = GenerateRequest {
      contents: [Content { parts: [Part { text: prompt }] }],
    };

    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let parsed: GenerateResponse = resp.json().await?;
    parsed.into_text().ok_or(Error::EmptyReply)
  }
}

impl Classifier for GeminiClassifier {
  type Error = Error;

  async fn classify(&self, request: &ClassificationRequest) -> Result<Classification> {
    let raw = self.generate(&request.prompt()).await?;
    tracing::debug!(model = %self.config.model, reply = %raw, "classifier reply");
    Ok(parse_reply(&raw)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use httpmock::{Method::POST, MockServer};
  use serde_json::json;

  const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

  fn classifier(server: &MockServer) -> GeminiClassifier {
    GeminiClassifier::new(GeminiConfig {
      api_key: "test-key".into(),
      base_url: server.base_url(),
      ..GeminiConfig::default()
    })
    .unwrap()
  }

  fn request() -> ClassificationRequest {
    ClassificationRequest {
      text:      Some("Stopped working after a week".into()),
      stars:     1,
      tone:      None,
      sentiment: None,
    }
  }

  fn reply(text: &str) -> serde_json::Value {
    json!({
      "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
  }

  #[tokio::test]
  async fn classify_parses_fenced_reply() {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when
          .method(POST)
          .path(PATH)
          .header("x-goog-api-key", "test-key")
          .body_contains("Stopped working after a week");
        then.status(200).json_body(reply(
          "```json\n{\"Review Tone\": \"Frustrated\", \"Review Sentiment\": \"Negative\"}\n```",
        ));
      })
      .await;

    let c = classifier(&server).classify(&request()).await.unwrap();
    assert_eq!(c.tone, "Frustrated");
    assert_eq!(c.sentiment, "Negative");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn non_json_reply_is_an_error() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(reply("I think it is negative."));
      })
      .await;

    let err = classifier(&server).classify(&request()).await.unwrap_err();
    assert!(matches!(err, Error::Reply(tally_core::Error::MalformedReply(_))));
  }

  #[tokio::test]
  async fn error_status_is_reported() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path(PATH);
        then.status(403).body("API key not valid");
      })
      .await;

    let err = classifier(&server).classify(&request()).await.unwrap_err();
    match err {
      Error::Status { status, body } => {
        assert_eq!(status, 403);
        assert!(body.contains("API key"));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn empty_candidates_is_an_error() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({ "candidates": [] }));
      })
      .await;

    let err = classifier(&server).classify(&request()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyReply));
  }
}
