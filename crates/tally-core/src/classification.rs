//! Tone/sentiment classification: the request sent to an external classifier,
//! the reply format it must honour, and the [`Classifier`] trait.
//!
//! Classifiers are language models, so replies often arrive wrapped in a
//! Markdown code fence. [`parse_reply`] strips that wrapper and then insists
//! on a JSON object with both labels; it never invents a default.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// JSON key carrying the tone label in a classifier reply.
pub const TONE_KEY: &str = "Review Tone";
/// JSON key carrying the sentiment label in a classifier reply.
pub const SENTIMENT_KEY: &str = "Review Sentiment";

/// A resolved pair of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
  pub tone:      String,
  pub sentiment: String,
}

/// Input to [`Classifier::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
  pub text:      Option<String>,
  pub stars:     i64,
  /// Already-known labels; the classifier only needs to fill the gaps.
  pub tone:      Option<String>,
  pub sentiment: Option<String>,
}

impl ClassificationRequest {
  /// Render the natural-language prompt sent to a text-generation model.
  pub fn prompt(&self) -> String {
    fn or_none(v: &Option<String>) -> &str { v.as_deref().unwrap_or("None") }

    format!(
      "Below are the review details. Fill out the missing values (null values \
       in Review Tone or Review Sentiment):\n\
       Review Description : {text}\n\
       Review Stars : {stars}\n\
       {TONE_KEY} : {tone}\n\
       {SENTIMENT_KEY} : {sentiment}\n\
       Reply with only a JSON object holding \"{TONE_KEY}\" and \"{SENTIMENT_KEY}\".",
      text = or_none(&self.text),
      stars = self.stars,
      tone = or_none(&self.tone),
      sentiment = or_none(&self.sentiment),
    )
  }
}

#[derive(Deserialize)]
struct Reply {
  #[serde(rename = "Review Tone")]
  tone:      Option<String>,
  #[serde(rename = "Review Sentiment")]
  sentiment: Option<String>,
}

/// Remove a surrounding Markdown code fence (with or without a `json`
/// language tag) from a model reply.
pub fn strip_fence(raw: &str) -> &str {
  let mut s = raw.trim();
  if let Some(rest) = s.strip_prefix("```") {
    s = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    s = s.strip_suffix("```").unwrap_or(s);
  }
  s.trim()
}

/// Parse a raw classifier reply into a [`Classification`].
pub fn parse_reply(raw: &str) -> Result<Classification> {
  let reply: Reply = serde_json::from_str(strip_fence(raw))?;

  let non_empty = |v: Option<String>, key| {
    v.map(|s| s.trim().to_owned())
      .filter(|s| !s.is_empty())
      .ok_or(Error::MissingLabel(key))
  };

  Ok(Classification {
    tone:      non_empty(reply.tone, TONE_KEY)?,
    sentiment: non_empty(reply.sentiment, SENTIMENT_KEY)?,
  })
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// An external text classifier that derives tone and sentiment labels.
///
/// Implementations are expected to bound their own latency (e.g. an HTTP
/// timeout); callers await the returned future to completion.
pub trait Classifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn classify<'a>(
    &'a self,
    request: &'a ClassificationRequest,
  ) -> impl Future<Output = Result<Classification, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_bare_json() {
    let c = parse_reply(r#"{"Review Tone": "Frustrated", "Review Sentiment": "Negative"}"#)
      .unwrap();
    assert_eq!(c.tone, "Frustrated");
    assert_eq!(c.sentiment, "Negative");
  }

  #[test]
  fn parses_fenced_json() {
    let raw = "```json\n{\n  \"Review Tone\": \"Calm\",\n  \"Review Sentiment\": \"Neutral\"\n}\n```\n";
    let c = parse_reply(raw).unwrap();
    assert_eq!(c.tone, "Calm");
    assert_eq!(c.sentiment, "Neutral");
  }

  #[test]
  fn label_text_containing_json_survives() {
    // Only the fence tag is stripped, not every occurrence of the word.
    let raw = "```\n{\"Review Tone\": \"jsonic\", \"Review Sentiment\": \"Positive\"}\n```";
    assert_eq!(parse_reply(raw).unwrap().tone, "jsonic");
  }

  #[test]
  fn non_json_is_malformed() {
    let err = parse_reply("The tone is happy.").unwrap_err();
    assert!(matches!(err, Error::MalformedReply(_)));
  }

  #[test]
  fn unterminated_fence_is_malformed() {
    let err = parse_reply("```json\n{\"Review Tone\": ").unwrap_err();
    assert!(matches!(err, Error::MalformedReply(_)));
  }

  #[test]
  fn missing_field_is_reported() {
    let err = parse_reply(r#"{"Review Tone": "Calm"}"#).unwrap_err();
    assert!(matches!(err, Error::MissingLabel(SENTIMENT_KEY)));
  }

  #[test]
  fn null_or_blank_field_is_reported() {
    let err = parse_reply(r#"{"Review Tone": null, "Review Sentiment": "Positive"}"#)
      .unwrap_err();
    assert!(matches!(err, Error::MissingLabel(TONE_KEY)));

    let err = parse_reply(r#"{"Review Tone": "Calm", "Review Sentiment": "  "}"#)
      .unwrap_err();
    assert!(matches!(err, Error::MissingLabel(SENTIMENT_KEY)));
  }

  #[test]
  fn prompt_mentions_known_and_missing_values() {
    let req = ClassificationRequest {
      text:      Some("Great value".into()),
      stars:     5,
      tone:      Some("Enthusiastic".into()),
      sentiment: None,
    };
    let p = req.prompt();
    assert!(p.contains("Review Description : Great value"));
    assert!(p.contains("Review Stars : 5"));
    assert!(p.contains("Review Tone : Enthusiastic"));
    assert!(p.contains("Review Sentiment : None"));
  }
}
