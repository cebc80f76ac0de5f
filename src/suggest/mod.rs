//! Next-chord suggestions from an external theory service.
//!
//! The service is optional. Every failure (no endpoint configured, timeout,
//! HTTP error, malformed reply) is logged and reported as "no suggestions".

mod client;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub use client::{HttpSuggestionSource, DEFAULT_TIMEOUT, ENDPOINT_ENV};

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("Suggestion request failed: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("Malformed suggestion reply: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read suggestion reply: {0}")]
    Io(#[from] std::io::Error),
    #[error("No suggestion endpoint configured (set STRUMKIT_SUGGEST_URL)")]
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub chord_symbol: String,
    pub key_name: String,
    /// Where the chord sits, e.g. the chart column it was picked from.
    #[serde(default)]
    pub surrounding_context: String,
    #[serde(default = "default_language")]
    pub language_tag: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl SuggestionRequest {
    pub fn new(chord_symbol: impl Into<String>, key_name: impl Into<String>) -> Self {
        Self {
            chord_symbol: chord_symbol.into(),
            key_name: key_name.into(),
            surrounding_context: String::new(),
            language_tag: default_language(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.surrounding_context = context.into();
        self
    }

    pub fn with_language(mut self, tag: impl Into<String>) -> Self {
        self.language_tag = tag.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(alias = "chordName")]
    pub chord_symbol: String,
    #[serde(default)]
    pub roman_numeral: String,
    #[serde(default)]
    pub explanation: String,
    /// Style tag such as "Standard", "Jazz" or "Creative".
    #[serde(default, alias = "confidence")]
    pub confidence_tag: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionReply {
    Bare(Vec<Suggestion>),
    Wrapped { suggestions: Vec<Suggestion> },
}

/// Parse a service reply: either a bare JSON array or `{"suggestions": [...]}`.
pub fn parse_suggestions(body: &str) -> Result<Vec<Suggestion>, SuggestError> {
    let reply = match serde_json::from_str(body)? {
        SuggestionReply::Bare(list) => list,
        SuggestionReply::Wrapped { suggestions } => suggestions,
    };
    Ok(reply)
}

/// Anything that can produce ranked chord suggestions.
pub trait SuggestionSource {
    fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, SuggestError>;
}

/// Ask `source`, degrading any failure to an empty list.
pub fn suggestions_or_empty<S: SuggestionSource + ?Sized>(
    source: &S,
    request: &SuggestionRequest,
) -> Vec<Suggestion> {
    match source.suggest(request) {
        Ok(list) => list,
        Err(err) => {
            warn!(%err, chord = %request.chord_symbol, "no suggestions");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl SuggestionSource for Failing {
        fn suggest(&self, _: &SuggestionRequest) -> Result<Vec<Suggestion>, SuggestError> {
            Err(SuggestError::NotConfigured)
        }
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = SuggestionRequest::new("G7", "C major").with_context("Dominant");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["chordSymbol"], "G7");
        assert_eq!(json["keyName"], "C major");
        assert_eq!(json["surroundingContext"], "Dominant");
        assert_eq!(json["languageTag"], "en");
    }

    #[test]
    fn parses_bare_and_wrapped_replies() {
        let bare = r#"[{"chordSymbol":"Cmaj7","romanNumeral":"I",
            "explanation":"home","confidenceTag":"Standard"}]"#;
        let wrapped = r#"{"suggestions":[
            {"chordName":"Db7","romanNumeral":"bII7","confidence":"Jazz"}]}"#;

        let bare = parse_suggestions(bare).unwrap();
        assert_eq!(bare[0].chord_symbol, "Cmaj7");
        assert_eq!(bare[0].confidence_tag, "Standard");

        let wrapped = parse_suggestions(wrapped).unwrap();
        assert_eq!(wrapped[0].chord_symbol, "Db7");
        assert_eq!(wrapped[0].confidence_tag, "Jazz");
        assert!(wrapped[0].explanation.is_empty());
    }

    #[test]
    fn malformed_reply_is_an_error() {
        assert!(matches!(parse_suggestions("not json"), Err(SuggestError::Json(_))));
        assert!(matches!(parse_suggestions(r#"{"oops":1}"#), Err(SuggestError::Json(_))));
    }

    #[test]
    fn failures_degrade_to_empty() {
        let request = SuggestionRequest::new("C", "C major");
        assert!(suggestions_or_empty(&Failing, &request).is_empty());
    }
}
