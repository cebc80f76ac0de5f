use std::time::Duration;

use tracing::debug;

use super::{parse_suggestions, SuggestError, Suggestion, SuggestionRequest, SuggestionSource};

/// Environment variable holding the suggestion endpoint URL.
pub const ENDPOINT_ENV: &str = "STRUMKIT_SUGGEST_URL";

/// Suggestions are a nicety; never wait long for them.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts a `SuggestionRequest` as JSON to an HTTP endpoint.
pub struct HttpSuggestionSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl HttpSuggestionSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            endpoint: endpoint.into(),
        }
    }

    /// Endpoint from `STRUMKIT_SUGGEST_URL`.
    pub fn from_env() -> Result<Self, SuggestError> {
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => Ok(Self::new(url.trim())),
            _ => Err(SuggestError::NotConfigured),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SuggestionSource for HttpSuggestionSource {
    fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, SuggestError> {
        debug!(endpoint = %self.endpoint, chord = %request.chord_symbol, "requesting suggestions");
        let body = self
            .agent
            .post(&self.endpoint)
            .send_json(request)
            .map_err(Box::new)?
            .into_string()?;
        parse_suggestions(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::suggestions_or_empty;

    /// Answers every request with a fixed reply body, as the endpoint would.
    struct CannedReply(&'static str);

    impl SuggestionSource for CannedReply {
        fn suggest(&self, _: &SuggestionRequest) -> Result<Vec<Suggestion>, SuggestError> {
            parse_suggestions(self.0)
        }
    }

    #[test]
    fn construction_does_no_io() {
        let source = HttpSuggestionSource::with_timeout("http://127.0.0.1:9/", Duration::from_millis(250));
        assert_eq!(source.endpoint(), "http://127.0.0.1:9/");
        assert_eq!(HttpSuggestionSource::new("http://x/").endpoint(), "http://x/");
    }

    #[test]
    fn garbled_reply_is_a_json_error_and_degrades_to_empty() {
        let request = SuggestionRequest::new("C", "C major");
        let garbled = CannedReply("<html>502 Bad Gateway</html>");

        assert!(matches!(garbled.suggest(&request), Err(SuggestError::Json(_))));
        assert!(suggestions_or_empty(&garbled, &request).is_empty());
    }

    #[test]
    fn well_formed_reply_passes_through() {
        let request = SuggestionRequest::new("G7", "C major");
        let source = CannedReply(r#"{"suggestions":[{"chordName":"Cmaj7","romanNumeral":"I"}]}"#);

        let suggestions = suggestions_or_empty(&source, &request);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].chord_symbol, "Cmaj7");
    }
}
