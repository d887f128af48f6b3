//! Fact-generation client producing short "fun facts" about a birth moment.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Lookup;

/// Delimiter the text-generation service is asked to put between facts.
pub const FACT_DELIMITER: char = '|';

/// A usable answer carries between MIN_FACTS and MAX_FACTS segments.
const MIN_FACTS: usize = 2;
const MAX_FACTS: usize = 3;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Client for the text-generation service. The service is a black box
/// returning free text; we only split it on the delimiter.
#[derive(Debug, Clone)]
pub struct FactsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FactsClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Generate 2-3 short facts for a birth moment.
    pub async fn generate(
        &self,
        name: &str,
        dob: NaiveDate,
        tob: &str,
        pob: Option<&str>,
    ) -> Lookup<Vec<String>> {
        let place = pob.unwrap_or("an unknown place");
        let prompt = format!(
            "Give {} short fun facts about {}'s birth moment: born on {} at {} in {}. \
             Separate the facts with '{}'.",
            MAX_FACTS, name, dob, tob, place, FACT_DELIMITER
        );

        let url = format!("{}/generate", self.base_url);
        let mut request = self.http.post(&url).json(&GenerateRequest { prompt: &prompt });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Fact generation request failed: {}", e);
                return Lookup::Unavailable;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Fact generation returned status {}", response.status());
            return Lookup::Unavailable;
        }

        let body: GenerateResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Fact generation response unreadable: {}", e);
                return Lookup::Unavailable;
            }
        };

        match parse_facts(&body.text) {
            Some(facts) => Lookup::Hit(facts),
            None => Lookup::Miss,
        }
    }
}

/// Split generated text on the delimiter, discarding blank segments.
///
/// Fewer than two usable segments means the service did not really answer;
/// that counts as a miss so the caller falls back to its placeholder.
fn parse_facts(text: &str) -> Option<Vec<String>> {
    let facts: Vec<String> = text
        .split(FACT_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .take(MAX_FACTS)
        .collect();

    if facts.len() < MIN_FACTS {
        None
    } else {
        Some(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_facts() {
        let facts = parse_facts("one| two |three").unwrap();
        assert_eq!(facts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_parse_facts_discards_blank_segments() {
        let facts = parse_facts("one||  |two|").unwrap();
        assert_eq!(facts, vec!["one", "two"]);
    }

    #[test]
    fn test_parse_facts_caps_at_three() {
        let facts = parse_facts("a|b|c|d|e").unwrap();
        assert_eq!(facts.len(), 3);
    }

    #[test]
    fn test_parse_facts_single_segment_is_no_answer() {
        assert!(parse_facts("just one rambling paragraph with no delimiter").is_none());
        assert!(parse_facts("only||").is_none());
    }

    #[test]
    fn test_parse_facts_empty_text() {
        assert!(parse_facts("").is_none());
        assert!(parse_facts("   ").is_none());
    }
}
