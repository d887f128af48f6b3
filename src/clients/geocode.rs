//! Geocoding client resolving free-text place names to coordinates.

use std::time::Duration;

use serde::Deserialize;

use super::Lookup;

/// Response shape of the geocoding service.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeHit>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    latitude: f64,
    longitude: f64,
}

/// Client for the geocoding service. First match wins; no caching, no retry.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a place name to (latitude, longitude).
    pub async fn lookup(&self, place: &str) -> Lookup<(f64, f64)> {
        let url = format!("{}/search", self.base_url);

        let response = match self
            .http
            .get(&url)
            .query(&[("name", place), ("count", "1")])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Geocoding request failed: {}", e);
                return Lookup::Unavailable;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Geocoding returned status {}", response.status());
            return Lookup::Unavailable;
        }

        let body: GeocodeResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Geocoding response unreadable: {}", e);
                return Lookup::Unavailable;
            }
        };

        match body.results.first() {
            Some(hit) => Lookup::Hit((hit.latitude, hit.longitude)),
            None => Lookup::Miss,
        }
    }
}
