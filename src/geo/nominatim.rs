//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Rate limit: 1 request per second, and a descriptive User-Agent is required.

use crate::config::GeocoderConfig;
use crate::coord::{Coordinates, NamedLocation};
use crate::error::{Error, Result};
use crate::geo::GeoBackend;
use crate::retry::{with_retry, RetryPolicy};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimBackend {
    /// Create a backend against `base_url`
    pub fn new(base_url: impl Into<String>, user_agent: &str, policy: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        })
    }

    /// Create a backend from the `[geocoder]` config section
    pub fn from_config(config: &GeocoderConfig) -> Result<Self> {
        Self::new(
            config.base_url.as_str(),
            &config.user_agent,
            RetryPolicy::from_settings(config.timeout_secs, config.retries, config.backoff_ms),
        )
    }

    /// Parse lat/lng strings to coordinates
    fn parse_coords(lat: &str, lng: &str) -> Result<Coordinates> {
        let lat: f64 = lat.trim().parse().map_err(|_| {
            Error::MalformedResponse(format!("Invalid latitude: {}", lat))
        })?;
        let lng: f64 = lng.trim().parse().map_err(|_| {
            Error::MalformedResponse(format!("Invalid longitude: {}", lng))
        })?;
        Ok(Coordinates::new(lat, lng))
    }

    /// One search request, no retry
    async fn search_once(&self, url: &str) -> Result<Vec<NominatimResult>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Nominatim request failed: {}", e)))?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::Network(format!("Nominatim returned status: {}", status)));
        }
        if !status.is_success() {
            return Err(Error::Upstream(format!("Nominatim returned status: {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("Failed to parse Nominatim response: {}", e)))
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode(&self, query: &str) -> Result<Option<NamedLocation>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        );
        debug!("Geocoding '{}'", query);

        let results = with_retry(&self.policy, "Nominatim search", || self.search_once(&url)).await?;

        match results.into_iter().next() {
            Some(result) => {
                let coords = Self::parse_coords(&result.lat, &result.lon)?;
                debug!("Geocoded '{}' to {} ({:.6}, {:.6})", query, result.display_name, coords.lat, coords.lng);
                Ok(Some(NamedLocation::new(coords, result.display_name)))
            }
            None => Ok(None),
        }
    }
}
