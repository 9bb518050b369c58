//! Geocoding module
//!
//! Turns a free-text place name into a [`NamedLocation`].

pub mod nominatim;

use crate::coord::NamedLocation;
use crate::error::{Error, Result};

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to coordinates
    ///
    /// Returns the best match for the query, or None if not found
    fn geocode(&self, query: &str) -> impl std::future::Future<Output = Result<Option<NamedLocation>>> + Send;
}

/// Look up a place by name
///
/// Only the first match is used. Fails with `Error::NotFound` when the
/// backend has no match and `Error::InvalidRequest` for a blank query.
pub async fn lookup<G: GeoBackend>(geocoder: &G, query: &str) -> Result<NamedLocation> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::InvalidRequest("Search query is empty".to_string()));
    }

    geocoder
        .geocode(query)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No location found for '{}'", query)))
}
