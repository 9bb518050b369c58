//! Server shared state
//!
//! Holds configuration and the outbound clients built from it.

use crate::analysis::AnalysisService;
use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimBackend;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    /// Geocoder behind `/api/geocode`
    pub geocoder: NominatimBackend,

    /// Analysis pipeline behind `/api/analyze`
    pub analysis: AnalysisService,

    started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    ///
    /// Reads the AI credential once; a missing key leaves analysis
    /// unconfigured rather than failing startup.
    pub fn new(config: Config) -> Result<Self> {
        let geocoder = NominatimBackend::from_config(&config.geocoder)?;
        let analysis = AnalysisService::from_config(&config)?;
        Ok(Self::with_parts(config, geocoder, analysis))
    }

    /// Assemble state from already-built clients
    pub fn with_parts(config: Config, geocoder: NominatimBackend, analysis: AnalysisService) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            geocoder,
            analysis,
            started_at: Utc::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}
