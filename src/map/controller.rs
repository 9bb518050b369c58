//! Drives a [`MapState`] from a geocoder and an analysis service

use crate::analysis::{AnalysisCategory, AnalysisResult, AnalysisService};
use crate::coord::NamedLocation;
use crate::error::Result;
use crate::geo::{lookup, GeoBackend};
use crate::map::MapState;
use tracing::warn;

/// One exploration session
pub struct MapController<G: GeoBackend> {
    state: MapState,
    geocoder: G,
    service: AnalysisService,
}

impl<G: GeoBackend> MapController<G> {
    pub fn new(geocoder: G, service: AnalysisService, initial: NamedLocation) -> Self {
        Self {
            state: MapState::new(initial),
            geocoder,
            service,
        }
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }

    /// Geocode `query` and move the map there
    ///
    /// On failure the state keeps its location and markers and carries an
    /// inline notice; the error is returned as well.
    pub async fn search(&mut self, query: &str) -> Result<NamedLocation> {
        match lookup(&self.geocoder, query).await {
            Ok(location) => {
                self.state.search_succeeded(location.clone());
                Ok(location)
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                self.state.search_failed(&e);
                Err(e)
            }
        }
    }

    /// Analyze the current location
    ///
    /// A failure leaves the apology narrative in the state and is returned.
    /// An out-of-range location is rejected before anything changes.
    pub async fn analyze(&mut self, category: AnalysisCategory) -> Result<AnalysisResult> {
        let location = self.state.location().clone();
        location.coords().validate()?;

        let token = self.state.begin_analysis();

        match self
            .service
            .run(location.coords(), &location.display_name, category)
            .await
        {
            Ok(result) => {
                self.state.complete_analysis(token, &result);
                Ok(result)
            }
            Err(e) => {
                warn!("Analysis of {} failed: {}", location.display_name, e);
                self.state.fail_analysis(token, &e);
                Err(e)
            }
        }
    }
}
