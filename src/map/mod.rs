//! Map state
//!
//! Client-side state for one exploration session: the current location, the
//! markers on the map, the latest narrative and a loading flag.
//!
//! Analysis responses carry the [`RequestToken`] issued when they were
//! requested. Only the latest token is applied; anything older (including
//! requests made before the most recent search) is dropped.

mod controller;

pub use controller::MapController;

use crate::analysis::{AnalysisResult, SuggestedPoint};
use crate::coord::{Coordinates, NamedLocation};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Message shown when a search has no result
pub const NOT_FOUND_NOTICE: &str = "Location not found. Please try a different search term.";

/// Message shown when a search fails for any other reason
pub const SEARCH_FAILED_NOTICE: &str = "Error searching for location. Please try again.";

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerRole {
    /// The current search result
    Primary,
    /// A point suggested by the analysis
    Suggestion,
}

/// A pin on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub position: Coordinates,
    pub label: String,
    pub role: MarkerRole,
}

impl MapMarker {
    pub fn primary(location: &NamedLocation) -> Self {
        Self {
            position: location.coords(),
            label: location.display_name.clone(),
            role: MarkerRole::Primary,
        }
    }

    pub fn suggestion(point: &SuggestedPoint) -> Self {
        Self {
            position: Coordinates::new(point.lat, point.lng),
            label: point.name.clone(),
            role: MarkerRole::Suggestion,
        }
    }
}

/// Identifies one analysis request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(u64);

/// Narrative shown in place of an analysis that failed
pub fn apology(location_name: &str) -> String {
    format!(
        "Unable to analyze {} due to an error. Please try again later.",
        location_name
    )
}

/// State of one exploration session
#[derive(Debug, Clone, Serialize)]
pub struct MapState {
    location: NamedLocation,
    markers: Vec<MapMarker>,
    analysis_text: String,
    loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
    #[serde(skip)]
    latest_token: u64,
}

impl MapState {
    /// Start at `location` with a single primary marker
    pub fn new(location: NamedLocation) -> Self {
        Self {
            markers: vec![MapMarker::primary(&location)],
            location,
            analysis_text: String::new(),
            loading: false,
            notice: None,
            latest_token: 0,
        }
    }

    pub fn location(&self) -> &NamedLocation {
        &self.location
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    pub fn analysis_text(&self) -> &str {
        &self.analysis_text
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline message from the last failed search or analysis
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn primary_marker(&self) -> Option<&MapMarker> {
        self.markers.iter().find(|m| m.role == MarkerRole::Primary)
    }

    pub fn suggestion_markers(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter().filter(|m| m.role == MarkerRole::Suggestion)
    }

    /// A search returned `location`
    ///
    /// Replaces every marker, clears the narrative and invalidates any
    /// analysis still in flight.
    pub fn search_succeeded(&mut self, location: NamedLocation) {
        debug!("Map moved to {}", location.display_name);
        self.markers = vec![MapMarker::primary(&location)];
        self.location = location;
        self.analysis_text.clear();
        self.loading = false;
        self.notice = None;
        self.latest_token += 1;
    }

    /// A search failed; only the notice changes
    pub fn search_failed(&mut self, error: &Error) {
        let notice = match error {
            Error::NotFound(_) => NOT_FOUND_NOTICE,
            _ => SEARCH_FAILED_NOTICE,
        };
        self.notice = Some(notice.to_string());
    }

    /// An analysis was requested; returns the token its result must carry
    pub fn begin_analysis(&mut self) -> RequestToken {
        self.latest_token += 1;
        self.loading = true;
        self.notice = None;
        RequestToken(self.latest_token)
    }

    fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest_token
    }

    /// An analysis finished
    ///
    /// Returns false and changes nothing when `token` is stale. Otherwise the
    /// narrative is replaced and, if there are suggestions, all suggestion
    /// markers are replaced by the new ones.
    pub fn complete_analysis(&mut self, token: RequestToken, result: &AnalysisResult) -> bool {
        if !self.is_current(token) {
            debug!("Dropping stale analysis response {:?}", token);
            return false;
        }

        self.analysis_text = result.narrative.clone();
        if !result.suggestions.is_empty() {
            let primary = MapMarker::primary(&self.location);
            self.markers = std::iter::once(primary)
                .chain(result.suggestions.iter().map(MapMarker::suggestion))
                .collect();
        }
        self.loading = false;
        true
    }

    /// An analysis failed
    ///
    /// Applied like an empty result with an apology narrative, so markers
    /// stay as they were. Stale tokens are ignored.
    pub fn fail_analysis(&mut self, token: RequestToken, error: &Error) -> bool {
        let fallback = AnalysisResult {
            narrative: apology(&self.location.display_name),
            suggestions: Vec::new(),
        };
        if !self.complete_analysis(token, &fallback) {
            return false;
        }
        self.notice = Some(error.to_string());
        true
    }
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(NamedLocation::new(
            Coordinates::new(crate::constants::initial::LAT, crate::constants::initial::LNG),
            crate::constants::initial::NAME,
        ))
    }
}
