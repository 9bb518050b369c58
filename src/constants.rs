//! Centralized constants for the loc-explore crate
//!
//! Values shared by more than one module live here.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Google Generative Language API
    pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com";

    /// Default Gemini model
    pub const GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

    /// Environment variable holding the Gemini API key
    pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

    /// User-Agent sent to third-party services (required by Nominatim)
    pub const USER_AGENT: &str = concat!("loc-explore/", env!("CARGO_PKG_VERSION"));
}

/// Suggested point coordinate repair
pub mod repair {
    /// Latitude step per suggestion index, in degrees
    pub const LAT_STEP: f64 = 0.002;

    /// Longitude step per suggestion index, in degrees
    pub const LNG_STEP: f64 = 0.003;
}

/// Starting view before the first search (Yonge & Lawrence, Toronto)
pub mod initial {
    pub const LAT: f64 = 43.725092;
    pub const LNG: f64 = -79.402195;
    pub const NAME: &str = "Yonge & Lawrence, Toronto";
}

/// Number of suggested points requested from the model
pub const SUGGESTION_COUNT: usize = 5;
