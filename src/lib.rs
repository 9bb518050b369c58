//! loc-explore: place search with AI-written local guides
//!
//! A library and CLI tool that geocodes a place name, asks a generative
//! model for a tourism, real-estate or environmental write-up of it, and
//! turns the model's suggested nearby spots into map markers.
//!
//! ## Features
//!
//! - Nominatim geocoding with timeout and retry
//! - Category-specific prompts that ask for five nearby suggestions
//! - Repair of model replies (code fences, missing coordinates)
//! - Map state with stale-response protection
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use loc_explore::analysis::{normalize, CoordinateCheck};
//! use loc_explore::coord::Coordinates;
//!
//! let origin = Coordinates::new(43.725092, -79.402195);
//! let reply = "```json\n{\"analysis\": \"Busy.\", \"suggestedLocations\": [{\"name\": \"Park\"}]}\n```";
//!
//! let result = normalize(reply, origin, CoordinateCheck::Falsy).unwrap();
//! assert_eq!(result.suggestions.len(), 1);
//! assert!((result.suggestions[0].lat - 43.727092).abs() < 1e-9);
//! ```

pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod map;
pub mod retry;
pub mod server;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use analysis::{AnalysisCategory, AnalysisResult, AnalysisService, SuggestedPoint};
pub use config::Config;
pub use coord::{Coordinates, NamedLocation};
pub use error::{Error, Result};
pub use map::{MapController, MapState};
