//! Location analysis
//!
//! This module handles:
//! - Building the instruction prompt for a category ([`prompt`])
//! - Turning the model's raw reply into structured data ([`normalize`])
//! - Orchestrating both around a [`TextGenerator`](crate::ai::TextGenerator) ([`service`])

pub mod normalize;
pub mod prompt;
pub mod service;

use serde::{Deserialize, Serialize};

pub use normalize::normalize;
pub use service::AnalysisService;

/// Which kind of analysis to ask for
///
/// Only the prompt template differs between categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisCategory {
    Tourism,
    RealEstate,
    Environment,
    Default,
}

impl AnalysisCategory {
    /// Map a wire name to a category; unknown names select `Default`
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "tourism" => Self::Tourism,
            "realestate" | "real_estate" | "real-estate" => Self::RealEstate,
            "environment" => Self::Environment,
            _ => Self::Default,
        }
    }

    /// Wire name used in requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tourism => "tourism",
            Self::RealEstate => "realestate",
            Self::Environment => "environment",
            Self::Default => "default",
        }
    }
}

impl std::fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List all analysis categories
pub fn available_categories() -> Vec<AnalysisCategory> {
    vec![
        AnalysisCategory::Tourism,
        AnalysisCategory::RealEstate,
        AnalysisCategory::Environment,
        AnalysisCategory::Default,
    ]
}

/// Rule for deciding that a suggested coordinate is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateCheck {
    /// Absent, null, false, zero, empty or non-numeric string all count as
    /// missing. A suggestion that really sits on the equator or the prime
    /// meridian gets repaired too.
    #[default]
    Falsy,
    /// Only absent or non-number values count as missing; zero is kept
    Strict,
}

impl std::str::FromStr for CoordinateCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "falsy" => Ok(Self::Falsy),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("Unknown coordinate check: {} (expected falsy or strict)", s)),
        }
    }
}

/// A point of interest proposed by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedPoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Free-form type tag ("Museum", "Park", ...)
    #[serde(rename = "attractionType", default)]
    pub kind: String,
}

/// Narrative plus suggested points, in the model's order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "analysis")]
    pub narrative: String,
    #[serde(rename = "suggestedLocations", default)]
    pub suggestions: Vec<SuggestedPoint>,
}
