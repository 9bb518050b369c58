//! Analysis orchestration
//!
//! Validates a request, builds the prompt, calls the model once and
//! normalizes the reply. The model client is injected at construction; a
//! service built without one answers every request with a configuration
//! error instead of reading credentials at call time.

use crate::ai::gemini::GeminiClient;
use crate::ai::TextGenerator;
use crate::analysis::{normalize, prompt, AnalysisCategory, AnalysisResult, CoordinateCheck, SuggestedPoint};
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `POST /api/analyze` request body
///
/// Every field is optional on the wire so a missing one can be reported as
/// an invalid request rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub location: Option<Coordinates>,
    pub location_name: Option<String>,
    pub analysis_type: Option<String>,
}

/// `POST /api/analyze` response body
///
/// Failures keep the same shape with `error` set and no suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis: String,
    pub suggested_locations: Vec<SuggestedPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            analysis: result.narrative,
            suggested_locations: result.suggestions,
            error: None,
        }
    }
}

impl AnalysisResponse {
    pub fn failure(error: &Error) -> Self {
        Self {
            analysis: String::new(),
            suggested_locations: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Runs analyses against an injected text generator
#[derive(Clone)]
pub struct AnalysisService {
    generator: Option<Arc<dyn TextGenerator>>,
    check: CoordinateCheck,
}

impl AnalysisService {
    /// Service backed by `generator`
    pub fn new(generator: Arc<dyn TextGenerator>, check: CoordinateCheck) -> Self {
        Self {
            generator: Some(generator),
            check,
        }
    }

    /// Service with no model credential; every analysis fails with a
    /// configuration error
    pub fn unconfigured(check: CoordinateCheck) -> Self {
        Self {
            generator: None,
            check,
        }
    }

    /// Build from configuration, reading the API key once
    pub fn from_config(config: &Config) -> Result<Self> {
        let check = config.coordinate_check()?;

        match config.api_key() {
            Some(key) => {
                let client = GeminiClient::from_config(key, &config.ai)?;
                info!("AI analysis enabled (model: {})", client.model());
                Ok(Self::new(Arc::new(client), check))
            }
            None => {
                warn!(
                    "No Gemini API key found (set {} or api_keys.gemini); analysis requests will fail",
                    config.ai.api_key_env
                );
                Ok(Self::unconfigured(check))
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some()
    }

    pub fn coordinate_check(&self) -> CoordinateCheck {
        self.check
    }

    /// Check a wire request and run it
    pub async fn analyze_request(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.analyze(
            request.location,
            request.location_name.as_deref(),
            request.analysis_type.as_deref(),
        )
        .await
    }

    /// Analyze a location
    ///
    /// Fails with `Error::InvalidRequest` when any argument is absent or
    /// blank, or the location is out of range. Unknown categories fall back
    /// to the general template.
    pub async fn analyze(
        &self,
        location: Option<Coordinates>,
        name: Option<&str>,
        category: Option<&str>,
    ) -> Result<AnalysisResult> {
        let (location, name, category) = match (location, non_blank(name), non_blank(category)) {
            (Some(location), Some(name), Some(category)) => (location, name, category),
            _ => return Err(Error::InvalidRequest("Missing required parameters".to_string())),
        };
        location
            .validate()
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;

        self.run(location, name, AnalysisCategory::from_wire(category)).await
    }

    /// Analyze an already-validated location
    pub async fn run(
        &self,
        location: Coordinates,
        name: &str,
        category: AnalysisCategory,
    ) -> Result<AnalysisResult> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| Error::Config("Gemini API key is not configured".to_string()))?;

        let prompt = prompt::build(location, name, category);
        debug!("Requesting {} analysis of {} from {}", category, name, generator.name());

        let raw = generator.generate(&prompt).await?;
        let result = normalize(&raw, location, self.check)?;

        info!(
            "{} analysis of {} returned {} suggestion(s)",
            category,
            name,
            result.suggestions.len()
        );
        Ok(result)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
