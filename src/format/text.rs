//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::map::{MapState, MarkerRole};

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, state: &MapState) -> Result<String> {
        let mut output = String::new();
        let location = state.location();

        // Header
        output.push_str(&format!("{}\n", location.display_name));
        output.push_str(&format!("  ({:.6}, {:.6})\n", location.lat, location.lng));

        if let Some(notice) = state.notice() {
            output.push_str(&format!("\nNote: {}\n", notice));
        }

        if !state.analysis_text().is_empty() {
            output.push_str(&format!("\n{}\n", state.analysis_text()));
        }

        // Suggestions
        let suggestions: Vec<_> = state
            .markers()
            .iter()
            .filter(|m| m.role == MarkerRole::Suggestion)
            .collect();
        if !suggestions.is_empty() {
            output.push_str("\nSuggested locations:\n");
            for (i, marker) in suggestions.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} ({:.6}, {:.6})\n",
                    i + 1,
                    marker.label,
                    marker.position.lat,
                    marker.position.lng
                ));
            }
        }

        Ok(output)
    }
}
