//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::map::MapState;

/// JSON formatter - outputs the whole state as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Location, markers and analysis as JSON"
    }

    fn format(&self, state: &MapState) -> Result<String> {
        Ok(serde_json::to_string_pretty(state)?)
    }
}
