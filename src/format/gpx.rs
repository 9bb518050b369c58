//! GPX output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::map::{MapState, MarkerRole};

/// GPX formatter - outputs every marker as a waypoint
pub struct GpxFormatter;

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, state: &MapState) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="loc-explore">"#);
        gpx.push('\n');

        // Metadata
        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!(
            "    <name>{}</name>\n",
            escape_xml(&state.location().display_name)
        ));
        gpx.push_str(&format!(
            "    <time>{}</time>\n",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
        ));
        gpx.push_str("  </metadata>\n");

        for marker in state.markers() {
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                marker.position.lat, marker.position.lng
            ));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape_xml(&marker.label)));

            let symbol = match marker.role {
                MarkerRole::Primary => "flag",
                MarkerRole::Suggestion => "attraction",
            };
            gpx.push_str(&format!("    <sym>{}</sym>\n", symbol));

            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
