//! Model reply normalization
//!
//! The model is asked for a JSON object but answers in free text. This
//! module strips the Markdown code fence it usually adds, checks the shape,
//! and gives every suggestion usable coordinates.
//!
//! Repaired coordinates are synthesized from the origin and the suggestion's
//! index. They keep every suggestion on the map but say nothing about where
//! the place really is.

use crate::analysis::{AnalysisResult, CoordinateCheck, SuggestedPoint};
use crate::constants::repair::{LAT_STEP, LNG_STEP};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use tracing::debug;

const FENCE: &str = "```";

/// Remove one leading fence (with its language tag) and one trailing fence
///
/// Text without a fence marker is returned unchanged, and fences anywhere
/// else are left alone.
pub fn strip_code_fence(raw: &str) -> &str {
    if !raw.contains(FENCE) {
        return raw;
    }

    let mut body = raw;

    if let Some(after) = raw.trim_start().strip_prefix(FENCE) {
        let tag_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
            .unwrap_or(after.len());
        let rest = &after[tag_len..];
        body = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    let trimmed = body.trim_end();
    if let Some(inner) = trimmed.strip_suffix(FENCE) {
        body = inner;
    }

    body
}

/// Offset (lat, lng) in degrees for the suggestion at `index`
///
/// Latitude alternates sign with each index, longitude is positive every
/// third index; both grow with the index so repaired points never overlap.
pub fn repair_offset(index: usize) -> (f64, f64) {
    let step = (index + 1) as f64;
    let lat_sign = if index % 2 == 0 { 1.0 } else { -1.0 };
    let lng_sign = if index % 3 == 0 { 1.0 } else { -1.0 };
    (LAT_STEP * step * lat_sign, LNG_STEP * step * lng_sign)
}

/// Read one coordinate field under `check`; None means "missing"
fn coordinate(value: Option<&Value>, check: CoordinateCheck) -> Option<f64> {
    let value = value?;
    let number = match (check, value) {
        (_, Value::Number(n)) => n.as_f64(),
        (CoordinateCheck::Falsy, Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())?;

    match check {
        CoordinateCheck::Falsy if number == 0.0 => None,
        _ => Some(number),
    }
}

fn string_field(entry: &Map<String, Value>, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse and repair a raw model reply
///
/// Out-of-range coordinates count as missing. Repaired points are clamped
/// to the valid range.
///
/// Fails with `Error::MalformedResponse` when the text is not JSON after
/// fence stripping, `analysis` is not a non-empty string, or
/// `suggestedLocations` is not an array of objects.
pub fn normalize(raw: &str, origin: Coordinates, check: CoordinateCheck) -> Result<AnalysisResult> {
    let cleaned = strip_code_fence(raw);

    let parsed: Value = serde_json::from_str(cleaned).map_err(|e| {
        debug!("Unparseable model reply: {}", raw);
        Error::MalformedResponse(format!("Invalid response format from model: {}", e))
    })?;

    let narrative = match parsed.get("analysis") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            return Err(Error::MalformedResponse(
                "Response from model does not have the expected format: missing analysis".to_string(),
            ))
        }
    };

    let entries = parsed
        .get("suggestedLocations")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::MalformedResponse(
                "Response from model does not have the expected format: suggestedLocations is not an array"
                    .to_string(),
            )
        })?;

    let mut suggestions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry = entry.as_object().ok_or_else(|| {
            Error::MalformedResponse(format!("Suggested location {} is not an object", index))
        })?;

        let given = match (
            coordinate(entry.get("lat"), check),
            coordinate(entry.get("lng"), check),
        ) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };

        let position = match given.filter(|c| c.validate().is_ok()) {
            Some(position) => position,
            None => {
                let (d_lat, d_lng) = repair_offset(index);
                debug!("Repairing coordinates of suggestion {}", index);
                origin.offset(d_lat, d_lng).clamped()
            }
        };

        suggestions.push(SuggestedPoint {
            name: string_field(entry, "name"),
            lat: position.lat,
            lng: position.lng,
            kind: string_field(entry, "attractionType"),
        });
    }

    Ok(AnalysisResult {
        narrative,
        suggestions,
    })
}
