//! Analysis prompt templates
//!
//! One template per [`AnalysisCategory`]. Every template asks for the same
//! JSON reply shape so a single normalizer handles all of them.

use crate::analysis::AnalysisCategory;
use crate::constants::SUGGESTION_COUNT;
use crate::coord::Coordinates;

/// Category-specific wording
struct Template {
    /// Opening request; `{place}` is replaced with "name (coordinates: lat, lng)"
    request: &'static str,
    /// What the model should consider
    focus: &'static str,
    /// What the suggestions are and which type tags fit
    suggestions: &'static str,
    /// Description of the `analysis` field
    analysis_field: &'static str,
    example_name: &'static str,
    example_type: &'static str,
}

fn template(category: AnalysisCategory) -> Template {
    match category {
        AnalysisCategory::Tourism => Template {
            request: "Analyze {place} as a tourism destination.",
            focus: "Consider attractions, best times to visit, and potential activities.",
            suggestions: "specific nearby points of interest that tourists should visit, including what type of attraction each one is (museum, park, restaurant, etc.)",
            analysis_field: "Detailed text about the tourism potential of the location",
            example_name: "Example Attraction",
            example_type: "Museum",
        },
        AnalysisCategory::RealEstate => Template {
            request: "Analyze the real estate market in {place}.",
            focus: "Consider property values, neighborhood amenities, and investment potential.",
            suggestions: "specific nearby areas that might be good for real estate investment, including what type of property each one is (residential area, commercial district, new development, etc.)",
            analysis_field: "Detailed text about the real estate market of the location",
            example_name: "Example Property Area",
            example_type: "Residential Zone",
        },
        AnalysisCategory::Environment => Template {
            request: "Provide an environmental assessment of {place}.",
            focus: "Consider air quality, green spaces, and sustainability factors.",
            suggestions: "specific nearby locations of environmental significance, including what type of environmental feature each one is (park, conservation area, green initiative, etc.)",
            analysis_field: "Detailed text about the environmental aspects of the location",
            example_name: "Example Environmental Feature",
            example_type: "Conservation Area",
        },
        AnalysisCategory::Default => Template {
            request: "Analyze {place} and provide useful insights.",
            focus: "",
            suggestions: "specific points of interest nearby, including what type of place each one is",
            analysis_field: "Detailed text about the location",
            example_name: "Example Location",
            example_type: "Type of Place",
        },
    }
}

/// Build the instruction text for one analysis request
///
/// Pure: the same inputs always give the same text. Callers check that
/// `name` is non-empty and `location` valid before getting here.
pub fn build(location: Coordinates, name: &str, category: AnalysisCategory) -> String {
    let t = template(category);
    let place = format!("{} (coordinates: {}, {})", name, location.lat, location.lng);
    let remaining = SUGGESTION_COUNT - 1;

    let mut prompt = t.request.replace("{place}", &place);
    if !t.focus.is_empty() {
        prompt.push(' ');
        prompt.push_str(t.focus);
    }
    prompt.push_str(&format!(
        " Also suggest exactly {SUGGESTION_COUNT} {}.\n\n",
        t.suggestions
    ));

    prompt.push_str(&format!(
        r#"Format your response as JSON with two fields:
1. "analysis" - {}
2. "suggestedLocations" - An array of {SUGGESTION_COUNT} objects, each with name, lat, lng, and attractionType properties

Example of expected format:
{{
  "analysis": "Your detailed analysis here...",
  "suggestedLocations": [
    {{
      "name": "{}",
      "lat": 43.12345,
      "lng": -79.12345,
      "attractionType": "{}"
    }},
    ...{remaining} more locations
  ]
}}

Respond with the JSON object only.

Make sure to include specific lat/lng coordinates for each suggested location that are near the main location but slightly different from the original coordinates."#,
        t.analysis_field, t.example_name, t.example_type
    ));

    prompt
}
