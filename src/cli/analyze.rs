//! Analyze command handler
//!
//! Moves to a place (searched, given as coordinates, or the configured
//! start location), asks the model about it and prints the result.

use crate::analysis::{available_categories, AnalysisCategory, AnalysisService};
use crate::cli::{emit, init_logging};
use crate::config::Config;
use crate::coord::{Coordinates, NamedLocation};
use crate::error::Result;
use crate::format::available_formats;
use crate::geo::nominatim::NominatimBackend;
use crate::map::MapController;
use clap::Args;

/// Analyze command arguments
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Place to search for before analyzing
    #[arg(conflicts_with_all = ["lat", "lng"])]
    pub query: Option<String>,

    /// Latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Name to use with --lat/--lng
    #[arg(long)]
    pub name: Option<String>,

    /// Analysis type (tourism, realestate, environment)
    #[arg(long, short = 't')]
    pub r#type: Option<String>,

    /// Output format (json, text, gpx)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available analysis types
    #[arg(short = 'T', long = "list-types")]
    pub list_types: bool,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the analyze command
pub async fn run(args: AnalyzeArgs) -> Result<()> {
    // Handle list flags first
    if args.list_types {
        list_types();
        return Ok(());
    }

    if args.list_formats {
        list_formats();
        return Ok(());
    }

    init_logging("warn");

    let config = Config::load()?;
    let category = AnalysisCategory::from_wire(
        args.r#type.as_deref().unwrap_or(&config.analysis.default_type),
    );

    let start = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            let coords = Coordinates::new(lat, lng);
            coords.validate()?;
            let name = args
                .name
                .clone()
                .unwrap_or_else(|| format!("{:.6}, {:.6}", lat, lng));
            NamedLocation::new(coords, name)
        }
        _ => config.initial_location(),
    };

    let geocoder = NominatimBackend::from_config(&config.geocoder)?;
    let service = AnalysisService::from_config(&config)?;
    let mut controller = MapController::new(geocoder, service, start);

    if let Some(query) = &args.query {
        let found = controller.search(query).await?;
        eprintln!("Found: {}", found.display_name);
    }

    let outcome = controller.analyze(category).await;
    emit(controller.state(), &args.format, args.output.as_deref())?;
    outcome.map(|_| ())
}

/// Print available analysis types
fn list_types() {
    println!("Available analysis types:");
    for category in available_categories() {
        let description = match category {
            AnalysisCategory::Tourism => "Attractions, activities and local culture",
            AnalysisCategory::RealEstate => "Property market, amenities and investment outlook",
            AnalysisCategory::Environment => "Green space, air quality and sustainability",
            AnalysisCategory::Default => "General overview (any other value)",
        };
        println!("  {:12} - {}", category.as_str(), description);
    }
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
