//! Search command handler
//!
//! Geocodes a place name and shows where the map would move.

use crate::analysis::{AnalysisService, CoordinateCheck};
use crate::cli::{emit, init_logging};
use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimBackend;
use crate::map::MapController;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name, address or landmark
    pub query: String,

    /// Output format (json, text, gpx)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    init_logging("warn");

    let config = Config::load()?;
    let geocoder = NominatimBackend::from_config(&config.geocoder)?;
    let service = AnalysisService::unconfigured(CoordinateCheck::default());
    let mut controller = MapController::new(geocoder, service, config.initial_location());

    controller.search(&args.query).await?;

    emit(controller.state(), &args.format, args.output.as_deref())
}
