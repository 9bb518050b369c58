//! loc-explore CLI entry point
//!
//! Place search and AI analysis - CLI + web app

use loc_explore::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
