//! Status command handler
//!
//! Shows the effective configuration and, optionally, whether a server is up.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    // Check server status if requested
    if args.server {
        check_server_status(&config).await;
    }

    println!("loc-explore v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Config:    {}", Config::config_path()?.display());
    println!("Geocoder:  {}", config.geocoder.base_url);
    println!("AI model:  {} ({})", config.ai.model, config.ai.base_url);
    println!("API key:   {}", key_source(&config));
    println!(
        "Start:     {} ({:.6}, {:.6})",
        config.location.name, config.location.lat, config.location.lng
    );

    Ok(())
}

/// Where the Gemini key would come from, never the key itself
fn key_source(config: &Config) -> String {
    let from_env = std::env::var(&config.ai.api_key_env)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);

    if from_env {
        format!("configured (from ${})", config.ai.api_key_env)
    } else if config.api_key().is_some() {
        "configured (from config file)".to_string()
    } else {
        format!(
            "NOT CONFIGURED (set ${} or api_keys.gemini)",
            config.ai.api_key_env
        )
    }
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(ai) = status.get("aiConfigured").and_then(|v| v.as_bool()) {
                        println!("  AI configured: {}", if ai { "yes" } else { "no" });
                    }
                    if let Some(uptime) = status.get("uptimeSecs").and_then(|v| v.as_u64()) {
                        println!("  Uptime: {}s", uptime);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
