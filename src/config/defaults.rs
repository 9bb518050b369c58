//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

/// Per-attempt timeout for geocoding requests
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;

/// Per-attempt timeout for AI generation requests
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Extra attempts after a transient failure
pub const DEFAULT_RETRIES: u32 = 1;

/// Delay before the first retry, in milliseconds
pub const DEFAULT_BACKOFF_MS: u64 = 500;

/// Default analysis type for the CLI
pub const DEFAULT_ANALYSIS_TYPE: &str = "tourism";

/// Default rule for deciding a suggested coordinate is missing
pub const DEFAULT_COORDINATE_CHECK: &str = "falsy";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "loc-explore";
