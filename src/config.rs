//! Application constants and environment driven settings.

/// Azure CLI executable used when `AZ_CLI_PATH` is not set.
pub const DEFAULT_AZ_CLI: &str = "az";

/// Environment variable (also read from `.env`) overriding the az executable.
pub const AZ_CLI_ENV: &str = "AZ_CLI_PATH";

/// Oldest `azure-cli-core` release known to return the fields we read.
pub const MIN_AZ_CLI_VERSION: (u32, u32, u32) = (2, 27, 0);

/// Upper bound on az stdout we are willing to parse.
pub const MAX_CLI_OUTPUT_BYTES: usize = 20_000_000;

/// File name prefix for per-subscription fetch cache files.
pub const CACHE_FILE_PREFIX: &str = "vnet_cache";

/// log4rs config picked up from the working directory when present.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Resolve the az executable, honouring [`AZ_CLI_ENV`].
pub fn az_command() -> String {
    match std::env::var(AZ_CLI_ENV) {
        Ok(path) if !path.trim().is_empty() => path.trim().to_string(),
        _ => DEFAULT_AZ_CLI.to_string(),
    }
}
