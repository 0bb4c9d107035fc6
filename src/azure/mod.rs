//! Azure CLI interaction.
//!
//! This module handles all Azure-related operations:
//! - [`cli`] - Command execution for Azure CLI
//! - [`account`] - Preflight checks and subscription lookup
//! - [`vnet`] - Virtual network listing
//! - [`source`] - The [`TopologySource`] seam used by the rest of the crate
//! - [`cache`] - Per-day caching of fetched topology

mod account;
mod cache;
mod cli;
mod source;
mod vnet;

use crate::error::FetchError;
use serde::de::DeserializeOwned;

// Re-export public types and functions
pub use cache::{cache_file_path, CachedSource};
pub use source::{AzCliSource, TopologySource};
pub use vnet::parse_vnet_list;

/// Deserialize az JSON output, reporting the failing JSON path.
pub(crate) fn parse_json<T: DeserializeOwned>(output: &str, what: &str) -> Result<T, FetchError> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::debug!("{what} OUTPUT START:\n\n{output}\n\nOUTPUT END\n");
        FetchError::Parse {
            path: e.path().to_string(),
            message: format!("{what}: {}", e.inner()),
        }
    })
}
