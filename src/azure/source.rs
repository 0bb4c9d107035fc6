//! Topology sources: where per-subscription VNet data comes from.

use super::{account, vnet};
use crate::config;
use crate::error::FetchError;
use crate::models::SubscriptionTopology;
use std::cell::Cell;

/// Anything that can produce the topology of one subscription.
pub trait TopologySource {
    fn fetch_subscription(&self, subscription_id: &str) -> Result<SubscriptionTopology, FetchError>;
}

/// Fetches through the local Azure CLI.
///
/// Preflight checks run once, on the first fetch, so a fully cached run never
/// needs `az` at all.
pub struct AzCliSource {
    az: String,
    checked: Cell<bool>,
}

impl AzCliSource {
    /// Use the az executable from `AZ_CLI_PATH`, or `az`.
    pub fn new() -> AzCliSource {
        AzCliSource::with_command(&config::az_command())
    }

    pub fn with_command(az: &str) -> AzCliSource {
        AzCliSource {
            az: az.to_string(),
            checked: Cell::new(false),
        }
    }

    fn ensure_ready(&self) -> Result<(), FetchError> {
        if !self.checked.get() {
            account::check_local_requirements(&self.az)?;
            self.checked.set(true);
        }
        Ok(())
    }
}

impl Default for AzCliSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologySource for AzCliSource {
    fn fetch_subscription(&self, subscription_id: &str) -> Result<SubscriptionTopology, FetchError> {
        self.ensure_ready()?;
        let subscription = account::show_subscription(&self.az, subscription_id)?;
        let vnets = vnet::list_vnets(&self.az, subscription_id)?;
        Ok(SubscriptionTopology {
            subscription,
            vnets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cli_is_fatal() {
        let source = AzCliSource::with_command("definitely-not-an-az-binary-4711");
        let err = source.fetch_subscription("sub-a").unwrap_err();
        assert!(matches!(err, FetchError::MissingCli(_)));
        assert!(err.is_fatal());
    }
}
