//! `az network vnet list` output parsing and fetch.

use super::{cli, parse_json};
use crate::error::FetchError;
use crate::models::{Peering, PeeringState, ResourceId, VirtualNetwork};
use serde::Deserialize;

/// A VNet as printed by `az network vnet list --output json`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AzVnet {
    id: String,
    name: Option<String>,
    resource_group: Option<String>,
    location: Option<String>,
    address_space: Option<AzAddressSpace>,
    #[serde(default)]
    virtual_network_peerings: Option<Vec<AzPeering>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AzAddressSpace {
    #[serde(default)]
    address_prefixes: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AzPeering {
    name: Option<String>,
    peering_state: Option<String>,
    remote_virtual_network: Option<AzSubResource>,
    allow_gateway_transit: Option<bool>,
    use_remote_gateways: Option<bool>,
    allow_forwarded_traffic: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct AzSubResource {
    id: Option<String>,
}

fn id_error(e: crate::models::ResourceIdError, path: &str) -> FetchError {
    FetchError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    }
}

impl AzVnet {
    fn into_model(self, index: usize) -> Result<VirtualNetwork, FetchError> {
        let id = ResourceId::new(&self.id).map_err(|e| id_error(e, &format!("[{index}].id")))?;

        let mut peerings = Vec::new();
        for (p, raw) in self
            .virtual_network_peerings
            .unwrap_or_default()
            .into_iter()
            .enumerate()
        {
            let Some(remote) = raw.remote_virtual_network.and_then(|r| r.id) else {
                log::warn!(
                    "Skipping peering {:?} on {}: no remote virtual network",
                    raw.name,
                    id
                );
                continue;
            };
            let remote = ResourceId::new(&remote).map_err(|e| {
                id_error(
                    e,
                    &format!("[{index}].virtualNetworkPeerings[{p}].remoteVirtualNetwork.id"),
                )
            })?;
            peerings.push(Peering {
                name: raw.name.unwrap_or_else(|| format!("peering-{p}")),
                remote,
                state: raw
                    .peering_state
                    .map(PeeringState::from)
                    .unwrap_or_else(|| PeeringState::Other("Unknown".to_string())),
                allow_gateway_transit: raw.allow_gateway_transit.unwrap_or(false),
                use_remote_gateways: raw.use_remote_gateways.unwrap_or(false),
                allow_forwarded_traffic: raw.allow_forwarded_traffic.unwrap_or(false),
            });
        }

        Ok(VirtualNetwork {
            name: self.name.unwrap_or_else(|| id.name().to_string()),
            resource_group: self
                .resource_group
                .unwrap_or_else(|| id.resource_group().to_string()),
            location: self.location,
            address_space: self
                .address_space
                .and_then(|a| a.address_prefixes)
                .unwrap_or_default(),
            peerings,
            id,
        })
    }
}

/// Parse the JSON array printed by `az network vnet list`.
pub fn parse_vnet_list(output: &str) -> Result<Vec<VirtualNetwork>, FetchError> {
    let raw: Vec<AzVnet> = parse_json(output, "az network vnet list")?;
    raw.into_iter()
        .enumerate()
        .map(|(i, v)| v.into_model(i))
        .collect()
}

/// List all VNets, with their peerings, in a subscription.
pub fn list_vnets(az: &str, subscription_id: &str) -> Result<Vec<VirtualNetwork>, FetchError> {
    let output = cli::run(&format!(
        "{} network vnet list --subscription '{subscription_id}' --output json",
        super::account::quote(az)
    ))?;
    let vnets = parse_vnet_list(&output)?;
    log::info!(
        "got {} vnets from subscription {subscription_id}",
        vnets.len()
    );
    Ok(vnets)
}
