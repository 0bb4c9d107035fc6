//! VNet peering data model.

use super::ResourceId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one side of a peering as reported by Azure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PeeringState {
    Initiated,
    Connected,
    Disconnected,
    /// Any value Azure reports that we do not know about.
    Other(String),
}

impl PeeringState {
    pub fn is_connected(&self) -> bool {
        *self == PeeringState::Connected
    }
}

impl From<&str> for PeeringState {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "initiated" => PeeringState::Initiated,
            "connected" => PeeringState::Connected,
            "disconnected" => PeeringState::Disconnected,
            _ => PeeringState::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for PeeringState {
    fn from(value: String) -> Self {
        PeeringState::from(value.as_str())
    }
}

impl From<PeeringState> for String {
    fn from(state: PeeringState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for PeeringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeeringState::Initiated => f.write_str("Initiated"),
            PeeringState::Connected => f.write_str("Connected"),
            PeeringState::Disconnected => f.write_str("Disconnected"),
            PeeringState::Other(s) => f.write_str(s),
        }
    }
}

/// One peering resource, seen from the VNet that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peering {
    /// Name of the peering resource.
    pub name: String,
    /// The VNet on the other end.
    pub remote: ResourceId,
    pub state: PeeringState,
    #[serde(default)]
    pub allow_gateway_transit: bool,
    #[serde(default)]
    pub use_remote_gateways: bool,
    #[serde(default)]
    pub allow_forwarded_traffic: bool,
}

impl Peering {
    /// True when traffic crosses a VPN/ExpressRoute gateway through this peering.
    pub fn uses_gateway(&self) -> bool {
        self.allow_gateway_transit || self.use_remote_gateways
    }
}
