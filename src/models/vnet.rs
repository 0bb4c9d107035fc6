//! Azure Virtual Network (VNet) data model.

use super::{Peering, ResourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A virtual network as fetched from one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualNetwork {
    pub id: ResourceId,
    pub name: String,
    pub resource_group: String,
    pub location: Option<String>,
    /// Address prefixes (CIDR), IPv4 and IPv6.
    #[serde(default)]
    pub address_space: Vec<String>,
    #[serde(default)]
    pub peerings: Vec<Peering>,
}

impl VirtualNetwork {
    pub fn subscription_id(&self) -> &str {
        self.id.subscription_id()
    }
}

impl fmt::Display for VirtualNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({} peerings, {})",
            self.name,
            self.address_space.join(", "),
            self.peerings.len(),
            self.location.as_deref().unwrap_or("unknown")
        )
    }
}
