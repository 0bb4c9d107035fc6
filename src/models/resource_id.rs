//! Azure resource ID parsing.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a string is not a usable resource ID.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceIdError {
    #[error("empty resource id")]
    Empty,
    #[error("resource id '{0}' has no subscription segment")]
    MissingSubscription(String),
    #[error("resource id '{0}' has no resourceGroups segment")]
    MissingResourceGroup(String),
    #[error("resource id '{0}' has no resource name")]
    MissingName(String),
}

/// Case-insensitive identity of a resource, used as node identity.
pub type NodeKey = String;

/// Parsed form of
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/{ns}/{type}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    raw: String,
    subscription_id: String,
    resource_group: String,
    name: String,
}

impl ResourceId {
    /// Parse a resource ID string.
    pub fn new(raw: &str) -> Result<ResourceId, ResourceIdError> {
        let raw = raw.trim().trim_end_matches('/');
        if raw.is_empty() {
            return Err(ResourceIdError::Empty);
        }
        let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();

        let value_after = |key: &str| {
            segments
                .windows(2)
                .find(|w| w[0].eq_ignore_ascii_case(key))
                .map(|w| w[1].to_string())
        };

        let subscription_id = value_after("subscriptions")
            .ok_or_else(|| ResourceIdError::MissingSubscription(raw.to_string()))?;
        let resource_group = value_after("resourceGroups")
            .ok_or_else(|| ResourceIdError::MissingResourceGroup(raw.to_string()))?;
        // subscriptions/x/resourceGroups/y/providers/ns/type/name
        if segments.len() < 8 {
            return Err(ResourceIdError::MissingName(raw.to_string()));
        }
        let name = segments[segments.len() - 1].to_string();

        Ok(ResourceId {
            raw: raw.to_string(),
            subscription_id,
            resource_group,
            name,
        })
    }

    /// Build the ID of a virtual network from its parts.
    pub fn virtual_network(subscription_id: &str, resource_group: &str, name: &str) -> ResourceId {
        ResourceId {
            raw: format!(
                "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/Microsoft.Network/virtualNetworks/{name}"
            ),
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        }
    }

    /// Identity key: the lowercase ID, Azure treats IDs case-insensitively.
    pub fn key(&self) -> NodeKey {
        self.raw.to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceId::new(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<ResourceId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceId::new(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VNET_ID: &str =
        "/subscriptions/1111-aaaa/resourceGroups/Net-RG/providers/Microsoft.Network/virtualNetworks/Hub-VNet";

    #[test]
    fn test_parse_vnet_id() {
        let id = ResourceId::new(VNET_ID).unwrap();
        assert_eq!(id.subscription_id(), "1111-aaaa");
        assert_eq!(id.resource_group(), "Net-RG");
        assert_eq!(id.name(), "Hub-VNet");
        assert_eq!(id.as_str(), VNET_ID);
    }

    #[test]
    fn test_key_ignores_case_and_trailing_slash() {
        let a = ResourceId::new(VNET_ID).unwrap();
        let b = ResourceId::new(&format!("{}/", VNET_ID.to_uppercase())).unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_parse_case_insensitive_segments() {
        let id = ResourceId::new(
            "/SUBSCRIPTIONS/sub-b/resourcegroups/rg2/providers/Microsoft.Network/virtualNetworks/spoke",
        )
        .unwrap();
        assert_eq!(id.subscription_id(), "sub-b");
        assert_eq!(id.resource_group(), "rg2");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ResourceId::new("  "), Err(ResourceIdError::Empty));
        assert!(matches!(
            ResourceId::new("/resourceGroups/rg/providers/x/y/z"),
            Err(ResourceIdError::MissingSubscription(_))
        ));
        assert!(matches!(
            ResourceId::new("/subscriptions/s/providers/x/y/z/w"),
            Err(ResourceIdError::MissingResourceGroup(_))
        ));
        assert!(matches!(
            ResourceId::new("/subscriptions/s/resourceGroups/rg"),
            Err(ResourceIdError::MissingName(_))
        ));
    }

    #[test]
    fn test_virtual_network_builder_matches_parse() {
        let built = ResourceId::virtual_network("1111-aaaa", "Net-RG", "Hub-VNet");
        assert_eq!(built, ResourceId::new(VNET_ID).unwrap());
    }

    #[test]
    fn test_serde_as_string() {
        let id = ResourceId::new(VNET_ID).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{VNET_ID}\""));
        let back: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ResourceId>("\"nope\"").is_err());
    }
}
