//! Azure subscription data model.

use super::VirtualNetwork;
use serde::{Deserialize, Serialize};

/// An Azure subscription, the scope a fetch runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    /// Display name, when `az account show` returned one.
    pub name: Option<String>,
}

impl Subscription {
    pub fn new(id: &str) -> Subscription {
        Subscription {
            id: id.to_string(),
            name: None,
        }
    }

    /// Name for display, falling back to the ID.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.id,
        }
    }
}

/// Everything fetched for one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTopology {
    pub subscription: Subscription,
    pub vnets: Vec<VirtualNetwork>,
}
