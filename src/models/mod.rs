//! Domain models for Azure network topology.
//!
//! - [`ResourceId`] - parsed Azure resource ID, the identity of a VNet
//! - [`VirtualNetwork`] and [`Peering`] - VNets as fetched from a subscription
//! - [`Subscription`] and [`SubscriptionTopology`] - the per-subscription fetch result

mod peering;
mod resource_id;
mod subscription;
mod vnet;

// Re-export public types
pub use peering::{Peering, PeeringState};
pub use resource_id::{NodeKey, ResourceId, ResourceIdError};
pub use subscription::{Subscription, SubscriptionTopology};
pub use vnet::VirtualNetwork;
