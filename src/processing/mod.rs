//! Topology processing.
//!
//! - [`topology`] - Merging per-subscription fetches, node de-duplication

mod topology;

// Re-export public types and functions
pub use topology::{
    collect_topology, NetworkNode, PeeringEdge, PeeringLink, SubscriptionGroup, Topology,
};
