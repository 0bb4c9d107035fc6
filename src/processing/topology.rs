//! Merging per-subscription fetches into one topology.
//!
//! Nodes are keyed by [`ResourceId::key`], so a VNet reached from several
//! subscriptions is a single node. A peering is stored once per unordered
//! pair of VNets, with one [`PeeringLink`] for each side that reported it.

use crate::azure::TopologySource;
use crate::error::FetchError;
use crate::models::{
    NodeKey, Peering, PeeringState, ResourceId, Subscription, SubscriptionTopology,
    VirtualNetwork,
};
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};

/// A VNet in the merged graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkNode {
    pub id: ResourceId,
    pub name: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub location: Option<String>,
    pub address_space: Vec<String>,
    /// Only known as the remote end of a peering.
    pub external: bool,
}

impl NetworkNode {
    fn fetched(vnet: &VirtualNetwork) -> NetworkNode {
        NetworkNode {
            id: vnet.id.clone(),
            name: vnet.name.clone(),
            subscription_id: vnet.subscription_id().to_string(),
            resource_group: vnet.resource_group.clone(),
            location: vnet.location.clone(),
            address_space: vnet.address_space.clone(),
            external: false,
        }
    }

    fn external(id: &ResourceId) -> NetworkNode {
        NetworkNode {
            id: id.clone(),
            name: id.name().to_string(),
            subscription_id: id.subscription_id().to_string(),
            resource_group: id.resource_group().to_string(),
            location: None,
            address_space: vec![],
            external: true,
        }
    }
}

/// One side of a peering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeeringLink {
    pub name: String,
    pub state: PeeringState,
    pub uses_gateway: bool,
}

impl From<&Peering> for PeeringLink {
    fn from(p: &Peering) -> Self {
        PeeringLink {
            name: p.name.clone(),
            state: p.state.clone(),
            uses_gateway: p.uses_gateway(),
        }
    }
}

/// Undirected peering between two nodes, `a < b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeeringEdge {
    pub a: NodeKey,
    pub b: NodeKey,
    /// Keyed by the local node of the reporting side.
    pub links: BTreeMap<NodeKey, PeeringLink>,
}

impl PeeringEdge {
    /// Combined state of both sides.
    pub fn state(&self) -> PeeringState {
        if self
            .links
            .values()
            .any(|l| l.state == PeeringState::Disconnected)
        {
            return PeeringState::Disconnected;
        }
        self.links
            .values()
            .find(|l| !l.state.is_connected())
            .map(|l| l.state.clone())
            .unwrap_or(PeeringState::Connected)
    }

    /// The link reported by the lowest keyed side.
    pub fn primary_link(&self) -> Option<&PeeringLink> {
        self.links.values().next()
    }

    pub fn uses_gateway(&self) -> bool {
        self.links.values().any(|l| l.uses_gateway)
    }
}

/// Nodes fetched under one subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionGroup {
    pub subscription: Subscription,
    pub members: BTreeSet<NodeKey>,
}

/// The merged topology of all fetched subscriptions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Topology {
    pub nodes: BTreeMap<NodeKey, NetworkNode>,
    pub edges: BTreeMap<(NodeKey, NodeKey), PeeringEdge>,
    /// Keyed by lowercase subscription ID.
    pub groups: BTreeMap<String, SubscriptionGroup>,
}

impl Topology {
    pub fn new() -> Topology {
        Topology::default()
    }

    /// Fold one subscription's fetch result into the topology.
    pub fn merge(&mut self, data: SubscriptionTopology) {
        let group = self
            .groups
            .entry(data.subscription.id.to_lowercase())
            .or_insert_with(|| SubscriptionGroup {
                subscription: data.subscription.clone(),
                members: BTreeSet::new(),
            });
        // Smallest ID and name win so the result does not depend on merge order.
        if data.subscription.id < group.subscription.id {
            group.subscription.id = data.subscription.id.clone();
        }
        group.subscription.name = match (group.subscription.name.take(), &data.subscription.name) {
            (Some(kept), Some(other)) => Some(kept.min(other.clone())),
            (kept, other) => kept.or_else(|| other.clone()),
        };

        for vnet in &data.vnets {
            log::debug!("Merging vnet {vnet}");
            let key = vnet.id.key();
            group.members.insert(key.clone());

            match self.nodes.get_mut(&key) {
                Some(node) if node.external => {
                    log::debug!("Upgrading external node {} to fetched", vnet.name);
                    *node = NetworkNode::fetched(vnet);
                }
                Some(node) if vnet.id.as_str() < node.id.as_str() => {
                    log::debug!("Node {} fetched again, keeping {}", vnet.name, vnet.id);
                    *node = NetworkNode::fetched(vnet);
                }
                Some(_) => log::debug!("Node {} already fetched", vnet.name),
                None => {
                    self.nodes.insert(key.clone(), NetworkNode::fetched(vnet));
                }
            }

            for peering in &vnet.peerings {
                let remote_key = peering.remote.key();
                if remote_key == key {
                    log::warn!("Ignoring self peering {} on {}", peering.name, vnet.name);
                    continue;
                }
                match self.nodes.get_mut(&remote_key) {
                    Some(node) if node.external && peering.remote.as_str() < node.id.as_str() => {
                        *node = NetworkNode::external(&peering.remote);
                    }
                    Some(_) => {}
                    None => {
                        self.nodes
                            .insert(remote_key.clone(), NetworkNode::external(&peering.remote));
                    }
                }

                let (a, b) = if key < remote_key {
                    (key.clone(), remote_key)
                } else {
                    (remote_key, key.clone())
                };
                self.edges
                    .entry((a.clone(), b.clone()))
                    .or_insert_with(|| PeeringEdge {
                        a,
                        b,
                        links: BTreeMap::new(),
                    })
                    .links
                    .entry(key.clone())
                    .or_insert_with(|| PeeringLink::from(peering));
            }
        }
    }

    /// Number of distinct peered VNets of a node.
    pub fn peer_count(&self, key: &str) -> usize {
        self.edges
            .values()
            .filter(|e| e.a == key || e.b == key)
            .count()
    }

    /// Nodes that no fetched subscription listed, sorted by key.
    pub fn external_nodes(&self) -> impl Iterator<Item = (&NodeKey, &NetworkNode)> {
        self.nodes.iter().filter(|(_, n)| n.external)
    }
}

/// Fetch every subscription in order and merge the results.
///
/// Fatal errors (authentication, missing CLI) abort. Anything else is logged
/// and that subscription is skipped.
pub fn collect_topology<S: TopologySource>(
    source: &S,
    subscription_ids: &[String],
) -> Result<Topology, FetchError> {
    let mut topology = Topology::new();
    for subscription_id in subscription_ids {
        log::debug!("Processing {subscription_id}");
        match source.fetch_subscription(subscription_id) {
            Ok(data) => topology.merge(data),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => log::warn!(
                "{skipped} subscription {subscription_id}: {e}",
                skipped = "skipping".on_yellow()
            ),
        }
    }
    log::info!(
        "Collected {} nodes and {} peerings from {} subscriptions",
        topology.nodes.len(),
        topology.edges.len(),
        topology.groups.len()
    );
    Ok(topology)
}
