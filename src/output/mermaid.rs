//! Mermaid flowchart rendering of a [`Topology`].
//!
//! Output is fully sorted (groups by subscription ID, nodes by resource key,
//! edges by key pair) so the same topology always renders byte-identical,
//! whatever order the subscriptions were fetched in.

use crate::models::{NodeKey, PeeringState};
use crate::processing::{NetworkNode, PeeringEdge, Topology};
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};

const HEADER: &str = "graph LR";
const INDENT: &str = "    ";
const EXTERNAL_GROUP_ID: &str = "external";
const EXTERNAL_GROUP_LABEL: &str = "__EXTERNAL__";

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Label edges with the peering name.
    pub edge_labels: bool,
    /// Wrap nodes in one subgraph per subscription.
    pub subscription_groups: bool,
    /// Append address prefixes to node labels.
    pub address_space: bool,
}

/// Node fill colour by number of peerings.
fn peer_count_fill(peer_count: usize) -> &'static str {
    match peer_count {
        0 => "#8cbed6",
        1..=9 => "#f8de7e",
        10..=19 => "#ff8243",
        20..=49 => "#ff5349",
        _ => "#c90016",
    }
}

/// Lowercase, with everything but ASCII alphanumerics replaced by `_`.
fn sanitize_ident(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Mermaid strings are double quoted, `#quot;` is the entity Mermaid decodes.
fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}

/// Give every node a readable, unique Mermaid identifier.
fn assign_node_ids(topology: &Topology) -> BTreeMap<&NodeKey, String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut ids = BTreeMap::new();
    for (key, node) in &topology.nodes {
        let base = format!(
            "vnet_{}",
            sanitize_ident(&format!(
                "{}_{}_{}",
                node.subscription_id, node.resource_group, node.name
            ))
        );
        ids.insert(key, unique_id(&mut used, base));
    }
    ids
}

/// Subgraph identifiers, one per subscription group, unique like node ids.
fn assign_group_ids(topology: &Topology) -> BTreeMap<&String, String> {
    let mut used: HashSet<String> = HashSet::new();
    topology
        .groups
        .iter()
        .map(|(key, group)| {
            let base = format!("sub_{}", sanitize_ident(&group.subscription.id));
            (key, unique_id(&mut used, base))
        })
        .collect()
}

/// Append `_2`, `_3`, ... to `base` until it is not in `used`.
fn unique_id(used: &mut HashSet<String>, base: String) -> String {
    let mut id = base.clone();
    let mut n = 2;
    while used.contains(&id) {
        id = format!("{base}_{n}");
        n += 1;
    }
    used.insert(id.clone());
    id
}

fn node_label(node: &NetworkNode, peer_count: usize, options: &RenderOptions) -> String {
    let mut label = format!("{} [p:{peer_count}]", node.name);
    if options.address_space && !node.address_space.is_empty() {
        label.push_str("<br/>");
        label.push_str(&node.address_space.join(", "));
    }
    escape_label(&label)
}

fn push_node(
    out: &mut Vec<String>,
    indent: &str,
    id: &str,
    node: &NetworkNode,
    peer_count: usize,
    options: &RenderOptions,
) {
    log::trace!("Getting style for {} peer count {peer_count}", node.name);
    let label = node_label(node, peer_count, options);
    if !node.external && peer_count > 0 {
        out.push(format!("{indent}{id}{{{{\"{label}\"}}}}"));
    } else {
        out.push(format!("{indent}{id}(\"{label}\")"));
    }
    let mut style = format!("{indent}style {id} fill:{}", peer_count_fill(peer_count));
    if node.external {
        style.push_str(",stroke-dasharray: 5 5");
    }
    out.push(style);
}

fn edge_label(edge: &PeeringEdge, state: &PeeringState) -> Option<String> {
    let mut label = edge.primary_link()?.name.clone();
    if !state.is_connected() {
        label.push_str(&format!(" ({state})"));
    }
    if edge.uses_gateway() {
        label.push_str(" [gw]");
    }
    Some(escape_label(&label))
}

fn push_edge(
    out: &mut Vec<String>,
    ids: &BTreeMap<&NodeKey, String>,
    edge: &PeeringEdge,
    options: &RenderOptions,
) {
    let (Some(a), Some(b)) = (ids.get(&edge.a), ids.get(&edge.b)) else {
        log::warn!("Edge {} - {} references an unknown node", edge.a, edge.b);
        return;
    };
    let state = edge.state();
    let link = if state.is_connected() { "---" } else { "-.-" };
    match edge_label(edge, &state).filter(|_| options.edge_labels) {
        Some(label) => out.push(format!("{INDENT}{a} {link}|\"{label}\"| {b}")),
        None => out.push(format!("{INDENT}{a} {link} {b}")),
    }
}

/// Render the topology as Mermaid lines, header first.
pub fn render_lines(topology: &Topology, options: &RenderOptions) -> Vec<String> {
    let ids = assign_node_ids(topology);
    let group_ids = assign_group_ids(topology);
    let mut out = vec![HEADER.to_string()];

    let node_indent = if options.subscription_groups {
        format!("{INDENT}{INDENT}")
    } else {
        INDENT.to_string()
    };

    for (group_key, group) in &topology.groups {
        if options.subscription_groups {
            out.push(format!(
                "{INDENT}subgraph {} [\"{}\"]",
                group_ids[group_key],
                escape_label(group.subscription.display_name())
            ));
        }
        for key in &group.members {
            let (Some(node), Some(id)) = (topology.nodes.get(key), ids.get(key)) else {
                continue;
            };
            push_node(
                &mut out,
                &node_indent,
                id,
                node,
                topology.peer_count(key),
                options,
            );
        }
        if options.subscription_groups {
            out.push(format!("{INDENT}end"));
        }
    }

    let external = topology.external_nodes().collect_vec();
    if !external.is_empty() {
        if options.subscription_groups {
            out.push(format!(
                "{INDENT}subgraph {EXTERNAL_GROUP_ID} [\"{EXTERNAL_GROUP_LABEL}\"]"
            ));
        }
        for (key, node) in external {
            push_node(
                &mut out,
                &node_indent,
                &ids[key],
                node,
                topology.peer_count(key),
                options,
            );
        }
        if options.subscription_groups {
            out.push(format!("{INDENT}end"));
        }
    }

    for edge in topology.edges.values() {
        push_edge(&mut out, &ids, edge, options);
    }

    log::info!(
        "Rendered {} nodes and {} edges into {} lines",
        topology.nodes.len(),
        topology.edges.len(),
        out.len()
    );
    out
}

/// Render the full diagram text, one statement per line.
pub fn render_diagram(topology: &Topology, options: &RenderOptions) -> String {
    let mut text = render_lines(topology, options).join("\n");
    text.push('\n');
    text
}
