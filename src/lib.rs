//! Render Azure virtual network peering topology as a Mermaid diagram.
//!
//! The flow is linear: resolve subscription IDs, fetch each subscription
//! through the Azure CLI, merge into one [`processing::Topology`], render
//! Mermaid text and write it out.
//!
//! - [`azure`] - Azure CLI access, the [`azure::TopologySource`] seam and the fetch cache
//! - [`models`] - Resource IDs, VNets, peerings and subscriptions
//! - [`processing`] - Topology merging
//! - [`output`] - Mermaid rendering and file output

pub mod azure;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;

use azure::{AzCliSource, CachedSource, TopologySource};
use cli::Args;
use error::AppError;
use processing::Topology;

/// Fetch, merge, render and write using the given source.
pub fn run_with_source<S: TopologySource>(args: &Args, source: &S) -> Result<Topology, AppError> {
    let subscription_ids = cli::resolve_subscription_ids(args)?;

    log::info!("Collecting data for {} subscriptions", subscription_ids.len());
    let topology = processing::collect_topology(source, &subscription_ids)?;

    log::info!("Rendering data");
    let text = output::render_diagram(&topology, &args.render_options());

    log::info!("Writing output to {}", args.output.display());
    output::write_diagram(&args.output, &text)?;
    Ok(topology)
}

/// Run against the local Azure CLI, through the cache when `--cache-dir` is set.
pub fn run(args: &Args) -> Result<(), AppError> {
    let az = AzCliSource::new();
    match &args.cache_dir {
        Some(dir) => run_with_source(args, &CachedSource::new(az, dir))?,
        None => run_with_source(args, &az)?,
    };
    Ok(())
}
