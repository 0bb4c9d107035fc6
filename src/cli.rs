//! Command-line arguments.
//!
//! The tool historically used multi-letter single-dash flags (`-sf`, `-el`,
//! `-sg`). clap only knows single-character shorts, so [`normalize_args`]
//! rewrites those to their long aliases before parsing.

use crate::error::AppError;
use crate::output::RenderOptions;
use clap::{ArgAction, ArgGroup, Parser};
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// Render Azure VNet peerings of one or more subscriptions as a Mermaid graph.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("subscription_source")
        .required(true)
        .args(["subscriptions", "subscription_file"])
))]
pub struct Args {
    /// Subscription to render, can be used multiple times
    #[arg(short = 's', long = "subscription", value_name = "SUBSCRIPTION_ID")]
    pub subscriptions: Vec<String>,

    /// File with subscriptions to render, one ID per line
    #[arg(long = "subscription-file", visible_alias = "sf", value_name = "FILE")]
    pub subscription_file: Option<PathBuf>,

    /// Output file for the Mermaid definition
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Label edges with the peering name
    #[arg(long = "edge-labels", visible_alias = "el")]
    pub edge_labels: bool,

    /// Group VNets into one subgraph per subscription
    #[arg(long = "subscription-groups", visible_alias = "sg")]
    pub subscription_groups: bool,

    /// Show VNet address prefixes in node labels
    #[arg(short = 'a', long = "address-space")]
    pub address_space: bool,

    /// Cache az results per subscription and day in this directory
    #[arg(short = 'c', long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Stackable verbosity level, e.g. -vv
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            edge_labels: self.edge_labels,
            subscription_groups: self.subscription_groups,
            address_space: self.address_space,
        }
    }
}

/// Rewrite legacy `-sf`/`-el`/`-sg` flags to `--sf`/`--el`/`--sg`.
pub fn normalize_args<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.as_str() {
            "-sf" | "-el" | "-sg" => format!("-{arg}"),
            _ => match arg.strip_prefix("-sf=") {
                Some(value) => format!("--sf={value}"),
                None => arg,
            },
        })
        .collect()
}

/// Parse subscription IDs from file content: trimmed, skipping blanks and `#` comments.
pub fn parse_subscription_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn read_subscription_file(path: &Path) -> Result<Vec<String>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Usage(format!(
            "could not read subscription file {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse_subscription_lines(&content))
}

/// Subscription IDs from `-s` or `-sf`, de-duplicated in first-seen order.
pub fn resolve_subscription_ids(args: &Args) -> Result<Vec<String>, AppError> {
    let raw = match &args.subscription_file {
        Some(path) => read_subscription_file(path)?,
        None => args.subscriptions.iter().map(|s| s.trim().to_string()).collect(),
    };
    let ids = raw
        .into_iter()
        .filter(|s| !s.is_empty())
        .unique_by(|s| s.to_lowercase())
        .collect_vec();
    if ids.is_empty() {
        return Err(AppError::Usage("no subscription IDs given".to_string()));
    }
    // Quotes would break the az command line split.
    if let Some(bad) = ids.iter().find(|id| id.contains(['\'', '"'])) {
        return Err(AppError::Usage(format!(
            "subscription ID {bad} must not contain quotes"
        )));
    }
    log::debug!("Resolved {} subscriptions: {:?}", ids.len(), ids);
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(normalize_args(args.iter().copied()))
    }

    #[test]
    fn test_normalize_legacy_flags() {
        let args = normalize_args(["prog", "-sf", "subs.txt", "-el", "-sg", "-s", "x", "-sf=a"]);
        assert_eq!(
            args,
            vec!["prog", "--sf", "subs.txt", "--el", "--sg", "-s", "x", "--sf=a"]
        );
    }

    #[test]
    fn test_parse_repeated_subscriptions() {
        let args = parse(&["prog", "-s", "sub-a", "-s", "sub-b", "-o", "out.mmd", "-el", "-vv"]).unwrap();
        assert_eq!(args.subscriptions, vec!["sub-a", "sub-b"]);
        assert_eq!(args.output, PathBuf::from("out.mmd"));
        assert!(args.edge_labels);
        assert!(!args.subscription_groups);
        assert_eq!(args.verbosity, 2);
        assert_eq!(
            args.render_options(),
            RenderOptions {
                edge_labels: true,
                subscription_groups: false,
                address_space: false,
            }
        );
    }

    #[test]
    fn test_parse_subscription_file_and_groups() {
        let args = parse(&["prog", "-sf", "subs.txt", "-o", "out.mmd", "-sg", "-a", "-c", "cache"]).unwrap();
        assert_eq!(args.subscription_file, Some(PathBuf::from("subs.txt")));
        assert!(args.subscription_groups);
        assert!(args.address_space);
        assert_eq!(args.cache_dir, Some(PathBuf::from("cache")));
        assert_eq!(args.verbosity, 0);
    }

    #[test]
    fn test_output_is_required() {
        let err = parse(&["prog", "-s", "sub-a"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_subscription_source_is_required() {
        let err = parse(&["prog", "-o", "out.mmd"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_subscription_sources_conflict() {
        let err = parse(&["prog", "-s", "a", "-sf", "subs.txt", "-o", "out.mmd"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_parse_subscription_lines() {
        let content = "# prod\nsub-a\n\n  sub-b  \n  # disabled\nsub-c\n";
        assert_eq!(parse_subscription_lines(content), vec!["sub-a", "sub-b", "sub-c"]);
    }

    #[test]
    fn test_resolve_from_file_dedups() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sub-b\n# comment\nsub-a\nSUB-B\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let args = parse(&["prog", "-sf", &path, "-o", "out.mmd"]).unwrap();
        assert_eq!(resolve_subscription_ids(&args).unwrap(), vec!["sub-b", "sub-a"]);
    }

    #[test]
    fn test_resolve_missing_file_is_usage_error() {
        let args = parse(&["prog", "-sf", "/nonexistent/subs.txt", "-o", "out.mmd"]).unwrap();
        let err = resolve_subscription_ids(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_resolve_empty_file_is_usage_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let args = parse(&["prog", "-sf", &path, "-o", "out.mmd"]).unwrap();
        assert!(matches!(
            resolve_subscription_ids(&args),
            Err(AppError::Usage(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_quoted_ids() {
        let args = parse(&["prog", "-s", "sub-a", "-s", "it's-mine", "-o", "out.mmd"]).unwrap();
        let err = resolve_subscription_ids(&args).unwrap_err();
        assert!(matches!(err, AppError::Usage(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
