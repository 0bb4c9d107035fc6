//! Azure CLI preflight checks and subscription lookup.

use super::{cli, parse_json};
use crate::config;
use crate::error::FetchError;
use crate::models::Subscription;
use serde::Deserialize;

/// The parts of `az version --output json` we read.
#[derive(Deserialize, Debug)]
struct AzVersion {
    #[serde(rename = "azure-cli-core")]
    azure_cli_core: String,
}

/// The parts of `az account show --output json` we read.
#[derive(Deserialize, Debug)]
struct AzAccount {
    id: String,
    name: Option<String>,
}

/// Parse a dotted version string, missing or non-numeric parts count as 0.
fn parse_version(version: &str) -> (u32, u32, u32) {
    let mut parts = version
        .trim()
        .split('.')
        .map(|p| {
            p.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
                .parse::<u32>()
                .unwrap_or(0)
        });
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

fn check_version_output(output: &str) -> Result<(), FetchError> {
    let version: AzVersion = parse_json(output, "az version")?;
    let found = parse_version(&version.azure_cli_core);
    let required = config::MIN_AZ_CLI_VERSION;
    if found < required {
        return Err(FetchError::UnsupportedVersion {
            found: version.azure_cli_core,
            required: format!("{}.{}.{}", required.0, required.1, required.2),
        });
    }
    log::debug!("azure-cli-core {} is supported", version.azure_cli_core);
    Ok(())
}

/// Verify the az executable exists, is recent enough and has a logged in account.
pub fn check_local_requirements(az: &str) -> Result<(), FetchError> {
    let output = cli::run(&format!("{} version --output json", quote(az)))?;
    check_version_output(&output)?;

    let account = cli::run(&format!("{} account show --output json", quote(az)))
        .map_err(login_error)?;
    let account: AzAccount = parse_json(&account, "az account show")?;
    log::info!("Using az login with default subscription {}", account.id);
    Ok(())
}

/// No default account at all means nobody is logged in. Other failures keep
/// the kind `from_stderr` gave them.
fn login_error(e: FetchError) -> FetchError {
    match e {
        FetchError::NotFound(msg) => FetchError::Authentication(msg),
        other => other,
    }
}

fn parse_account(output: &str) -> Result<Subscription, FetchError> {
    let account: AzAccount = parse_json(output, "az account show")?;
    Ok(Subscription {
        id: account.id,
        name: account.name,
    })
}

/// Look up a subscription's display name.
pub fn show_subscription(az: &str, subscription_id: &str) -> Result<Subscription, FetchError> {
    let output = cli::run(&format!(
        "{} account show --subscription '{subscription_id}' --output json",
        quote(az)
    ))?;
    parse_account(&output)
}

/// Quote an executable path if it contains whitespace.
pub(super) fn quote(path: &str) -> String {
    if path.contains(char::is_whitespace) {
        format!("\"{path}\"")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("2.61.0"), (2, 61, 0));
        assert_eq!(parse_version("2.27"), (2, 27, 0));
        assert_eq!(parse_version("2.30.0b1"), (2, 30, 0));
        assert!(parse_version("2.9.1") < config::MIN_AZ_CLI_VERSION);
        assert!(parse_version("2.27.0") >= config::MIN_AZ_CLI_VERSION);
    }

    #[test]
    fn test_check_version_output() {
        let ok = r#"{"azure-cli": "2.61.0", "azure-cli-core": "2.61.0", "extensions": {}}"#;
        assert!(check_version_output(ok).is_ok());

        let old = r#"{"azure-cli": "2.20.0", "azure-cli-core": "2.20.0"}"#;
        let err = check_version_output(old).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "azure-cli-core 2.20.0 is older than the required 2.27.0"
        );

        assert!(matches!(
            check_version_output(r#"{"azure-cli": "2.61.0"}"#),
            Err(FetchError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_account() {
        let output = r#"{
            "environmentName": "AzureCloud",
            "id": "1111-aaaa",
            "isDefault": true,
            "name": "Connectivity Prod",
            "state": "Enabled",
            "tenantId": "tttt"
        }"#;
        let sub = parse_account(output).unwrap();
        assert_eq!(sub.id, "1111-aaaa");
        assert_eq!(sub.display_name(), "Connectivity Prod");
    }

    #[test]
    fn test_login_error_only_reclassifies_missing_account() {
        assert!(matches!(
            login_error(FetchError::NotFound("no default subscription".into())),
            FetchError::Authentication(_)
        ));
        let proxy = FetchError::from_stderr("ERROR: HTTPSConnectionPool: Max retries exceeded with url");
        let kept = login_error(proxy);
        assert!(matches!(kept, FetchError::Command(_)));
        assert!(!kept.is_fatal());
        assert!(matches!(
            login_error(FetchError::from_stderr("ERROR: Please run 'az login' to setup account.")),
            FetchError::Authentication(_)
        ));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("az"), "az");
        assert_eq!(quote("/opt/azure cli/az"), "\"/opt/azure cli/az\"");
    }
}
