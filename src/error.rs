//! Error types.
//!
//! [`FetchError`] covers everything that can go wrong while talking to Azure,
//! [`AppError`] is what `main` turns into an exit code.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Failure while fetching a subscription's topology.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited by Azure: {0}")]
    RateLimit(String),

    #[error("az command failed: {0}")]
    Command(String),

    #[error("unexpected az output at '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Azure CLI '{0}' not found, install it or set AZ_CLI_PATH")]
    MissingCli(String),

    #[error("azure-cli-core {found} is older than the required {required}")]
    UnsupportedVersion { found: String, required: String },
}

impl FetchError {
    /// Fatal errors abort the whole run instead of skipping a subscription.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchError::Authentication(_)
                | FetchError::MissingCli(_)
                | FetchError::UnsupportedVersion { .. }
        )
    }

    /// Map az stderr output onto an error kind.
    pub fn from_stderr(stderr: &str) -> FetchError {
        let message = first_error_line(stderr);
        if auth_regex().is_match(stderr) {
            FetchError::Authentication(message)
        } else if rate_limit_regex().is_match(stderr) {
            FetchError::RateLimit(message)
        } else if not_found_regex().is_match(stderr) {
            FetchError::NotFound(message)
        } else {
            FetchError::Command(message)
        }
    }
}

fn auth_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)az login|AADSTS\d+|InvalidAuthenticationToken|ExpiredAuthenticationToken|refresh token has expired|no subscriptions found",
        )
        .expect("Invalid Regex")
    })
}

fn rate_limit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)TooManyRequests|\b429\b|throttl").expect("Invalid Regex")
    })
}

fn not_found_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)SubscriptionNotFound|ResourceNotFound|ResourceGroupNotFound|not found|could not be found|doesn't exist")
            .expect("Invalid Regex")
    })
}

/// az prints warnings before the actual error, prefer the `ERROR:` line.
fn first_error_line(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| lines.first())
        .map(|l| l.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| "no error output".to_string())
}

/// Top level failure of a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not write diagram to {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not initialise logging: {0}")]
    Logging(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_) => 2,
            AppError::Fetch(FetchError::Authentication(_)) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_login_required() {
        let stderr = "ERROR: Please run 'az login' to setup account.\n";
        let err = FetchError::from_stderr(stderr);
        assert!(matches!(err, FetchError::Authentication(_)));
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "authentication failed: Please run 'az login' to setup account.");
    }

    #[test]
    fn test_classify_expired_token() {
        let stderr = "WARNING: something\nERROR: AADSTS700082: The refresh token has expired due to inactivity.";
        assert!(matches!(
            FetchError::from_stderr(stderr),
            FetchError::Authentication(_)
        ));
    }

    #[test]
    fn test_classify_subscription_not_found() {
        let stderr = "ERROR: Subscription 'sub-x' not found. Check the spelling and casing and try again.";
        let err = FetchError::from_stderr(stderr);
        assert!(matches!(err, FetchError::NotFound(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_classify_throttled() {
        let stderr = "ERROR: (TooManyRequests) The request is being throttled.\nCode: TooManyRequests";
        let err = FetchError::from_stderr(stderr);
        assert!(matches!(err, FetchError::RateLimit(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_classify_other() {
        let err = FetchError::from_stderr("ERROR: (AuthorizationFailed) no read permission");
        assert!(matches!(err, FetchError::Command(_)));
        assert_eq!(err.to_string(), "az command failed: (AuthorizationFailed) no read permission");
    }

    #[test]
    fn test_classify_empty_stderr() {
        let err = FetchError::from_stderr("");
        assert_eq!(err.to_string(), "az command failed: no error output");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::Usage("x".into()).exit_code(), 2);
        assert_eq!(
            AppError::from(FetchError::Authentication("x".into())).exit_code(),
            3
        );
        assert_eq!(
            AppError::from(FetchError::MissingCli("az".into())).exit_code(),
            1
        );
    }
}
