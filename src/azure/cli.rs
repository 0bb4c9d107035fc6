//! Azure CLI command execution.
//!
//! Runs `az` commands and hands back stdout, classifying failures into
//! [`FetchError`] kinds from stderr.

use crate::config;
use crate::error::FetchError;
use colored::Colorize;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
///
/// # Errors
/// * [`FetchError::MissingCli`] if the executable cannot be started
/// * a stderr-classified error if the command exits non-zero
/// * [`FetchError::Command`] if stdout exceeds [`config::MAX_CLI_OUTPUT_BYTES`]
pub fn run(cmd: &str) -> Result<String, FetchError> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd)
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    log::trace!("split cmds={:?}", cmds);

    let Some((program, args)) = cmds.split_first() else {
        return Err(FetchError::Command("empty command".to_string()));
    };

    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        if e.kind() == std::io::ErrorKind::NotFound {
            FetchError::MissingCli(program.to_string())
        } else {
            FetchError::Command(format!("failed to execute {program}: {e}"))
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(FetchError::from_stderr(&stderr));
    }

    log::debug!("Success cmd: {cmd} stdout.len()={}", output.stdout.len());
    if output.stdout.len() > config::MAX_CLI_OUTPUT_BYTES {
        return Err(FetchError::Command(format!(
            "response too large: {} bytes for command: {:?}",
            output.stdout.len(),
            cmds
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| FetchError::Command(format!("invalid UTF-8 in az output: {e}")))
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}
