//! Shared subprocess helpers for collectors that shell out to vendor tools.

use std::process::{Command, Stdio};

use crate::collector::CollectError;

/// Check if a command exists by running `which` (or `where` on Windows).
pub fn command_exists(name: &str) -> bool {
    let finder = if cfg!(windows) { "where" } else { "which" };
    Command::new(finder)
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a command and return its stdout as UTF-8 text.
///
/// A non-zero exit status or undecodable output is a [`CollectError::Gpu`] —
/// the only callers are GPU probes.
pub fn run_command(program: &str, args: &[&str]) -> Result<String, CollectError> {
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(CollectError::Gpu(format!(
            "{program} exited with {}",
            output.status
        )));
    }
    String::from_utf8(output.stdout)
        .map_err(|_| CollectError::Gpu(format!("{program} produced non-UTF-8 output")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_is_not_detected() {
        assert!(!command_exists("definitely-not-a-real-binary-name-42"));
    }

    #[test]
    fn run_command_surfaces_spawn_failure_as_error() {
        assert!(run_command("definitely-not-a-real-binary-name-42", &[]).is_err());
    }
}
