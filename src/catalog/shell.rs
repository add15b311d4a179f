//! # Shell Execution
//!
//! Commands from the configuration are shell snippets run through `sh -c`.
//!
//! | Function | Stdio | Used by |
//! |----------|-------|---------|
//! | [`run_interactive`] | inherited | action / prompt handlers, `each` commands |
//! | [`capture`] | piped | detail bodies, dynamic item lists |
//!
//! Arguments are passed as positional parameters, so a command refers to them
//! as `"$1"`, `"$2"`, ... and never has user input spliced into its text:
//!
//! ```text
//! sh -c '<command>' opsdeck <arg1> <arg2> ...
//! ```

use anyhow::{Context, Result};
use std::process::{Command, Stdio};

/// `$0` inside every command.
const SHELL_NAME: &str = "opsdeck";

fn shell(command: &str, args: &[String]) -> Result<Command> {
    if command.trim().is_empty() {
        anyhow::bail!("Command cannot be empty");
    }
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).arg(SHELL_NAME).args(args);
    Ok(cmd)
}

/// Run `command` with full terminal access and return its exit code.
pub fn run_interactive(command: &str, args: &[String]) -> Result<i32> {
    log::info!("Running '{}' with {} args", command, args.len());
    let status = shell(command, args)?
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute '{}'", command))?;

    let code = status.code().unwrap_or(1);
    if code != 0 {
        log::warn!("'{}' exited with status {}", command, code);
    }
    Ok(code)
}

/// Run `command` and return its stdout. A non-zero exit is an error carrying stderr.
pub fn capture(command: &str) -> Result<String> {
    let output = shell(command, &[])?
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to execute '{}'", command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "'{}' exited with status {}: {}",
            command,
            output.status.code().unwrap_or(1),
            stderr.trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Non-empty trimmed lines of `output`.
pub fn output_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_rejected() {
        assert!(run_interactive("", &[]).is_err());
        assert!(capture("   ").is_err());
    }

    #[test]
    fn test_capture_stdout() {
        let out = capture("echo hello; echo world").expect("capture");
        assert_eq!(out, "hello\nworld\n");
    }

    #[test]
    fn test_capture_failure_carries_stderr() {
        let err = capture("echo boom >&2; exit 3").expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("status 3"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_run_interactive_exit_code_and_args() {
        let code = run_interactive("test \"$1\" = alpha && test \"$2\" = 'b c'", &[
            "alpha".to_string(),
            "b c".to_string(),
        ])
        .expect("run");
        assert_eq!(code, 0);

        let code = run_interactive("exit 4", &[]).expect("run");
        assert_eq!(code, 4);
    }

    #[test]
    fn test_output_lines_skips_blanks() {
        assert_eq!(output_lines("a\n\n  b  \n"), ["a", "b"]);
        assert!(output_lines("").is_empty());
    }
}
