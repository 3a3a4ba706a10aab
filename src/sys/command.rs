use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// Every external call is bounded; a tool that hangs is handled like a tool
/// that is not installed.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum SysError {
    #[error("required command `{0}` not found in PATH")]
    ToolMissing(String),
    #[error("command `{tool}` timed out after {timeout:?}")]
    ToolTimedOut { tool: String, timeout: Duration },
    #[error("command `{tool}` failed: {reason}")]
    ToolFailed { tool: String, reason: String },
}

/// Runs an external command and returns its trimmed stdout.
pub async fn run_command(program: &str, args: &[&str]) -> Result<String, SysError> {
    let result = tokio::time::timeout(
        COMMAND_TIMEOUT,
        Command::new(program).args(args).kill_on_drop(true).output(),
    )
    .await;

    let output = match result {
        Err(_) => {
            return Err(SysError::ToolTimedOut {
                tool: program.to_string(),
                timeout: COMMAND_TIMEOUT,
            });
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SysError::ToolMissing(program.to_string()));
        }
        Ok(Err(e)) => {
            return Err(SysError::ToolFailed {
                tool: program.to_string(),
                reason: e.to_string(),
            });
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        return Err(SysError::ToolFailed {
            tool: program.to_string(),
            reason: format!(
                "exit status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stdout_is_trimmed() {
        let out = run_command("echo", &["hello"]).await.unwrap();
        assert_eq!(out, "hello");
    }

    #[tokio::test]
    async fn missing_tool_is_classified() {
        let err = run_command("xsnap-no-such-tool", &[]).await.unwrap_err();
        assert!(matches!(err, SysError::ToolMissing(_)));
    }

    #[tokio::test]
    async fn nonzero_exit_is_a_failure() {
        let err = run_command("false", &[]).await.unwrap_err();
        assert!(matches!(err, SysError::ToolFailed { .. }));
    }
}
