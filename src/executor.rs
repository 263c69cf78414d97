use async_trait::async_trait;
use log::{debug, warn};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Notify;
use tokio::time::timeout;

use crate::config::ToolConfig;
use crate::{Result, ScanError};

/// The external scanning utilities the orchestrator knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WirelessTool {
    Iwlist,
    Nmcli,
    Airport,
    Netsh,
    Hcitool,
}

impl WirelessTool {
    /// Program and argument vector for this tool, honoring any overrides
    /// from the tool configuration.
    pub fn argv(&self, tools: &ToolConfig) -> (String, Vec<String>) {
        match self {
            WirelessTool::Iwlist => (
                "iwlist".to_string(),
                vec!["scan".to_string()],
            ),
            WirelessTool::Nmcli => (
                "nmcli".to_string(),
                vec![
                    "-t".to_string(),
                    "-f".to_string(),
                    "BSSID,SSID,CHAN,SIGNAL,SECURITY".to_string(),
                    "dev".to_string(),
                    "wifi".to_string(),
                ],
            ),
            WirelessTool::Airport => (
                tools.airport_path.clone(),
                vec!["-s".to_string()],
            ),
            WirelessTool::Netsh => (
                "netsh".to_string(),
                vec![
                    "wlan".to_string(),
                    "show".to_string(),
                    "profiles".to_string(),
                ],
            ),
            WirelessTool::Hcitool => (
                "hcitool".to_string(),
                vec!["scan".to_string()],
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WirelessTool::Iwlist => "iwlist",
            WirelessTool::Nmcli => "nmcli",
            WirelessTool::Airport => "airport",
            WirelessTool::Netsh => "netsh",
            WirelessTool::Hcitool => "hcitool",
        }
    }
}

/// How a tool invocation went wrong. All variants are recovered locally by
/// the orchestrator (fallback tool or empty result); none reach the caller.
#[derive(Debug, Error)]
pub enum ToolFailure {
    #[error("tool not found or failed to spawn: {0}")]
    NotFound(String),

    #[error("tool exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },

    #[error("tool exceeded the {0:?} execution bound")]
    TimedOut(Duration),
}

/// Tool-level outcome: captured stdout on success, a recoverable failure
/// otherwise. Distinct from [`crate::Result`], which carries only
/// caller-visible errors such as cancellation.
pub type ToolOutcome = std::result::Result<String, ToolFailure>;

/// Cooperative cancellation signal supplied by the caller. Cloning shares
/// the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    flag: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled. Registers the waiter before
    /// re-checking the flag so a concurrent `cancel` is never missed.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Seam between the orchestrator and the operating system. The production
/// implementation spawns real child processes; tests substitute scripted
/// runners to simulate tool failures, timeouts, and cancellation.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        execution_timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<ToolOutcome>;
}

/// Runs tools as foreground child processes with captured output and a
/// hard wall-clock bound.
pub struct SystemRunner;

#[async_trait]
impl ToolRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        execution_timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<ToolOutcome> {
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        debug!("Executing: {} {}", program, args.join(" "));

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future must reap the child, otherwise a
            // timed-out tool keeps the radio hardware busy.
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", program, e);
                return Ok(Err(ToolFailure::NotFound(format!("{}: {}", program, e))));
            }
        };

        let bounded_wait = timeout(execution_timeout, child.wait_with_output());

        tokio::select! {
            _ = cancel.cancelled() => Err(ScanError::Cancelled),
            waited = bounded_wait => match waited {
                Err(_) => {
                    warn!("{} exceeded the {:?} timeout, killing it", program, execution_timeout);
                    Ok(Err(ToolFailure::TimedOut(execution_timeout)))
                }
                Ok(Err(e)) => Ok(Err(ToolFailure::NotFound(format!("{}: {}", program, e)))),
                Ok(Ok(output)) => {
                    if output.status.success() {
                        Ok(Ok(String::from_utf8_lossy(&output.stdout).into_owned()))
                    } else {
                        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                        debug!("{} exited non-zero: {}", program, stderr);
                        Ok(Err(ToolFailure::NonZeroExit {
                            status: output.status.code().unwrap_or(-1),
                            stderr,
                        }))
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_token_signals_waiters() {
        let token = CancelToken::new();
        let waiter = token.clone();

        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
            true
        });

        token.cancel();
        assert!(handle.await.unwrap());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_immediately_when_already_fired() {
        let token = CancelToken::new();
        token.cancel();
        // Must not hang.
        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_system_runner_reports_missing_tool() {
        let runner = SystemRunner;
        let outcome = runner
            .run(
                "wscan-no-such-binary",
                &[],
                Duration::from_secs(1),
                &CancelToken::new(),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, Err(ToolFailure::NotFound(_))));
    }

    #[tokio::test]
    async fn test_system_runner_rejects_pre_cancelled_call() {
        let runner = SystemRunner;
        let token = CancelToken::new();
        token.cancel();

        let result = runner
            .run("true", &[], Duration::from_secs(1), &token)
            .await;

        assert!(matches!(result, Err(ScanError::Cancelled)));
    }
}
