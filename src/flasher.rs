//! Flashing script invocation

use std::fmt;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Result of one flash attempt. Never an error: the watcher keeps going regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashOutcome {
    Success,
    /// Non-zero exit code, `None` if terminated by a signal
    Failed(Option<i32>),
    /// Script missing, not executable, etc.
    SpawnFailed(String),
    /// Script started but its exit status could not be collected
    WaitFailed(String),
}

impl FlashOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failed(status.code())
        }
    }
}

impl fmt::Display for FlashOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("ok"),
            Self::Failed(Some(code)) => write!(f, "exit code {code}"),
            Self::Failed(None) => f.write_str("killed by signal"),
            Self::SpawnFailed(e) => write!(f, "could not start: {e}"),
            Self::WaitFailed(e) => write!(f, "lost track of script: {e}"),
        }
    }
}

/// Something that flashes the attached device
#[async_trait]
pub trait Flasher: Send + Sync {
    /// Run one flash to completion
    async fn flash(&self) -> FlashOutcome;
}

/// Runs an external script with no arguments, stdin closed and stdout/stderr
/// inherited.
#[derive(Debug, Clone)]
pub struct ScriptFlasher {
    script: PathBuf,
}

impl ScriptFlasher {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[async_trait]
impl Flasher for ScriptFlasher {
    async fn flash(&self) -> FlashOutcome {
        debug!("Running {}", self.script.display());

        // Not kill_on_drop, and in its own process group so a terminal Ctrl-C
        // aimed at the watcher does not reach a running flash.
        let child = Command::new(&self.script)
            .process_group(0)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn();

        let mut child = match child {
            Ok(c) => c,
            Err(e) => return FlashOutcome::SpawnFailed(e.to_string()),
        };

        match child.wait().await {
            Ok(status) => {
                if let Some(sig) = status.signal() {
                    debug!("{} terminated by signal {}", self.script.display(), sig);
                }
                FlashOutcome::from_status(status)
            }
            Err(e) => FlashOutcome::WaitFailed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[tokio::test]
    async fn zero_exit_is_success() {
        let outcome = ScriptFlasher::new("/bin/true").flash().await;
        assert_eq!(outcome, FlashOutcome::Success);
    }

    #[tokio::test]
    async fn non_zero_exit_is_reported_not_raised() {
        let outcome = ScriptFlasher::new("/bin/false").flash().await;
        assert_eq!(outcome, FlashOutcome::Failed(Some(1)));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn missing_script_is_spawn_failure() {
        let outcome = ScriptFlasher::new("/nonexistent/flash.sh").flash().await;
        assert!(matches!(outcome, FlashOutcome::SpawnFailed(_)));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(FlashOutcome::Success.to_string(), "ok");
        assert_eq!(FlashOutcome::Failed(Some(2)).to_string(), "exit code 2");
        assert_eq!(FlashOutcome::Failed(None).to_string(), "killed by signal");
        assert_eq!(
            FlashOutcome::WaitFailed("ECHILD".into()).to_string(),
            "lost track of script: ECHILD"
        );
        assert!(FlashOutcome::SpawnFailed("ENOENT".into())
            .to_string()
            .starts_with("could not start"));
    }

    #[tokio::test]
    async fn script_runs_in_its_own_process_group() {
        // Exits 0 only if the shell leads its own process group
        let script = std::env::temp_dir().join(format!("autoflash-pgrp-{}.sh", std::process::id()));
        std::fs::write(
            &script,
            "#!/bin/sh\nread -r _ _ _ _ pgrp _ < /proc/$$/stat\n[ \"$pgrp\" = \"$$\" ]\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let outcome = ScriptFlasher::new(&script).flash().await;
        let _ = std::fs::remove_file(&script);
        assert_eq!(outcome, FlashOutcome::Success);
    }
}
