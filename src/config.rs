//! Startup configuration, resolved once and handed to the watcher

use std::path::{Path, PathBuf};

use crate::error::WatchError;
use crate::types::DeviceMatch;

/// Name of the script that lives next to the binary
pub const FLASH_SCRIPT: &str = "flash.sh";

#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Device whose arrival triggers a flash
    pub target: DeviceMatch,
    /// Absolute path of the flashing script
    pub script: PathBuf,
}

impl WatchConfig {
    pub fn new(target: DeviceMatch, script: impl Into<PathBuf>) -> Self {
        Self {
            target,
            script: script.into(),
        }
    }

    /// Default target, script resolved next to the running executable
    pub fn from_current_exe() -> Result<Self, WatchError> {
        let exe = std::env::current_exe()
            .map_err(|e| WatchError::ExecutableLocation(e.to_string()))?;
        Ok(Self::new(DeviceMatch::default(), script_beside(&exe)?))
    }

    pub fn script_exists(&self) -> bool {
        self.script.is_file()
    }
}

/// `<dir of exe>/flash.sh`, following symlinks to the real install location
pub fn script_beside(exe: &Path) -> Result<PathBuf, WatchError> {
    let exe = exe.canonicalize().unwrap_or_else(|_| exe.to_path_buf());
    let dir = exe.parent().ok_or_else(|| {
        WatchError::ExecutableLocation(format!("{} has no parent directory", exe.display()))
    })?;
    Ok(dir.join(FLASH_SCRIPT))
}
