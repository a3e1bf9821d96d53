//! Watcher error types

use std::io;

use thiserror::Error;

/// Errors that end the watch loop
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to open udev monitor: {0}")]
    MonitorSetup(#[source] io::Error),

    #[error("udev permission denied: {0}")]
    MonitorPermissionDenied(#[source] io::Error),

    #[error("udev event channel failed: {0}")]
    Channel(#[source] io::Error),

    #[error("udev event channel closed")]
    ChannelClosed,

    #[error("Cannot locate program directory: {0}")]
    ExecutableLocation(String),
}

impl WatchError {
    /// Classify an I/O error raised while building the monitor socket
    pub fn setup(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::PermissionDenied {
            WatchError::MonitorPermissionDenied(e)
        } else {
            WatchError::MonitorSetup(e)
        }
    }
}
