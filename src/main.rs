//! autoflash
//!
//! Watches udev for USB hot-plug events and runs `flash.sh` (next to this
//! binary) each time an Atmel DFU bootloader (03eb:2ff6) is attached.
//!
//! Usage:
//!   autoflash             # watch until Ctrl-C / SIGTERM

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};

use autoflash::{ScriptFlasher, UsbMonitor, WatchConfig, Watcher};

mod cli;
use cli::Cli;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn setup_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_target(false)
        .init();
}

/// Ctrl-C / SIGTERM flips the returned receiver to `true`
fn setup_interrupt_handler() -> Result<watch::Receiver<bool>> {
    let (tx, rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = tx.send(true);
    })
    .context("Failed to install signal handler")?;
    Ok(rx)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _cli = Cli::parse();
    setup_logging();

    let config = WatchConfig::from_current_exe().context("Failed to resolve flash script path")?;
    info!(
        "autoflash v{}: watching for {} -> {}",
        VERSION,
        config.target,
        config.script.display()
    );
    if !config.script_exists() {
        warn!("{} does not exist yet", config.script.display());
    }

    let mut shutdown = setup_interrupt_handler()?;
    let monitor = UsbMonitor::open()
        .context("Failed to subscribe to udev USB events (insufficient privileges?)")?;

    let flasher = ScriptFlasher::new(config.script.clone());
    let mut watcher = Watcher::new(config, flasher);

    watcher
        .run_until(monitor, shutdown.wait_for(|stop| *stop))
        .await
        .context("Watch loop ended")?;

    Ok(())
}
