//! Hot-plug watch loop
//!
//! Reads one event at a time and, when the configured device arrives, awaits a
//! full flash before reading the next one. Nothing runs concurrently: events
//! that arrive during a flash stay queued in the udev socket.

use std::future::Future;

use futures::{Stream, StreamExt};
use tracing::{debug, info, trace, warn};

use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::flasher::{FlashOutcome, Flasher};
use crate::types::DeviceEvent;

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchState {
    /// Blocked on the next event
    #[default]
    Idle,
    /// Flash running, event loop blocked
    Flashing,
}

pub struct Watcher<F: Flasher> {
    config: WatchConfig,
    flasher: F,
    state: WatchState,
    flashes: u64,
}

impl<F: Flasher> Watcher<F> {
    pub fn new(config: WatchConfig, flasher: F) -> Self {
        Self {
            config,
            flasher,
            state: WatchState::Idle,
            flashes: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Number of flashes that ran to the end, successful or not
    pub fn flashes(&self) -> u64 {
        self.flashes
    }

    /// Handle one event. Returns the flash outcome if it triggered one.
    pub async fn handle(&mut self, event: &DeviceEvent) -> Option<FlashOutcome> {
        if !self.config.target.matches(event) {
            trace!("Ignoring {}", event);
            return None;
        }

        info!("{} attached, flashing", self.config.target);
        self.state = WatchState::Flashing;
        let outcome = self.flasher.flash().await;
        self.state = WatchState::Idle;
        self.flashes += 1;

        match &outcome {
            FlashOutcome::Success => info!("Flash finished: {}", outcome),
            _ => warn!(
                "Flash script {} failed: {}",
                self.config.script.display(),
                outcome
            ),
        }
        Some(outcome)
    }

    /// Consume events until the source fails or runs dry.
    ///
    /// Never returns `Ok`: the udev channel closing is as fatal as it erroring.
    pub async fn run<S>(&mut self, events: S) -> Result<(), WatchError>
    where
        S: Stream<Item = Result<DeviceEvent, WatchError>>,
    {
        let mut events = std::pin::pin!(events);

        while let Some(event) = events.next().await {
            self.handle(&event?).await;
        }

        Err(WatchError::ChannelClosed)
    }

    /// Like [`run`](Self::run), but returns `Ok(())` as soon as `shutdown`
    /// resolves. A flash in progress is abandoned, not awaited.
    pub async fn run_until<S, Q>(&mut self, events: S, shutdown: Q) -> Result<(), WatchError>
    where
        S: Stream<Item = Result<DeviceEvent, WatchError>>,
        Q: Future,
    {
        tokio::select! {
            res = self.run(events) => res,
            _ = shutdown => {
                debug!("Shutdown requested");
                Ok(())
            }
        }
    }
}
