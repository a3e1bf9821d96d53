// autoflash - USB hot-plug watcher
// Runs a flashing script whenever a DFU bootloader shows up on the bus

pub mod config;
pub mod error;
pub mod flasher;
pub mod monitor;
pub mod types;
pub mod watcher;

pub use config::{WatchConfig, FLASH_SCRIPT};
pub use error::WatchError;
pub use flasher::{FlashOutcome, Flasher, ScriptFlasher};
pub use monitor::UsbMonitor;
pub use types::{Action, DeviceEvent, DeviceMatch, PRODUCT_ID, VENDOR_ID};
pub use watcher::{WatchState, Watcher};
