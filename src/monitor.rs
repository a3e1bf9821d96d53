//! udev hot-plug monitor restricted to the USB subsystem

use std::ffi::OsStr;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio_udev::{AsyncMonitorSocket, EventType, MonitorBuilder};
use tracing::debug;

use crate::error::WatchError;
use crate::types::{Action, DeviceEvent, PROP_MODEL_ID, PROP_VENDOR_ID};

pub const SUBSYSTEM: &str = "usb";

/// Netlink subscription to USB uevents.
///
/// Yields one [`DeviceEvent`] per uevent, in kernel delivery order. Ends only if
/// the socket goes away.
pub struct UsbMonitor {
    socket: AsyncMonitorSocket,
}

impl UsbMonitor {
    /// Open the udev netlink socket filtered to `usb`
    pub fn open() -> Result<Self, WatchError> {
        let socket = MonitorBuilder::new()
            .and_then(|b| b.match_subsystem(SUBSYSTEM))
            .and_then(|b| b.listen())
            .map_err(WatchError::setup)?;
        let socket = AsyncMonitorSocket::new(socket).map_err(WatchError::setup)?;

        debug!("udev monitor listening on subsystem={}", SUBSYSTEM);
        Ok(Self { socket })
    }
}

impl Stream for UsbMonitor {
    type Item = Result<DeviceEvent, WatchError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.socket).poll_next(cx).map(|item| {
            item.map(|res| {
                res.map(|event| {
                    let action = match event.event_type() {
                        EventType::Add => Action::Add,
                        EventType::Remove => Action::Remove,
                        EventType::Change => Action::Change,
                        EventType::Bind => Action::Bind,
                        EventType::Unbind => Action::Unbind,
                        _ => event
                            .action()
                            .and_then(OsStr::to_str)
                            .map(Action::from)
                            .unwrap_or_else(|| Action::Other(String::new())),
                    };
                    decode(
                        action,
                        event.property_value(PROP_VENDOR_ID),
                        event.property_value(PROP_MODEL_ID),
                    )
                })
                .map_err(WatchError::Channel)
            })
        })
    }
}

/// Build an event from raw udev properties. Non-UTF-8 values are dropped, which
/// makes the event non-matching rather than an error.
pub fn decode(action: Action, vendor: Option<&OsStr>, product: Option<&OsStr>) -> DeviceEvent {
    DeviceEvent {
        action,
        vendor_id: vendor.and_then(OsStr::to_str).map(str::to_owned),
        product_id: product.and_then(OsStr::to_str).map(str::to_owned),
    }
}
