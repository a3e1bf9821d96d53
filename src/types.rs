//! Common types for hot-plug events

use std::fmt;

/// udev property carrying the USB vendor ID (lowercase hex, e.g. "03eb")
pub const PROP_VENDOR_ID: &str = "ID_VENDOR_ID";
/// udev property carrying the USB product ID
pub const PROP_MODEL_ID: &str = "ID_MODEL_ID";

/// Atmel / Microchip
pub const VENDOR_ID: &str = "03eb";
/// DFU bootloader product ID we flash on arrival
pub const PRODUCT_ID: &str = "2ff6";

/// Kernel uevent action
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Remove,
    Change,
    Bind,
    Unbind,
    /// Anything the kernel sends that we have no name for
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Change => "change",
            Self::Bind => "bind",
            Self::Unbind => "unbind",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for Action {
    fn from(s: &str) -> Self {
        match s {
            "add" => Self::Add,
            "remove" => Self::Remove,
            "change" => Self::Change,
            "bind" => Self::Bind,
            "unbind" => Self::Unbind,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hot-plug notification, consumed once by the watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEvent {
    pub action: Action,
    /// `ID_VENDOR_ID`, absent for interfaces and incomplete events
    pub vendor_id: Option<String>,
    /// `ID_MODEL_ID`
    pub product_id: Option<String>,
}

impl DeviceEvent {
    pub fn new(
        action: impl Into<Action>,
        vendor_id: Option<&str>,
        product_id: Option<&str>,
    ) -> Self {
        Self {
            action: action.into(),
            vendor_id: vendor_id.map(str::to_owned),
            product_id: product_id.map(str::to_owned),
        }
    }
}

impl fmt::Display for DeviceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}",
            self.action,
            self.vendor_id.as_deref().unwrap_or("????"),
            self.product_id.as_deref().unwrap_or("????")
        )
    }
}

/// VID/PID pair that triggers a flash on arrival
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMatch {
    pub vendor_id: String,
    pub product_id: String,
}

impl Default for DeviceMatch {
    fn default() -> Self {
        Self::new(VENDOR_ID, PRODUCT_ID)
    }
}

impl DeviceMatch {
    pub fn new(vendor_id: &str, product_id: &str) -> Self {
        Self {
            vendor_id: vendor_id.to_string(),
            product_id: product_id.to_string(),
        }
    }

    /// True only for an `add` of exactly this device. IDs compare case-sensitively;
    /// a missing ID never matches.
    pub fn matches(&self, event: &DeviceEvent) -> bool {
        event.action == Action::Add
            && event.vendor_id.as_deref() == Some(self.vendor_id.as_str())
            && event.product_id.as_deref() == Some(self.product_id.as_str())
    }
}

impl fmt::Display for DeviceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vendor_id, self.product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names() {
        assert_eq!(Action::from("add"), Action::Add);
        assert_eq!(Action::from("unbind"), Action::Unbind);
        assert_eq!(Action::from("online"), Action::Other("online".into()));
        assert_eq!(Action::from("online").as_str(), "online");
    }

    #[test]
    fn only_add_of_target_matches() {
        let target = DeviceMatch::default();
        assert!(target.matches(&DeviceEvent::new("add", Some("03eb"), Some("2ff6"))));

        for action in ["remove", "change", "bind", "unbind", "move"] {
            assert!(!target.matches(&DeviceEvent::new(action, Some("03eb"), Some("2ff6"))));
        }
    }

    #[test]
    fn other_devices_do_not_match() {
        let target = DeviceMatch::default();
        assert!(!target.matches(&DeviceEvent::new("add", Some("03eb"), Some("0000"))));
        assert!(!target.matches(&DeviceEvent::new("add", Some("3151"), Some("2ff6"))));
        // case-sensitive
        assert!(!target.matches(&DeviceEvent::new("add", Some("03EB"), Some("2FF6"))));
    }

    #[test]
    fn missing_ids_do_not_match() {
        let target = DeviceMatch::default();
        assert!(!target.matches(&DeviceEvent::new("add", None, Some("2ff6"))));
        assert!(!target.matches(&DeviceEvent::new("add", Some("03eb"), None)));
        assert!(!target.matches(&DeviceEvent::new("add", None, None)));
    }

    #[test]
    fn display_fills_missing_ids() {
        let ev = DeviceEvent::new("remove", Some("03eb"), None);
        assert_eq!(ev.to_string(), "remove 03eb:????");
        assert_eq!(DeviceMatch::default().to_string(), "03eb:2ff6");
    }
}
