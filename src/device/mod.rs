//! Capture-device selection.
//!
//! Virtual audio-routing endpoints (BlackHole and friends) are commonly
//! installed for inter-app audio and must never be picked silently when a
//! physical microphone is present. [`DeviceSelector`] skips them and falls
//! back to index `0` when nothing else is available.
//!
//! ```
//! use noise_tray::device::DeviceSelector;
//!
//! let selector = DeviceSelector::default();
//! assert_eq!(selector.select(&["BlackHole 2ch", "MacBook Pro Microphone"]), 1);
//! assert_eq!(selector.select::<&str>(&[]), 0);
//! ```

use std::fmt;

/// Marker matched against device names when no configuration overrides it.
pub const DEFAULT_VIRTUAL_MARKER: &str = "blackhole";

// ---------------------------------------------------------------------------
// InputDevice
// ---------------------------------------------------------------------------

/// An input device as reported by the engine's enumeration.
///
/// `index` is positional and is exactly what the engine expects back when a
/// session is started on this device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    pub name: String,
    pub index: usize,
}

impl InputDevice {
    /// Pair each enumerated name with its ordinal.
    pub fn enumerate<S: AsRef<str>>(names: &[S]) -> Vec<InputDevice> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| InputDevice {
                name: name.as_ref().to_owned(),
                index,
            })
            .collect()
    }
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.name)
    }
}

// ---------------------------------------------------------------------------
// DeviceSelector
// ---------------------------------------------------------------------------

/// Picks the capture device, preferring anything that is not a virtual
/// routing device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelector {
    /// Lower-cased markers; empty strings are dropped on construction.
    markers: Vec<String>,
}

impl DeviceSelector {
    /// Build a selector from a list of virtual-device markers.
    ///
    /// Markers are compared case-insensitively. Blank markers are ignored
    /// (an empty string would otherwise match every device).
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self { markers }
    }

    /// Returns `true` when `name` looks like a virtual routing endpoint.
    pub fn is_virtual(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.markers.iter().any(|m| name.contains(m.as_str()))
    }

    /// Index of the first non-virtual device, or `0` when there is none
    /// (including the empty list, where `0` is itself out of range and the
    /// engine is left to reject it).
    pub fn select<S: AsRef<str>>(&self, devices: &[S]) -> usize {
        devices
            .iter()
            .position(|d| !self.is_virtual(d.as_ref()))
            .unwrap_or(0)
    }
}

impl Default for DeviceSelector {
    fn default() -> Self {
        Self::new([DEFAULT_VIRTUAL_MARKER])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn select(devices: &[&str]) -> usize {
        DeviceSelector::default().select(devices)
    }

    #[test]
    fn empty_list_falls_back_to_zero() {
        assert_eq!(select(&[]), 0);
    }

    #[test]
    fn only_virtual_device_falls_back_to_zero() {
        assert_eq!(select(&["BlackHole 2ch"]), 0);
    }

    #[test]
    fn skips_leading_virtual_device() {
        assert_eq!(select(&["BlackHole 2ch", "MacBook Pro Microphone"]), 1);
    }

    #[test]
    fn keeps_first_physical_device() {
        assert_eq!(select(&["USB Mic", "BlackHole 2ch"]), 0);
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        assert_eq!(
            select(&["BLACKHOLE 16ch", "blackhole 2ch", "Studio Display Microphone"]),
            2
        );
    }

    #[test]
    fn first_of_several_physical_devices_wins() {
        assert_eq!(select(&["BlackHole 2ch", "USB Mic", "Built-in Microphone"]), 1);
    }

    #[test]
    fn custom_markers_are_all_honoured() {
        let selector = DeviceSelector::new(["BlackHole", "Loopback"]);
        assert_eq!(
            selector.select(&["Loopback Audio", "BlackHole 2ch", "Yeti Stereo Microphone"]),
            2
        );
        assert!(selector.is_virtual("loopback audio"));
        assert!(!selector.is_virtual("Yeti Stereo Microphone"));
    }

    #[test]
    fn blank_markers_are_ignored() {
        let selector = DeviceSelector::new(["", "  "]);
        assert!(!selector.is_virtual("BlackHole 2ch"));
        assert_eq!(selector.select(&["BlackHole 2ch", "USB Mic"]), 0);
    }

    #[test]
    fn owned_strings_are_accepted() {
        let devices = vec!["BlackHole 2ch".to_string(), "USB Mic".to_string()];
        assert_eq!(DeviceSelector::default().select(&devices), 1);
    }

    #[test]
    fn enumerate_assigns_positional_indices() {
        let devices = InputDevice::enumerate(&["BlackHole 2ch", "USB Mic"]);
        assert_eq!(
            devices,
            vec![
                InputDevice { name: "BlackHole 2ch".into(), index: 0 },
                InputDevice { name: "USB Mic".into(), index: 1 },
            ]
        );
        assert_eq!(devices[1].to_string(), "[1] USB Mic");
    }
}
