//! Status LED driven by the USB connection lifecycle.

use crate::config::{BLINK_MOUNTED_MS, BLINK_NOT_MOUNTED_MS, BLINK_SUSPENDED_MS};

/// Lifecycle callbacks reported by the USB stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum UsbEvent {
    Mounted,
    Unmounted,
    Suspended,
    Resumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum UsbStatus {
    NotMounted,
    Mounted,
    Suspended,
}

impl UsbStatus {
    pub const fn blink_interval_ms(self) -> u32 {
        match self {
            UsbStatus::NotMounted => BLINK_NOT_MOUNTED_MS,
            UsbStatus::Mounted => BLINK_MOUNTED_MS,
            UsbStatus::Suspended => BLINK_SUSPENDED_MS,
        }
    }
}

/// Blink oscillator whose period encodes [`UsbStatus`].
#[derive(Debug)]
pub struct StatusIndicator {
    status: UsbStatus,
    last_toggle_ms: u64,
    level: bool,
}

impl StatusIndicator {
    pub const fn new() -> Self {
        Self {
            status: UsbStatus::NotMounted,
            last_toggle_ms: 0,
            level: false,
        }
    }

    pub fn status(&self) -> UsbStatus {
        self.status
    }

    pub fn interval_ms(&self) -> u32 {
        self.status.blink_interval_ms()
    }

    pub fn level(&self) -> bool {
        self.level
    }

    /// Apply a lifecycle event. `mounted` is the current configured state,
    /// consulted on resume since a resume can happen before enumeration.
    pub fn handle_event(&mut self, event: UsbEvent, mounted: bool) {
        let status = match event {
            UsbEvent::Mounted => UsbStatus::Mounted,
            UsbEvent::Unmounted => UsbStatus::NotMounted,
            UsbEvent::Suspended => UsbStatus::Suspended,
            UsbEvent::Resumed if mounted => UsbStatus::Mounted,
            UsbEvent::Resumed => UsbStatus::NotMounted,
        };
        if status != self.status {
            debug!(
                "usb {:?}: blink interval {} ms",
                event,
                status.blink_interval_ms()
            );
        }
        self.status = status;
    }

    /// Toggle the level once if a full interval has elapsed since the last
    /// toggle, returning the new level.
    ///
    /// The toggle timestamp advances by exactly one interval, so a stalled
    /// caller catches up one step per call without drifting.
    pub fn advance(&mut self, now_ms: u64) -> Option<bool> {
        let interval = u64::from(self.interval_ms());
        if now_ms.saturating_sub(self.last_toggle_ms) < interval {
            return None;
        }
        self.last_toggle_ms += interval;
        self.level = !self.level;
        Some(self.level)
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new()
    }
}
