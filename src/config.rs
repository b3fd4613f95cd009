//! Compile-time configuration: timing, buffer sizes and USB identity.

/// LED toggle period while the host has not configured the device.
pub const BLINK_NOT_MOUNTED_MS: u32 = 250;
/// LED toggle period once the device is configured.
pub const BLINK_MOUNTED_MS: u32 = 1000;
/// LED toggle period while the bus is suspended.
pub const BLINK_SUSPENDED_MS: u32 = 2500;

/// Pause after a mode switch so the host notices the class change before
/// new prompt text arrives.
pub const MODE_SETTLE_MS: u32 = 10;

/// How long the LED stays lit for the menu's blink action.
pub const LED_BLINK_HOLD_MS: u32 = 200;

/// Capacity of the outbound pipe between the console and the USB sender.
pub const TX_PIPE_SIZE: usize = 256;
/// Capacity of the inbound pipe between the USB receiver and the console.
pub const RX_PIPE_SIZE: usize = 128;
/// Full-speed CDC bulk endpoint packet size.
pub const USB_PACKET_SIZE: u16 = 64;

pub const USB_VID: u16 = 0xcafe;
// 0x4000 | CDC bit; the mass-storage bit stays clear since no MSC class is built.
pub const USB_PID: u16 = 0x4001;
pub const USB_MANUFACTURER: &str = "TinyUSB";
pub const USB_PRODUCT: &str = "TinyUSB Device";
/// Used when the chip id cannot be read.
pub const USB_DEFAULT_SERIAL: &str = "123456";
