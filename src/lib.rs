#![no_std]

#[macro_use]
mod fmt;

pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod indicator;
pub mod line;
pub mod menu;
pub mod mode;
pub mod shell;
pub mod transport;
#[cfg(target_os = "none")]
pub mod usb;

use core::fmt::{Display, Formatter};

// Common error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Error {
    Disconnected,
    BufferOverflow,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Disconnected => f.write_str("host disconnected"),
            Error::BufferOverflow => f.write_str("packet larger than buffer"),
        }
    }
}

// Common constants
pub const MAX_COMMAND_LENGTH: usize = 64;
pub const PROMPT: &[u8] = b"> ";
pub const NEWLINE: &[u8] = b"\r\n";

pub use app::{App, Console};
pub use context::Context;
pub use indicator::{StatusIndicator, UsbEvent, UsbStatus};
pub use menu::Menu;
pub use mode::Mode;
pub use shell::Shell;
pub use transport::Transport;
