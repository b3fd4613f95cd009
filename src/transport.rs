//! Byte-level view of the USB serial link.

use crate::indicator::UsbEvent;

/// Non-blocking access to the CDC serial link and the USB device state.
///
/// Every method except [`Transport::service`] must return immediately.
/// `service` is the one place the console yields to whatever runs the USB
/// stack, and is also how [`write_all`] waits for output space.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// A terminal is attached (DTR asserted).
    fn is_connected(&self) -> bool;

    /// The host has configured the device.
    fn is_mounted(&self) -> bool;

    fn bytes_available(&self) -> bool;

    /// Take one received byte, if any.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue as much of `data` as fits and return how many bytes were taken.
    fn write(&mut self, data: &[u8]) -> usize;

    /// Push queued output towards the host.
    fn flush(&mut self);

    /// Next pending connection lifecycle event.
    fn poll_event(&mut self) -> Option<UsbEvent>;

    /// Let the USB stack make progress.
    async fn service(&mut self);
}

/// Queue all of `data`, servicing the transport while the output queue is full.
///
/// There is no timeout: a host that never drains its endpoint stalls the
/// caller here.
pub async fn write_all<T: Transport + ?Sized>(io: &mut T, data: &[u8]) {
    let mut remaining = data;
    while !remaining.is_empty() {
        let n = io.write(remaining);
        remaining = &remaining[n..];
        if n == 0 {
            io.flush();
            io.service().await;
        }
    }
}

pub async fn write_str<T: Transport + ?Sized>(io: &mut T, s: &str) {
    write_all(io, s.as_bytes()).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum LinkEdge {
    Up,
    Down,
}

/// Edge detector for a connection flag such as DTR.
#[derive(Debug, Default)]
pub struct LinkWatch {
    was_up: bool,
}

impl LinkWatch {
    pub const fn new() -> Self {
        Self { was_up: false }
    }

    pub fn is_up(&self) -> bool {
        self.was_up
    }

    /// Record the current level, reporting a change since the last call.
    pub fn update(&mut self, up: bool) -> Option<LinkEdge> {
        let edge = match (self.was_up, up) {
            (false, true) => Some(LinkEdge::Up),
            (true, false) => Some(LinkEdge::Down),
            _ => None,
        };
        self.was_up = up;
        edge
    }
}
