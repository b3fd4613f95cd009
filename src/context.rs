use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::mode::Mode;
use crate::transport::{self, Transport};

/// Board capabilities plus the active [`Mode`], handed by reference to the
/// console on every tick.
///
/// The main loop is the only owner, so the mode has a single writer.
pub struct Context<T, L, D> {
    pub io: T,
    pub led: L,
    pub delay: D,
    mode: Mode,
}

impl<T, L, D> Context<T, L, D>
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
{
    pub fn new(io: T, led: L, delay: D, mode: Mode) -> Self {
        Self {
            io,
            led,
            delay,
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn switch_mode(&mut self, to: Mode) {
        info!("mode {:?} -> {:?}", self.mode, to);
        self.mode = to;
    }

    pub fn set_led(&mut self, on: bool) {
        // Pin errors are not actionable from the console.
        let _ = self.led.set_state(PinState::from(on));
    }

    pub async fn write(&mut self, data: &[u8]) {
        transport::write_all(&mut self.io, data).await
    }

    pub async fn write_str(&mut self, s: &str) {
        transport::write_str(&mut self.io, s).await
    }

    pub fn flush(&mut self) {
        self.io.flush();
    }
}
