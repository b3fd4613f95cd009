//! Mock board capabilities for driving the console without hardware.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use embassy_futures::block_on;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use pico_cdc_repl::menu::{BANNER, MENU_PROMPT, SEPARATOR};
use pico_cdc_repl::{App, Console, Menu, Shell, Transport, UsbEvent};

// ============================================================================
// Transport
// ============================================================================

#[derive(Default)]
pub struct MockTransport {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
    pub events: VecDeque<UsbEvent>,
    pub connected: bool,
    pub mounted: bool,
    /// Most bytes a single `write` call accepts.
    pub write_limit: Option<usize>,
    /// Number of upcoming `write` calls that accept nothing.
    pub stalled_writes: usize,
    pub service_calls: usize,
    pub flushes: usize,
    /// `output.len()` at each flush.
    pub flush_marks: Vec<usize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            connected: true,
            mounted: true,
            ..Default::default()
        }
    }

    pub fn push_input(&mut self, s: &str) {
        self.input.extend(s.bytes());
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
        self.flush_marks.clear();
    }

    /// Every byte written so far has been followed by a flush.
    pub fn fully_flushed(&self) -> bool {
        self.flush_marks.last() == Some(&self.output.len())
    }
}

impl Transport for MockTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn bytes_available(&self) -> bool {
        !self.input.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write(&mut self, data: &[u8]) -> usize {
        if self.stalled_writes > 0 {
            self.stalled_writes -= 1;
            return 0;
        }
        let n = self.write_limit.map_or(data.len(), |limit| limit.min(data.len()));
        self.output.extend_from_slice(&data[..n]);
        n
    }

    fn flush(&mut self) {
        self.flushes += 1;
        self.flush_marks.push(self.output.len());
    }

    fn poll_event(&mut self) -> Option<UsbEvent> {
        self.events.pop_front()
    }

    async fn service(&mut self) {
        self.service_calls += 1;
    }
}

// ============================================================================
// LED and delay
// ============================================================================

/// Records every level written to it.
#[derive(Default)]
pub struct MockLed {
    pub history: Vec<bool>,
}

impl ErrorType for MockLed {
    type Error = Infallible;
}

impl OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.history.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.history.push(true);
        Ok(())
    }
}

/// Records requested delays in milliseconds without sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub delays_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

// ============================================================================
// App helpers
// ============================================================================

pub type TestApp<C> = App<MockTransport, MockLed, MockDelay, C>;

pub fn shell_app() -> TestApp<Shell> {
    App::new(MockTransport::new(), MockLed::default(), MockDelay::default(), Shell::new())
}

pub fn menu_app() -> TestApp<Menu> {
    App::new(MockTransport::new(), MockLed::default(), MockDelay::default(), Menu::new())
}

pub fn io<C: Console>(app: &mut TestApp<C>) -> &mut MockTransport {
    &mut app.context_mut().io
}

pub fn tick<C: Console>(app: &mut TestApp<C>) {
    tick_at(app, 0);
}

pub fn tick_at<C: Console>(app: &mut TestApp<C>, now_ms: u64) {
    block_on(app.tick(now_ms));
}

/// Queue `s` and tick until every byte has been consumed, giving up after
/// enough ticks for one byte each (a disconnected menu never reads).
pub fn type_input<C: Console>(app: &mut TestApp<C>, s: &str) {
    io(app).push_input(s);
    for _ in 0..=s.len() {
        if app.context().io.input.is_empty() {
            break;
        }
        tick(app);
    }
}

/// Type `s` on a clean output buffer and return what the console wrote.
pub fn run_line<C: Console>(app: &mut TestApp<C>, s: &str) -> String {
    io(app).clear_output();
    type_input(app, s);
    app.context().io.output_str()
}

/// Menu exactly as the console draws it.
pub fn menu_text() -> String {
    let mut text = String::from_utf8_lossy(BANNER).into_owned();
    text.push_str("1) Print greeting\r\n");
    text.push_str("2) Blink LED\r\n");
    text.push_str("3) Reserved\r\n");
    text.push_str("4) Reserved\r\n");
    text.push_str("5) Reserved\r\n");
    text.push_str(&String::from_utf8_lossy(SEPARATOR));
    text.push_str(&String::from_utf8_lossy(MENU_PROMPT));
    text
}
