//! Host simulator: the console on stdin/stdout, without USB hardware.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::io::{self, Read, Stdout, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use log::{debug, error, info, trace};
use pico_cdc_repl::{App, Console, Transport, UsbEvent};

use crate::TICK_MS;

/// Stdin bytes arrive from a reader thread; stdout stands in for the IN endpoint.
struct StdioTransport {
    rx: Receiver<u8>,
    inbox: VecDeque<u8>,
    events: VecDeque<UsbEvent>,
    stdin_open: bool,
    stdout: Stdout,
}

impl StdioTransport {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut stdin = io::stdin().lock();
            let mut byte = [0u8; 1];
            while let Ok(1) = stdin.read(&mut byte) {
                if tx.send(byte[0]).is_err() {
                    break;
                }
            }
        });

        Self {
            rx,
            inbox: VecDeque::new(),
            // A host-side "device" is enumerated as soon as it exists.
            events: VecDeque::from([UsbEvent::Mounted]),
            stdin_open: true,
            stdout: io::stdout(),
        }
    }

    fn is_closed(&self) -> bool {
        !self.stdin_open && self.inbox.is_empty()
    }
}

impl Transport for StdioTransport {
    fn is_connected(&self) -> bool {
        !self.is_closed()
    }

    fn is_mounted(&self) -> bool {
        true
    }

    fn bytes_available(&self) -> bool {
        !self.inbox.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.inbox.pop_front()
    }

    fn write(&mut self, data: &[u8]) -> usize {
        match self.stdout.write(data) {
            Ok(n) => n,
            Err(e) => {
                error!("stdout write failed: {}", e);
                data.len()
            }
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.stdout.flush() {
            error!("stdout flush failed: {}", e);
        }
    }

    fn poll_event(&mut self) -> Option<UsbEvent> {
        self.events.pop_front()
    }

    async fn service(&mut self) {
        loop {
            match self.rx.try_recv() {
                // Cooked terminals end lines with LF where a serial terminal sends CR.
                Ok(b'\n') => self.inbox.push_back(b'\r'),
                Ok(byte) => self.inbox.push_back(byte),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.stdin_open {
                        debug!("stdin closed");
                        self.stdin_open = false;
                    }
                    break;
                }
            }
        }
    }
}

struct LogLed;

impl ErrorType for LogLed {
    type Error = Infallible;
}

impl OutputPin for LogLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        trace!("led off");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        trace!("led on");
        Ok(())
    }
}

struct SleepDelay;

impl DelayNs for SleepDelay {
    async fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

pub fn run<C: Console>(console: C) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("host simulator: type commands, end with Ctrl-D");

    let start = Instant::now();
    let mut app = App::new(StdioTransport::spawn(), LogLed, SleepDelay, console);

    embassy_futures::block_on(async {
        while !app.context().io.is_closed() {
            app.tick(start.elapsed().as_millis() as u64).await;
            thread::sleep(Duration::from_millis(TICK_MS));
        }
    });
}
