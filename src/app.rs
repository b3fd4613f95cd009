//! Main loop glue shared by the firmware and the host simulator.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::context::Context;
use crate::indicator::StatusIndicator;
use crate::mode::Mode;
use crate::transport::Transport;

/// Input handling for one build variant.
#[allow(async_fn_in_trait)]
pub trait Console {
    /// Mode the context starts in.
    fn initial_mode(&self) -> Mode;

    /// Service input for this tick. Must not wait for input.
    async fn poll<T, L, D>(&mut self, ctx: &mut Context<T, L, D>)
    where
        T: Transport,
        L: OutputPin,
        D: DelayNs;
}

pub struct App<T, L, D, C> {
    ctx: Context<T, L, D>,
    indicator: StatusIndicator,
    console: C,
}

impl<T, L, D, C> App<T, L, D, C>
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
    C: Console,
{
    pub fn new(io: T, led: L, delay: D, console: C) -> Self {
        let mode = console.initial_mode();
        info!("console starting in {:?} mode", mode);
        Self {
            ctx: Context::new(io, led, delay, mode),
            indicator: StatusIndicator::new(),
            console,
        }
    }

    /// One pass of the main loop: transport first, so the status and input
    /// seen by the rest of the tick are fresh.
    pub async fn tick(&mut self, now_ms: u64) {
        self.ctx.io.service().await;

        while let Some(event) = self.ctx.io.poll_event() {
            let mounted = self.ctx.io.is_mounted();
            self.indicator.handle_event(event, mounted);
        }
        if let Some(level) = self.indicator.advance(now_ms) {
            self.ctx.set_led(level);
        }

        self.console.poll(&mut self.ctx).await;
    }

    pub fn context(&self) -> &Context<T, L, D> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context<T, L, D> {
        &mut self.ctx
    }

    pub fn indicator(&self) -> &StatusIndicator {
        &self.indicator
    }

    pub fn console(&self) -> &C {
        &self.console
    }
}
