use crate::app::Console;
use crate::commands;
use crate::context::Context;
use crate::line::{LineBuffer, LineEvent};
use crate::mode::Mode;
use crate::transport::Transport;
use crate::{MAX_COMMAND_LENGTH, NEWLINE, PROMPT};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

const ERASE: &[u8] = b"\x08 \x08";

/// Dual-mode line shell: a quiet maintenance listener that only waits for
/// `repl`, and a full REPL with echo.
///
/// Each mode keeps its own line buffer.
pub struct Shell {
    maintenance_line: LineBuffer<MAX_COMMAND_LENGTH>,
    repl_line: LineBuffer<MAX_COMMAND_LENGTH>,
}

impl Shell {
    pub const fn new() -> Self {
        Self {
            maintenance_line: LineBuffer::new(),
            repl_line: LineBuffer::new(),
        }
    }

    /// Bytes typed so far in the given mode's buffer.
    pub fn pending(&self, mode: Mode) -> &[u8] {
        match mode {
            Mode::Maintenance => self.maintenance_line.as_bytes(),
            Mode::FullRepl => self.repl_line.as_bytes(),
            Mode::Menu => &[],
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Shell {
    fn initial_mode(&self) -> Mode {
        Mode::Maintenance
    }

    /// Consume at most one byte so each keystroke has at most one visible effect
    /// per tick.
    async fn poll<T, L, D>(&mut self, ctx: &mut Context<T, L, D>)
    where
        T: Transport,
        L: OutputPin,
        D: DelayNs,
    {
        if !ctx.io.bytes_available() {
            return;
        }
        let Some(byte) = ctx.io.read_byte() else {
            return;
        };

        let mode = ctx.mode();
        let line = match mode {
            Mode::Maintenance => &mut self.maintenance_line,
            Mode::FullRepl => &mut self.repl_line,
            Mode::Menu => {
                warn!("shell polled in menu mode, dropping input");
                return;
            }
        };

        match line.feed(byte) {
            LineEvent::Accumulated(c) => {
                if mode.echoes() {
                    ctx.write(&[c]).await;
                    ctx.flush();
                }
            }
            LineEvent::Backspaced => {
                if mode.echoes() {
                    ctx.write(ERASE).await;
                    ctx.flush();
                }
            }
            LineEvent::Rejected(reason) => {
                trace!("byte {} rejected: {:?}", byte, reason);
            }
            LineEvent::Submitted(text) => submit(ctx, mode, &text).await,
        }
    }
}

async fn submit<T, L, D>(ctx: &mut Context<T, L, D>, mode: Mode, line: &str)
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
{
    debug!("{:?} line submitted: {}", mode, line);

    if mode.echoes() {
        ctx.write(NEWLINE).await;
    }

    commands::execute_command(ctx, line).await;

    // The REPL always hands back a prompt, even after switching away.
    if mode.echoes() {
        ctx.write(PROMPT).await;
        ctx.flush();
    }
}
