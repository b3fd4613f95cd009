//! Numbered single-key menu.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::app::Console;
use crate::config::LED_BLINK_HOLD_MS;
use crate::context::Context;
use crate::mode::Mode;
use crate::transport::{LinkEdge, LinkWatch, Transport};
use crate::NEWLINE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum MenuAction {
    Greet,
    BlinkLed,
    /// Slot with no behaviour yet.
    Reserved,
}

pub struct MenuEntry {
    pub key: u8,
    pub description: &'static str,
    pub action: MenuAction,
}

pub const MENU_ENTRIES: &[MenuEntry] = &[
    MenuEntry {
        key: b'1',
        description: "Print greeting",
        action: MenuAction::Greet,
    },
    MenuEntry {
        key: b'2',
        description: "Blink LED",
        action: MenuAction::BlinkLed,
    },
    MenuEntry {
        key: b'3',
        description: "Reserved",
        action: MenuAction::Reserved,
    },
    MenuEntry {
        key: b'4',
        description: "Reserved",
        action: MenuAction::Reserved,
    },
    MenuEntry {
        key: b'5',
        description: "Reserved",
        action: MenuAction::Reserved,
    },
];

pub const BANNER: &[u8] = b"\r\n=== Pico CDC Menu ===\r\n";
pub const SEPARATOR: &[u8] = b"---------------------\r\n";
pub const MENU_PROMPT: &[u8] = b"Select: ";
pub const GREETING: &[u8] = b"\r\nHello from the Pico!\r\n";
pub const BLINKED: &[u8] = b"\r\nLED blinked.\r\n";
pub const NOT_IMPLEMENTED: &[u8] = b"\r\nNot implemented yet.\r\n";
pub const UNKNOWN_CHOICE: &[u8] = b"\r\n? unknown choice\r\n";

/// First entry whose key matches.
pub fn lookup(key: u8) -> Option<MenuAction> {
    MENU_ENTRIES
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| entry.action)
}

/// Single-key menu, redrawn after every handled key and whenever a terminal
/// attaches.
pub struct Menu {
    terminal: LinkWatch,
}

impl Menu {
    pub const fn new() -> Self {
        Self {
            terminal: LinkWatch::new(),
        }
    }

    async fn draw<T, L, D>(&self, ctx: &mut Context<T, L, D>)
    where
        T: Transport,
        L: OutputPin,
        D: DelayNs,
    {
        ctx.write(BANNER).await;
        for entry in MENU_ENTRIES {
            ctx.write(&[entry.key]).await;
            ctx.write(b") ").await;
            ctx.write_str(entry.description).await;
            ctx.write(NEWLINE).await;
        }
        ctx.write(SEPARATOR).await;
        ctx.write(MENU_PROMPT).await;
        ctx.flush();
    }

    async fn handle_key<T, L, D>(&self, ctx: &mut Context<T, L, D>, key: u8)
    where
        T: Transport,
        L: OutputPin,
        D: DelayNs,
    {
        match lookup(key) {
            Some(MenuAction::Greet) => ctx.write(GREETING).await,
            Some(MenuAction::BlinkLed) => {
                ctx.set_led(true);
                ctx.delay.delay_ms(LED_BLINK_HOLD_MS).await;
                ctx.set_led(false);
                ctx.write(BLINKED).await;
            }
            Some(MenuAction::Reserved) => ctx.write(NOT_IMPLEMENTED).await,
            None => {
                debug!("unknown menu key {}", key);
                ctx.write(UNKNOWN_CHOICE).await;
            }
        }
        self.draw(ctx).await;
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Menu {
    fn initial_mode(&self) -> Mode {
        Mode::Menu
    }

    /// Redraw on a terminal attaching, then drain every available byte.
    ///
    /// Input that arrives with no terminal attached is discarded, so a host
    /// sending with DTR low can never fill the receive path.
    async fn poll<T, L, D>(&mut self, ctx: &mut Context<T, L, D>)
    where
        T: Transport,
        L: OutputPin,
        D: DelayNs,
    {
        let edge = self.terminal.update(ctx.io.is_connected());

        if !self.terminal.is_up() {
            let mut dropped = 0usize;
            while ctx.io.read_byte().is_some() {
                dropped += 1;
            }
            if dropped > 0 {
                debug!("discarded {} bytes while detached", dropped);
            }
            return;
        }
        if edge == Some(LinkEdge::Up) {
            debug!("terminal attached, drawing menu");
            self.draw(ctx).await;
        }

        while ctx.io.bytes_available() {
            let Some(byte) = ctx.io.read_byte() else {
                break;
            };
            // Enter and other whitespace are not selections.
            if byte.is_ascii_graphic() {
                self.handle_key(ctx, byte).await;
            }
        }
    }
}
