use crate::config::MODE_SETTLE_MS;
use crate::context::Context;
use crate::mode::Mode;
use crate::transport::Transport;
use crate::{NEWLINE, PROMPT};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum ShellAction {
    EnterRepl,
    Mount,
    Help,
    Status,
}

pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub action: ShellAction,
}

pub const MAINTENANCE_COMMANDS: &[CommandInfo] = &[CommandInfo {
    name: "repl",
    description: "Enter the full REPL",
    action: ShellAction::EnterRepl,
}];

pub const REPL_COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        description: "Show this message",
        action: ShellAction::Help,
    },
    CommandInfo {
        name: "status",
        description: "Show system status",
        action: ShellAction::Status,
    },
    CommandInfo {
        name: "mount",
        description: "Return to MSC mode",
        action: ShellAction::Mount,
    },
];

pub fn get_commands(mode: Mode) -> &'static [CommandInfo] {
    match mode {
        Mode::Maintenance => MAINTENANCE_COMMANDS,
        Mode::FullRepl => REPL_COMMANDS,
        Mode::Menu => &[],
    }
}

/// Exact match of an already lowercased line against the mode's commands.
pub fn lookup(mode: Mode, line: &str) -> Option<ShellAction> {
    get_commands(mode)
        .iter()
        .find(|cmd| cmd.name == line)
        .map(|cmd| cmd.action)
}

/// Run a submitted line in the context's current mode.
///
/// Prompts and line breaks around the command belong to the caller; this
/// only writes the command's own output.
pub async fn execute_command<T, L, D>(ctx: &mut Context<T, L, D>, line: &str)
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
{
    let mode = ctx.mode();
    match (mode, lookup(mode, line)) {
        (_, Some(ShellAction::EnterRepl)) => cmd_enter_repl(ctx).await,
        (_, Some(ShellAction::Mount)) => cmd_mount(ctx).await,
        (_, Some(ShellAction::Help)) => cmd_help(ctx).await,
        (_, Some(ShellAction::Status)) => cmd_status(ctx).await,
        (_, None) if line.is_empty() => {}
        (Mode::Maintenance, None) => {
            ctx.write(b"\r\nSend 'repl' to enter maintenance mode.\r\n")
                .await;
            ctx.flush();
        }
        (Mode::FullRepl, None) => {
            debug!("unknown command in {:?} mode", mode);
            ctx.write(b"Unknown command in REPL mode.\r\n").await;
        }
        // The menu takes single keys and has no line commands.
        (Mode::Menu, None) => {
            warn!("line submitted in menu mode ignored");
        }
    }
}

async fn cmd_enter_repl<T, L, D>(ctx: &mut Context<T, L, D>)
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
{
    ctx.switch_mode(Mode::FullRepl);
    ctx.delay.delay_ms(MODE_SETTLE_MS).await;
    ctx.write(b"\r\n--- Switched to Full REPL Mode ---\r\n").await;
    ctx.write(b"Drive is now unmounted.\r\n").await;
    ctx.write(PROMPT).await;
    ctx.flush();
}

async fn cmd_mount<T, L, D>(ctx: &mut Context<T, L, D>)
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
{
    ctx.switch_mode(Mode::Maintenance);
    ctx.delay.delay_ms(MODE_SETTLE_MS).await;
    ctx.write(b"\r\n--- Switched to MSC Mode ---\r\n").await;
    ctx.write(b"Drive is now mounted.\r\n").await;
    ctx.flush();
}

async fn cmd_help<T, L, D>(ctx: &mut Context<T, L, D>)
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
{
    ctx.write(b"Full REPL Commands:\r\n").await;

    let commands = get_commands(ctx.mode());
    let width = commands.iter().map(|cmd| cmd.name.len()).max().unwrap_or(0);

    for cmd in commands {
        ctx.write(b"  ").await;
        ctx.write_str(cmd.name).await;

        // Pad command name to align descriptions
        for _ in cmd.name.len()..width {
            ctx.write(b" ").await;
        }

        ctx.write(b" - ").await;
        ctx.write_str(cmd.description).await;
        ctx.write(NEWLINE).await;
    }
}

async fn cmd_status<T, L, D>(ctx: &mut Context<T, L, D>)
where
    T: Transport,
    L: OutputPin,
    D: DelayNs,
{
    ctx.write(b"System Status: OK\r\n").await;
}
