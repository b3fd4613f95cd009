//! Top-level behaviour selector.

use core::fmt::{Display, Formatter};

/// The console mode currently in charge of input.
///
/// The shell build alternates between [`Mode::Maintenance`] and
/// [`Mode::FullRepl`]; the menu build stays in [`Mode::Menu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Mode {
    /// Mass-storage facing mode; only listens for `repl`.
    Maintenance,
    /// Interactive shell with echo and the full command set.
    FullRepl,
    /// Single-key numbered menu.
    Menu,
}

impl Mode {
    /// Whether typed characters are echoed back in this mode.
    pub const fn echoes(self) -> bool {
        matches!(self, Mode::FullRepl)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Mode::Maintenance => "maintenance",
            Mode::FullRepl => "full-repl",
            Mode::Menu => "menu",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_full_repl_echoes() {
        assert!(Mode::FullRepl.echoes());
        assert!(!Mode::Maintenance.echoes());
        assert!(!Mode::Menu.echoes());
    }
}
