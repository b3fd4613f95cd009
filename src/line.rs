//! Bounded line editor fed one byte at a time.

use heapless::{String, Vec};

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const CARRIAGE_RETURN: u8 = b'\r';

/// Why a byte did not change the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum RejectReason {
    /// The line already holds `N - 1` bytes.
    Full,
    /// Backspace with nothing to erase.
    NothingToErase,
    /// Control bytes and non-ASCII input, including `\n`.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<const N: usize> {
    /// The byte was appended and may be echoed.
    Accumulated(u8),
    /// `\r` completed the line; it is lowercased and the buffer is empty again.
    Submitted(String<N>),
    /// The last byte was removed.
    Backspaced,
    Rejected(RejectReason),
}

/// Line accumulator holding at most `N - 1` printable ASCII bytes.
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Longest line this buffer will hold.
    pub const fn max_len() -> usize {
        N.saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn feed(&mut self, byte: u8) -> LineEvent<N> {
        match byte {
            CARRIAGE_RETURN => LineEvent::Submitted(self.take_line()),
            BACKSPACE | DELETE => match self.buf.pop() {
                Some(_) => LineEvent::Backspaced,
                None => LineEvent::Rejected(RejectReason::NothingToErase),
            },
            b' '..=b'~' => {
                if self.buf.len() >= Self::max_len() {
                    return LineEvent::Rejected(RejectReason::Full);
                }
                // Cannot fail: length is below N - 1.
                let _ = self.buf.push(byte);
                LineEvent::Accumulated(byte)
            }
            _ => LineEvent::Rejected(RejectReason::Unsupported),
        }
    }

    fn take_line(&mut self) -> String<N> {
        self.buf.make_ascii_lowercase();
        let mut line = String::new();
        // Only printable ASCII is ever stored, so the bytes are valid UTF-8.
        let _ = line.push_str(core::str::from_utf8(&self.buf).unwrap_or(""));
        self.buf.clear();
        line
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
