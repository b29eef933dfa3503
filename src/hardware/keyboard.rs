use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind};
use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

/// Access to the host keyboard as the emulated machine sees it.
///
/// `poll_key` backs the memory-mapped status register and must never block;
/// `read_key` backs the blocking input traps.
pub trait Keyboard {
    /// Returns a pending byte if one is available, consuming it from the input stream.
    fn poll_key(&mut self) -> io::Result<Option<u8>>;
    /// Blocks until one byte is available and returns it.
    fn read_key(&mut self) -> io::Result<u8>;
}

/// Keyboard fed by the host terminal's event stream.
///
/// Requires the terminal to be in non-canonical mode, see [`crate::terminal`].
pub struct TerminalKeyboard;
impl TerminalKeyboard {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}
impl Default for TerminalKeyboard {
    fn default() -> Self {
        Self::new()
    }
}
impl Keyboard for TerminalKeyboard {
    fn poll_key(&mut self) -> io::Result<Option<u8>> {
        // non-key events (focus, resize) are drained and discarded
        while event::poll(Duration::ZERO)? {
            if let Some(key) = event::read()?.as_key_event()
                && let Some(byte) = key_byte(key)
            {
                return Ok(Some(byte));
            }
        }
        Ok(None)
    }
    fn read_key(&mut self) -> io::Result<u8> {
        loop {
            if let Some(key) = event::read()?.as_key_event()
                && let Some(byte) = key_byte(key)
            {
                return Ok(byte);
            }
        }
    }
}

fn key_byte(key: KeyEvent) -> Option<u8> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Backspace => Some(0x08),
        KeyCode::Tab => Some(b'\t'),
        KeyCode::Esc => Some(0x1B),
        // characters outside the single-byte range are dropped
        _ => key.code.as_char().and_then(|c| u8::try_from(u32::from(c)).ok()),
    }
}

/// Keyboard fed from an in-process channel.
///
/// Used by tests and demos to drive the machine with deterministic input.
pub struct ChannelKeyboard {
    receiver: Receiver<u8>,
}
impl ChannelKeyboard {
    #[must_use]
    pub fn new(receiver: Receiver<u8>) -> Self {
        Self { receiver }
    }
}
impl Keyboard for ChannelKeyboard {
    fn poll_key(&mut self) -> io::Result<Option<u8>> {
        match self.receiver.try_recv() {
            Ok(byte) => Ok(Some(byte)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
        }
    }
    fn read_key(&mut self) -> io::Result<u8> {
        self.receiver
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::UnexpectedEof, e))
    }
}
