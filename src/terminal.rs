//! Host terminal control: non-canonical mode with guaranteed restoration.
use std::io::{self, Write, stdin};
use std::os::fd::{AsRawFd, RawFd};
use std::process;
use termios::{ECHO, ICANON, TCSAFLUSH, Termios};

/// Restores the saved terminal attributes when dropped.
pub struct RawLock {
    restorer: TerminalRestorer,
}

impl Drop for RawLock {
    fn drop(&mut self) {
        self.restorer.restore();
    }
}

impl RawLock {
    /// A copyable handle for restoring the terminal from the interrupt handler.
    #[must_use]
    pub const fn restorer(&self) -> TerminalRestorer {
        self.restorer
    }
}

/// The file descriptor and attributes needed to undo [`set_terminal_raw`].
#[derive(Copy, Clone)]
pub struct TerminalRestorer {
    fd: RawFd,
    termios_orig: Termios,
}

impl TerminalRestorer {
    pub fn restore(self) {
        // nothing left to do if this fails, the terminal stays raw
        let _ = termios::tcsetattr(self.fd, TCSAFLUSH, &self.termios_orig);
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EchoOptions {
    EchoOn,
    EchoOff,
}

/// Puts stdin into non-canonical mode, returning the restoring guard.
///
/// Only `ICANON` (and, for [`EchoOptions::EchoOff`], `ECHO`) is cleared;
/// `ISIG` stays set so Ctrl-C still raises `SIGINT` for the interrupt
/// handler.
///
/// # Errors
/// - stdin is not a terminal or its attributes cannot be changed
pub fn set_terminal_raw(eo: EchoOptions) -> Result<RawLock, io::Error> {
    let fd = stdin().as_raw_fd();
    let termios_orig = Termios::from_fd(fd)?;
    let mut termios_raw = termios_orig;
    // https://man7.org/linux/man-pages/man3/termios.3.html
    termios_raw.c_lflag &= !ICANON;
    if eo == EchoOptions::EchoOff {
        termios_raw.c_lflag &= !ECHO;
    }
    termios::tcsetattr(fd, TCSAFLUSH, &termios_raw)?;
    Ok(RawLock {
        restorer: TerminalRestorer { fd, termios_orig },
    })
}

/// Installs a Ctrl-C handler that restores the terminal and exits.
///
/// The exit status distinguishes an interrupted run from a clean halt.
///
/// # Errors
/// - A handler is already installed
pub fn install_interrupt_handler(restorer: TerminalRestorer) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        restorer.restore();
        println!();
        process::exit(-2);
    })
}

/// Writes `message` and flushes, so trap output appears immediately.
///
/// # Errors
/// - The underlying sink fails
pub fn print(sink: &mut impl Write, message: &str) -> io::Result<()> {
    sink.write_all(message.as_bytes())?;
    sink.flush()
}
