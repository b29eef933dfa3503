//! Errors that can occur using this crate.
//!
//! The crate's code is designed in a way that functions/method _can_ trigger all the enum variants
//! specified in the returned [`Result`]

use displaydoc::Display;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Possible errors while loading a program image.
///
/// Issues are unreadable image files or word slices that do not form a loadable image.
/// `Display` and `Debug` provide all necessary details.
#[rustfmt::skip]
#[derive(Display, PartialEq, Eq)]
pub enum LoadImageError {
    /// Cannot read program image from file '{file}': {message}
    ImageNotReadable { file: String, message: String },
    /// Program image is missing the leading origin word
    ImageMissingOrigin,
    /// Program image with origin {origin:#06X} and {words} payload words runs past the end of memory
    ImageTooLong { origin: u16, words: usize },
}
impl Debug for LoadImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
impl Error for LoadImageError {}

/// Possible errors during program execution.
///
/// `Display` and `Debug` provide all necessary details.
#[rustfmt::skip]
#[derive(Display, PartialEq, Eq)]
pub enum ExecutionError {
    /// The privileged opcode {0:#06b} cannot be executed outside supervisor mode. Most probably an invalid program.
    PrivilegedInstructionFound(u8),
    /// The reserved opcode {0:#06b} was found which is not specified. Most probably an invalid program.
    ReservedInstructionFound(u8),
    /// Error during reading Stdin or writing program output to Stdout: {0}
    InputOutput(String),
}
impl Debug for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
impl Error for ExecutionError {}
