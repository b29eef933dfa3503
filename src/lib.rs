//! # LC-3 VM.
//!
//! `lc3-vm` emulates the LC-3, a 16-bit RISC teaching architecture: a
//! fetch/decode/execute core with memory-mapped keyboard I/O and the six
//! character/halt trap routines, plus a loader for the big-endian object
//! image format.
//!
//! # Example
//! ```
//! use lc3_vm::emulator;
//! use lc3_vm::hardware::keyboard::ChannelKeyboard;
//! use std::sync::mpsc;
//!
//! let (_sender, receiver) = mpsc::channel();
//! let image = [0x3000, 0xF025]; // HALT at the start address
//! let mut emu = emulator::from_words(&image, ChannelKeyboard::new(receiver), Vec::new()).unwrap();
//! emu.execute().unwrap();
//! ```
//! # Errors
//! - Image file cannot be read or does not fit into memory
//! - Program executes a privileged or reserved opcode

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod numbers;
pub mod terminal;

pub use emulator::Emulator;
