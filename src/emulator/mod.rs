//! The machine value and its fetch-execute loop.

pub mod instruction;
pub mod opcodes;
pub mod trap_routines;

#[cfg(test)]
pub mod test_helpers;

use crate::errors::{ExecutionError, LoadImageError};
use crate::hardware::keyboard::{Keyboard, TerminalKeyboard};
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use instruction::Instruction;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Stdout, Write, stdout};
use std::ops::ControlFlow;

/// The public facing emulator used to run LC-3 programs.
///
/// Bundles memory, the register file, the running flag and the two host
/// collaborators (keyboard and output sink), so a machine is an ordinary
/// value with no global state.
pub struct Emulator<K: Keyboard, W: Write> {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    pub(crate) keyboard: K,
    pub(crate) output: W,
    running: bool,
}

/// An emulator wired to the host terminal.
pub type TerminalEmulator = Emulator<TerminalKeyboard, Stdout>;

/// Creates an emulator from an image file in the big-endian object format.
///
/// # Errors
/// - File cannot be opened or read
pub fn from_image_file(path: &str) -> Result<TerminalEmulator, LoadImageError> {
    let not_readable = |message: String| LoadImageError::ImageNotReadable {
        file: path.to_string(),
        message,
    };
    let file = File::open(path).map_err(|e| not_readable(e.to_string()))?;
    let mut memory = Memory::new();
    let origin = memory
        .load_image(BufReader::new(file))
        .map_err(|e| not_readable(e.to_string()))?;
    debug!("loaded image '{path}' at origin {origin:#06X}");
    Ok(Emulator::new(memory, TerminalKeyboard::new(), stdout()))
}

/// Creates an emulator from host-order words, `image[0]` being the origin.
///
/// # Errors
/// - Image has no origin word or runs past the end of memory
pub fn from_words<K: Keyboard, W: Write>(
    image: &[u16],
    keyboard: K,
    output: W,
) -> Result<Emulator<K, W>, LoadImageError> {
    let mut memory = Memory::new();
    memory.load_words(image)?;
    Ok(Emulator::new(memory, keyboard, output))
}

impl<K: Keyboard, W: Write> Emulator<K, W> {
    #[must_use]
    pub fn new(memory: Memory, keyboard: K, output: W) -> Self {
        Self {
            memory,
            registers: Registers::new(),
            keyboard,
            output,
            running: false,
        }
    }

    /// Runs the fetch-execute loop until the program halts.
    ///
    /// Each round fetches the word at PC through the device-aware memory
    /// read, increments PC (wrapping) and dispatches on the decoded
    /// instruction.
    ///
    /// # Errors
    /// - A privileged or reserved opcode was executed
    /// - Host I/O failed
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        self.running = true;
        while self.running {
            let word = self
                .memory
                .read(self.registers.pc().as_binary(), &mut self.keyboard)?;
            self.registers.inc_pc();
            self.step(Instruction::from(word))?;
        }
        Ok(())
    }

    /// Restores the register file to its power-on state for another run.
    pub fn reset_registers(&mut self) {
        self.registers.reset();
    }

    fn step(&mut self, instruction: Instruction) -> Result<(), ExecutionError> {
        match instruction {
            Instruction::Add { dr, sr1, src } => opcodes::add(dr, sr1, src, &mut self.registers),
            Instruction::And { dr, sr1, src } => opcodes::and(dr, sr1, src, &mut self.registers),
            Instruction::Not { dr, sr } => opcodes::not(dr, sr, &mut self.registers),
            Instruction::Br { mask, pc_offset } => opcodes::br(mask, pc_offset, &mut self.registers),
            Instruction::Jmp { base } => opcodes::jmp(base, &mut self.registers),
            Instruction::Jsr { target } => opcodes::jsr(target, &mut self.registers),
            Instruction::Ld { dr, pc_offset } => opcodes::ld(
                dr,
                pc_offset,
                &mut self.registers,
                &mut self.memory,
                &mut self.keyboard,
            )?,
            Instruction::Ldi { dr, pc_offset } => opcodes::ldi(
                dr,
                pc_offset,
                &mut self.registers,
                &mut self.memory,
                &mut self.keyboard,
            )?,
            Instruction::Ldr { dr, base, offset } => opcodes::ldr(
                dr,
                base,
                offset,
                &mut self.registers,
                &mut self.memory,
                &mut self.keyboard,
            )?,
            Instruction::Lea { dr, pc_offset } => opcodes::lea(dr, pc_offset, &mut self.registers),
            Instruction::St { sr, pc_offset } => {
                opcodes::st(sr, pc_offset, &self.registers, &mut self.memory);
            }
            Instruction::Sti { sr, pc_offset } => opcodes::sti(
                sr,
                pc_offset,
                &self.registers,
                &mut self.memory,
                &mut self.keyboard,
            )?,
            Instruction::Str { sr, base, offset } => {
                opcodes::str(sr, base, offset, &self.registers, &mut self.memory);
            }
            Instruction::Trap { vector } => {
                let flow = trap_routines::dispatch(
                    vector,
                    &mut self.registers,
                    &self.memory,
                    &mut self.keyboard,
                    &mut self.output,
                );
                match flow {
                    ControlFlow::Continue(()) => {}
                    ControlFlow::Break(Ok(())) => self.running = false,
                    ControlFlow::Break(Err(e)) => return Err(e),
                }
            }
            Instruction::Rti => {
                return Err(ExecutionError::PrivilegedInstructionFound(0b1000));
            }
            Instruction::Reserved => {
                return Err(ExecutionError::ReservedInstructionFound(0b1101));
            }
        }
        Ok(())
    }
}
