//! This code does emulate the trap routines but does not implement them via the opcodes of the LC3
//! but directly.
//!
//! In the real system the code for these routines is at the target of the
//! [Trap Vector Tables](https://cs131.info/Assembly/Instructions/TRAPRoutines.html#trap-vector-table).
//!
//! Handlers signal the fetch-execute loop through [`ControlFlow`]:
//! `Continue` keeps the machine running, `Break(Ok(()))` is a clean halt,
//! `Break(Err(_))` is a fatal host I/O failure.
use crate::errors::ExecutionError;
use crate::hardware::keyboard::Keyboard;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};
use crate::terminal;
use log::warn;
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

pub const TRAP_GETC: u8 = 0x20;
pub const TRAP_OUT: u8 = 0x21;
pub const TRAP_PUTS: u8 = 0x22;
pub const TRAP_IN: u8 = 0x23;
pub const TRAP_PUTSP: u8 = 0x24;
pub const TRAP_HALT: u8 = 0x25;

/// Routes a trap vector to its service routine.
///
/// Vectors outside the implemented set are ignored.
pub fn dispatch(
    vector: u8,
    regs: &mut Registers,
    memory: &Memory,
    keyboard: &mut impl Keyboard,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    match vector {
        TRAP_GETC => get_c(regs, keyboard),
        TRAP_OUT => out(regs, stdout),
        TRAP_PUTS => put_s(regs, memory, stdout),
        TRAP_IN => in_trap(regs, keyboard, stdout),
        TRAP_PUTSP => put_sp(regs, memory, stdout),
        TRAP_HALT => halt(stdout),
        other => {
            warn!("ignoring unknown trap vector {other:#04X}");
            ControlFlow::Continue(())
        }
    }
}

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(
    regs: &mut Registers,
    keyboard: &mut impl Keyboard,
) -> ControlFlow<Result<(), ExecutionError>> {
    match keyboard.read_key() {
        Ok(byte) => {
            regs.set(0, from_binary(u16::from(byte)));
            ControlFlow::Continue(())
        }
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    keyboard: &mut impl Keyboard,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    write_str_out("Enter a character: ", stdout)?;
    let byte = match keyboard.read_key() {
        Ok(byte) => byte,
        Err(e) => return wrap_io_error_in_cf(&e),
    };
    write_str_out(&String::from(char::from(byte)), stdout)?;
    regs.set(0, from_binary(u16::from(byte)));
    ControlFlow::Continue(())
}

/// OUT: Write a character in R0\[7:0\] to the console display.
pub fn out(regs: &Registers, stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation to the low byte is what the trap specifies"
    )]
    let c = char::from((regs.get(0).as_binary() & 0xFF) as u8);
    write_str_out(&String::from(c), stdout)
}

fn put_one_char_per_u16(input: u16, append_to: &mut String) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation is what is expected here"
    )]
    let c = char::from(input as u8);
    append_to.push(c);
}

fn put_two_chars_per_u16(input: u16, append_to: &mut String) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "truncation is what is expected here"
    )]
    let c = char::from(input as u8);
    append_to.push(c);
    let c = char::from((input >> 8) as u8);
    if c != '\0' {
        append_to.push(c);
    }
}

fn put(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
    handle_char: fn(u16, &mut String),
) -> ControlFlow<Result<(), ExecutionError>> {
    let mut address = regs.get(0).as_binary();
    let mut s = String::with_capacity(120);
    while mem[address] != 0 {
        handle_char(mem[address], &mut s);
        address = address.wrapping_add(1);
    }
    write_str_out(s.as_str(), stdout)
}

/// PUTS: print null-delimited char* from register 0's address
pub fn put_s(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits \[7:0\] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x0000 word.
pub fn put_sp(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, stdout, put_two_chars_per_u16)
}

/// HALT: End program and stdout a message
pub fn halt(stdout: &mut impl Write) -> ControlFlow<Result<(), ExecutionError>> {
    write_str_out("\nHALT\n", stdout)?;
    ControlFlow::Break(Ok(()))
}

fn write_str_out(
    message: &str,
    stdout: &mut impl Write,
) -> ControlFlow<Result<(), ExecutionError>> {
    match terminal::print(stdout, message) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

fn wrap_io_error_in_cf(error: &io::Error) -> ControlFlow<Result<(), ExecutionError>, ()> {
    ControlFlow::Break(Err(ExecutionError::InputOutput(error.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::test_helpers::FakeEmulator;
    use googletest::prelude::*;

    fn check_register_value(regs: &Registers, idx: u8, expected: u16) {
        expect_that!(
            regs.get(idx).as_binary(),
            eq(expected),
            "{:?}",
            regs.get(idx)
        );
    }

    #[gtest]
    pub fn test_get_c() {
        let mut emu = FakeEmulator::new(&[]);
        emu.add_stdin_input(b"a");
        let (regs, _mem, keyboard, _writer) = emu.parts();
        let res = get_c(regs, keyboard);
        check_register_value(regs, 0, u16::from(b'a'));
        assert_that!(res, eq(&ControlFlow::Continue(())));
    }
    #[gtest]
    pub fn test_out() {
        let mut emu = FakeEmulator::new(&[]);
        let (regs, _mem, _keyboard, writer) = emu.parts();
        regs.set(0, from_binary(u16::from(b'k')));
        let res = out(regs, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("k"));
    }
    #[gtest]
    pub fn test_out_emits_only_the_low_byte() {
        let mut emu = FakeEmulator::new(&[]);
        let (regs, _mem, _keyboard, writer) = emu.parts();
        regs.set(0, from_binary(0x1241));
        let res = out(regs, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("A"));
    }
    #[gtest]
    pub fn test_in() {
        let mut emu = FakeEmulator::new(&[]);
        emu.add_stdin_input(b"abc");
        let (regs, _mem, keyboard, writer) = emu.parts();

        let res = in_trap(regs, keyboard, writer);
        assert!(res.is_continue());
        check_register_value(regs, 0, u16::from(b'a'));

        let res = in_trap(regs, keyboard, writer);
        assert!(res.is_continue());
        check_register_value(regs, 0, u16::from(b'b'));

        let res = in_trap(regs, keyboard, writer);
        assert!(res.is_continue());
        check_register_value(regs, 0, u16::from(b'c'));

        expect_that!(
            writer.get_string(),
            eq("Enter a character: aEnter a character: bEnter a character: c")
        );
    }
    #[gtest]
    pub fn test_put_s() {
        let data = [u16::from(b'h'), u16::from(b'i'), b'!'.into(), 0x0000];
        let mut emu = FakeEmulator::new(&data);
        let (regs, mem, _keyboard, writer) = emu.parts();
        regs.set(0, from_binary(0x3000));
        let res = put_s(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("hi!"));
    }
    #[gtest]
    pub fn test_put_sp() {
        let data = [
            0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0x6548u16, 0x6c6c, 0x206f, 0x6f57, 0x6c72,
            0x2164, 0x0000,
        ];
        let mut emu = FakeEmulator::new(&data);
        let (regs, mem, _keyboard, writer) = emu.parts();
        regs.set(0, from_binary(0x3005));
        let res = put_sp(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("Hello World!"));
    }
    #[gtest]
    pub fn test_put_sp_final_word_with_zero_high_byte() {
        // "ab" then 'c' alone in the last non-zero word
        let data = [0x6261, 0x0063, 0x0000];
        let mut emu = FakeEmulator::new(&data);
        let (regs, mem, _keyboard, writer) = emu.parts();
        regs.set(0, from_binary(0x3000));
        let res = put_sp(regs, mem, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq("abc"));
    }
    #[gtest]
    pub fn test_halt() {
        let mut emu = FakeEmulator::new(&[]);
        let (_regs, _mem, _keyboard, writer) = emu.parts();
        let res = halt(writer);
        assert_that!(res, eq(&ControlFlow::Break(Ok(()))));
        expect_that!(writer.get_string().is_empty(), eq(false));
    }
    #[gtest]
    pub fn test_unknown_vector_is_ignored() {
        let mut emu = FakeEmulator::new(&[]);
        let (regs, mem, keyboard, writer) = emu.parts();
        let res = dispatch(0x42, regs, mem, keyboard, writer);
        assert!(res.is_continue());
        assert_that!(writer.get_string(), eq(""));
    }
}
