use crate::hardware::memory::PC_START;
use crate::numbers;
use std::fmt::{Debug, Formatter};

/// A single 16-bit register value.
///
/// The binary view is the raw bit pattern, the decimal view is its
/// two's-complement interpretation.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Register(u16);
impl Register {
    pub const fn as_binary(self) -> u16 {
        self.0
    }
    pub const fn as_decimal(self) -> i16 {
        numbers::twos_complement_to_decimal(self.0)
    }
}
impl Debug for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:#06X} {:#018b} {})",
            self.0,
            self.0,
            self.as_decimal()
        )
    }
}
impl From<u16> for Register {
    fn from(value: u16) -> Self {
        Self(value)
    }
}
impl From<Register> for u16 {
    fn from(value: Register) -> Self {
        value.0
    }
}

pub const fn from_binary(value: u16) -> Register {
    Register(value)
}
pub const fn from_decimal(value: i16) -> Register {
    Register(numbers::decimal_to_twos_complement(value))
}

/// The LC-3 register file: R0..R7, the program counter and the condition register.
pub struct Registers {
    general_purpose: [Register; 8],
    pc: Register,
    cond: ConditionFlag,
}
impl Registers {
    pub const fn new() -> Self {
        Self {
            general_purpose: [Register(0); 8],
            pc: Register(PC_START),
            cond: ConditionFlag::Zero,
        }
    }
    /// Restores the power-on state: all registers zero, PC at the start address.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
    pub const fn pc(&self) -> Register {
        self.pc
    }
    /// Advances the PC by one, wrapping at the end of the address space.
    pub fn inc_pc(&mut self) {
        self.set_pc(self.pc.0.wrapping_add(1));
    }
    pub fn set_pc(&mut self, val: u16) {
        self.pc = val.into();
    }
    pub fn get(&self, r: u8) -> Register {
        debug_assert!(r <= 7, "Invalid general purpose register get");
        self.general_purpose[usize::from(r)]
    }
    pub fn set(&mut self, r: u8, value: Register) {
        debug_assert!(r <= 7, "Invalid general purpose register set");
        self.general_purpose[usize::from(r)] = value;
    }
    pub const fn get_conditional_register(&self) -> ConditionFlag {
        self.cond
    }
    /// Derives the condition flag from the current value of register `r`.
    ///
    /// Exactly one flag is set afterwards.
    pub fn update_conditional_register(&mut self, r: u8) {
        let val = self.get(r);
        self.cond = ConditionFlag::from(val);
    }
}
impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
impl Debug for Registers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, val) in self.general_purpose.iter().enumerate() {
            writeln!(f, "R{index}:   {val:?}")?;
        }
        writeln!(f)?;
        writeln!(f, "PC:   {:?}", self.pc)?;
        writeln!(f, "Cond: {:?}", self.cond)?;
        Ok(())
    }
}

/// One-hot sign classification of the last flag-setting result.
///
/// The discriminants line up with the `nzp` mask bits of the BR instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    Pos = 1 << 0, // Positive
    Zero = 1 << 1,
    Neg = 1 << 2, // Negative
}
impl From<Register> for ConditionFlag {
    fn from(value: Register) -> Self {
        if value.0 == 0 {
            Self::Zero
        } else if value.0 >> 15 == 1 {
            // leftmost bit is 1 for negative numbers in two's complement
            Self::Neg
        } else {
            Self::Pos
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_register_views() {
        let reg = from_decimal(-128);
        expect_that!(reg.as_binary(), eq(0xFF80));
        expect_that!(reg.as_decimal(), eq(-128));
        expect_that!(from_binary(0xFF80), eq(reg));
    }
    #[gtest]
    pub fn test_new_registers_start_at_program_start() {
        let regs = Registers::new();
        expect_that!(regs.pc().as_binary(), eq(0x3000));
        for r in 0..8 {
            expect_that!(regs.get(r), eq(from_binary(0)));
        }
    }
    #[gtest]
    pub fn test_pc_wraps_at_address_space_end() {
        let mut regs = Registers::new();
        regs.set_pc(0xFFFF);
        regs.inc_pc();
        expect_that!(regs.pc().as_binary(), eq(0x0000));
    }
    #[gtest]
    pub fn test_condition_flag_is_one_hot() {
        let mut regs = Registers::new();

        regs.set(3, from_decimal(-1));
        regs.update_conditional_register(3);
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));

        regs.set(3, from_binary(0));
        regs.update_conditional_register(3);
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Zero));

        regs.set(3, from_binary(0x7FFF));
        regs.update_conditional_register(3);
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Pos));
    }
    #[gtest]
    pub fn test_reset_clears_state() {
        let mut regs = Registers::new();
        regs.set(0, from_binary(42));
        regs.set_pc(0x4242);
        regs.reset();
        expect_that!(regs.get(0), eq(from_binary(0)));
        expect_that!(regs.pc().as_binary(), eq(0x3000));
    }
}
