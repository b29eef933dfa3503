//! Implemented operations for the LC 3.
//!
//! Each handler runs after the PC has been incremented past its instruction.
//! All address arithmetic wraps at the end of the 16-bit address space.
use crate::emulator::instruction::{JsrTarget, Operand};
use crate::errors::ExecutionError;
use crate::hardware::keyboard::Keyboard;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};

fn operand_value(src: Operand, r: &Registers) -> u16 {
    match src {
        Operand::Register(sr2) => r.get(sr2).as_binary(),
        Operand::Immediate(value) => value,
    }
}

fn address_by_offset(base: u16, offset: u16) -> u16 {
    base.wrapping_add(offset)
}

/// ADD: Mathematical addition in 2 variants
/// - DR is set with result of SR 1 + SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0001 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 + sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0001 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn add(dr: u8, sr1: u8, src: Operand, r: &mut Registers) {
    let result = r
        .get(sr1)
        .as_binary()
        .wrapping_add(operand_value(src, r));
    r.set(dr, from_binary(result));
    r.update_conditional_register(dr);
}

/// AND: bit-wise AND in 2 variants
/// - DR is set with result of SR 1 AND SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0101 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 AND sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0101 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn and(dr: u8, sr1: u8, src: Operand, r: &mut Registers) {
    let result = r.get(sr1).as_binary() & operand_value(src, r);
    r.set(dr, from_binary(result));
    r.update_conditional_register(dr);
}

/// NOT: bit-wise complement of the value in SR
/// ```text
///  15__12__11_9__8_6___5___0_
/// | 1001 |  DR |  SR | 11111 |
///  --------------------------
/// ```
pub fn not(dr: u8, sr: u8, r: &mut Registers) {
    r.set(dr, from_binary(!r.get(sr).as_binary()));
    r.update_conditional_register(dr);
}

/// BR: Conditional Branch
/// Adds the sign extended offset to PC if the current condition flag is
/// among the set `nzp` bits. A mask of zero never branches.
/// ```text
///  15__12__11_9___8_______0_
/// | 0000 |  nzp | PCoffset9 |
///  -------------------------
/// ```
/// See [`crate::hardware::registers::ConditionFlag`]
pub fn br(mask: u8, pc_offset: u16, r: &mut Registers) {
    if mask & (r.get_conditional_register() as u8) != 0 {
        r.set_pc(address_by_offset(r.pc().as_binary(), pc_offset));
    }
}

/// JMP: Unconditional jump to the address in the base register.
/// `RET` is the special case with base register 7.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 1100 |  000 | BaseR | 000000 |
///  ------------------------------
/// ```
pub fn jmp(base: u8, r: &mut Registers) {
    r.set_pc(r.get(base).as_binary());
}

/// JSR/JSRR: Jump to subroutine, leaving the return address in R7.
/// ```text
///  15__12__11______10________0_
/// | 0100 |  1 |  PCoffset11   |
///  ----------------------------
///  15__12__11_9__8___6____5____0_
/// | 0100 |  000 | BaseR | 000000 |
///  ------------------------------
/// ```
/// R7 receives the already incremented PC before the target is read, so a
/// register-form jump through R7 targets the return address.
pub fn jsr(target: JsrTarget, r: &mut Registers) {
    r.set(7, r.pc());
    match target {
        JsrTarget::Offset(pc_offset) => {
            r.set_pc(address_by_offset(r.pc().as_binary(), pc_offset));
        }
        JsrTarget::Register(base) => r.set_pc(r.get(base).as_binary()),
    }
}

/// LD: Loads content of memory address of PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 0010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn ld(
    dr: u8,
    pc_offset: u16,
    r: &mut Registers,
    memory: &mut Memory,
    keyboard: &mut impl Keyboard,
) -> Result<(), ExecutionError> {
    let value = memory.read(address_by_offset(r.pc().as_binary(), pc_offset), keyboard)?;
    r.set(dr, from_binary(value));
    r.update_conditional_register(dr);
    Ok(())
}

/// LDI: Load indirect.
/// Calculates memory address of PC + sign extended offset and reads another address from there,
/// the content of the memory at that indirectly loaded address is put into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn ldi(
    dr: u8,
    pc_offset: u16,
    r: &mut Registers,
    memory: &mut Memory,
    keyboard: &mut impl Keyboard,
) -> Result<(), ExecutionError> {
    let value_address =
        memory.read(address_by_offset(r.pc().as_binary(), pc_offset), keyboard)?;
    let value = memory.read(value_address, keyboard)?;
    r.set(dr, from_binary(value));
    r.update_conditional_register(dr);
    Ok(())
}

/// LDR: Load address from base register and adds sign extended offset to load the memory content
/// from there into DR.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0110 |  DR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn ldr(
    dr: u8,
    base: u8,
    offset: u16,
    r: &mut Registers,
    memory: &mut Memory,
    keyboard: &mut impl Keyboard,
) -> Result<(), ExecutionError> {
    let value = memory.read(address_by_offset(r.get(base).as_binary(), offset), keyboard)?;
    r.set(dr, from_binary(value));
    r.update_conditional_register(dr);
    Ok(())
}

/// LEA: Load Effective Address loads PC + sign extended offset into DR.
/// The condition flags are left untouched.
/// ```text
///  15__12__11_9___8_______0_
/// | 1110 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn lea(dr: u8, pc_offset: u16, r: &mut Registers) {
    r.set(
        dr,
        from_binary(address_by_offset(r.pc().as_binary(), pc_offset)),
    );
}

/// ST: Store. The contents of the SR are written to memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn st(sr: u8, pc_offset: u16, r: &Registers, memory: &mut Memory) {
    memory.write(
        address_by_offset(r.pc().as_binary(), pc_offset),
        r.get(sr).as_binary(),
    );
}

/// STI: Store Indirect. The contents of the SR are written to the address which is loaded from
/// memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 1011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn sti(
    sr: u8,
    pc_offset: u16,
    r: &Registers,
    memory: &mut Memory,
    keyboard: &mut impl Keyboard,
) -> Result<(), ExecutionError> {
    let address =
        memory.read(address_by_offset(r.pc().as_binary(), pc_offset), keyboard)?;
    memory.write(address, r.get(sr).as_binary());
    Ok(())
}

/// STR: Store contents of SR to memory address of base register plus sign extended offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0111 |  SR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn str(sr: u8, base: u8, offset: u16, r: &Registers, memory: &mut Memory) {
    memory.write(
        address_by_offset(r.get(base).as_binary(), offset),
        r.get(sr).as_binary(),
    );
}
