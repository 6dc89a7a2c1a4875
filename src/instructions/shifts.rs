//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL and ROR operate either on the accumulator or on memory. The
//! bit arithmetic lives in small value helpers shared with the undocumented
//! combined opcodes.

use crate::addressing::AddressingMode;
use crate::{Cpu, MemoryBus};

pub(crate) fn shift_left<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) -> u8 {
    cpu.flag_c = value & 0x80 != 0;
    let result = value << 1;
    cpu.set_nz(result);
    result
}

pub(crate) fn shift_right<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) -> u8 {
    cpu.flag_c = value & 0x01 != 0;
    let result = value >> 1;
    cpu.set_nz(result);
    result
}

pub(crate) fn rotate_left<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) -> u8 {
    let carry_in = cpu.flag_c as u8;
    cpu.flag_c = value & 0x80 != 0;
    let result = (value << 1) | carry_in;
    cpu.set_nz(result);
    result
}

pub(crate) fn rotate_right<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) -> u8 {
    let carry_in = (cpu.flag_c as u8) << 7;
    cpu.flag_c = value & 0x01 != 0;
    let result = (value >> 1) | carry_in;
    cpu.set_nz(result);
    result
}

/// Applies `op` to the accumulator or to the addressed byte, writing the
/// result back. Returns the new value.
pub(crate) fn modify<M: MemoryBus>(
    cpu: &mut Cpu<M>,
    mode: AddressingMode,
    op: fn(&mut Cpu<M>, u8) -> u8,
) -> u8 {
    if mode == AddressingMode::Accumulator {
        let value = cpu.a;
        let result = op(cpu, value);
        cpu.a = result;
        return result;
    }

    let operand = cpu.fetch(mode);
    let result = op(cpu, operand.value);
    cpu.memory.write(operand.address, result);
    result
}

/// Executes the ASL (Arithmetic Shift Left) instruction.
pub(crate) fn asl<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    modify(cpu, mode, shift_left);
}

/// Executes the LSR (Logical Shift Right) instruction.
pub(crate) fn lsr<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    modify(cpu, mode, shift_right);
}

/// Executes the ROL (Rotate Left) instruction.
pub(crate) fn rol<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    modify(cpu, mode, rotate_left);
}

/// Executes the ROR (Rotate Right) instruction.
pub(crate) fn ror<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    modify(cpu, mode, rotate_right);
}
