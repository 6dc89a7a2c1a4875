//! # Increment and Decrement Instructions
//!
//! INC and DEC modify memory; INX, INY, DEX and DEY modify registers. All of
//! them wrap and update Z and N.

use crate::addressing::AddressingMode;
use crate::{Cpu, MemoryBus};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn inc<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch(mode);
    let result = operand.value.wrapping_add(1);
    cpu.memory.write(operand.address, result);
    cpu.set_nz(result);
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn dec<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch(mode);
    let result = operand.value.wrapping_sub(1);
    cpu.memory.write(operand.address, result);
    cpu.set_nz(result);
}

/// Executes the INX (Increment X Register) instruction.
pub(crate) fn inx<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.set_nz(cpu.x);
}

/// Executes the INY (Increment Y Register) instruction.
pub(crate) fn iny<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.set_nz(cpu.y);
}

/// Executes the DEX (Decrement X Register) instruction.
pub(crate) fn dex<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.set_nz(cpu.x);
}

/// Executes the DEY (Decrement Y Register) instruction.
pub(crate) fn dey<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.set_nz(cpu.y);
}
