//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump (absolute and indirect)
//! - JSR / RTS: Subroutine call and return
//! - BRK / RTI: Software interrupt and return from interrupt
//! - NOP: No operation

use crate::addressing::AddressingMode;
use crate::cpu::{status, IRQ_VECTOR};
use crate::memory::Wrap;
use crate::{Cpu, MemoryBus};

/// Executes the JMP instruction.
///
/// The indirect form fetches its vector without carrying into the high byte,
/// so `JMP ($30FF)` reads the high byte from `$3000`.
pub(crate) fn jmp<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    cpu.pc = cpu.resolve(mode).address;
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR instruction.
pub(crate) fn jsr<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let target = cpu.read_pc16();
    let return_address = cpu.pc.wrapping_sub(1);
    cpu.stack_push16(return_address);
    cpu.pc = target;
}

/// Executes the RTS (Return from Subroutine) instruction.
pub(crate) fn rts<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.pc = cpu.stack_pop16().wrapping_add(1);
}

/// Executes the BRK (Force Interrupt) instruction.
///
/// Pushes PC + 1 (skipping the padding byte) and the status with B set, then
/// sets I and jumps through the IRQ vector.
pub(crate) fn brk<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let return_address = cpu.pc.wrapping_add(1);
    cpu.stack_push16(return_address);
    cpu.stack_push8(cpu.status() | status::BREAK);
    cpu.flag_i = true;
    cpu.pc = cpu.memory.read16(IRQ_VECTOR, Wrap::Linear);
}

/// Executes the RTI (Return from Interrupt) instruction.
pub(crate) fn rti<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let p = cpu.stack_pop8();
    cpu.set_status(p);
    cpu.pc = cpu.stack_pop16();
}

/// Executes NOP. Operand bytes are consumed and read instructions pay the
/// page-crossing tick like any other read.
pub(crate) fn nop<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    if mode != AddressingMode::Implicit {
        cpu.fetch_read(mode);
    }
}
