//! # Load and Store Instructions
//!
//! Loads update Z and N and pay the page-crossing tick. Stores never touch
//! flags and their base cost already covers indexed addressing.

use crate::addressing::AddressingMode;
use crate::{Cpu, MemoryBus};

/// Executes the LDA (Load Accumulator) instruction.
pub(crate) fn lda<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    cpu.a = cpu.fetch_read(mode).value;
    cpu.set_nz(cpu.a);
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn ldx<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    cpu.x = cpu.fetch_read(mode).value;
    cpu.set_nz(cpu.x);
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn ldy<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    cpu.y = cpu.fetch_read(mode).value;
    cpu.set_nz(cpu.y);
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn sta<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let address = cpu.resolve(mode).address;
    cpu.memory.write(address, cpu.a);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn stx<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let address = cpu.resolve(mode).address;
    cpu.memory.write(address, cpu.x);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn sty<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let address = cpu.resolve(mode).address;
    cpu.memory.write(address, cpu.y);
}
