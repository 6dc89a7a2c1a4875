//! # Stack Instructions
//!
//! PHA, PHP, PLA and PLP.

use crate::cpu::status;
use crate::{Cpu, MemoryBus};

/// Executes the PHA (Push Accumulator) instruction.
pub(crate) fn pha<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.stack_push8(cpu.a);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy always has the B bit set.
pub(crate) fn php<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.stack_push8(cpu.status() | status::BREAK);
}

/// Executes the PLA (Pull Accumulator) instruction.
pub(crate) fn pla<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.a = cpu.stack_pop8();
    cpu.set_nz(cpu.a);
}

/// Executes the PLP (Pull Processor Status) instruction.
pub(crate) fn plp<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let p = cpu.stack_pop8();
    cpu.set_status(p);
}
