//! # Status Flag Instructions
//!
//! CLC, SEC, CLI, SEI, CLD, SED and CLV. None of them touch other flags.

use crate::{Cpu, MemoryBus};

/// Executes the CLC (Clear Carry Flag) instruction.
pub(crate) fn clc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_c = false;
}

/// Executes the SEC (Set Carry Flag) instruction.
pub(crate) fn sec<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_c = true;
}

/// Executes the CLI (Clear Interrupt Disable) instruction.
pub(crate) fn cli<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_i = false;
}

/// Executes the SEI (Set Interrupt Disable) instruction.
pub(crate) fn sei<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_i = true;
}

/// Executes the CLD (Clear Decimal Mode) instruction.
pub(crate) fn cld<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_d = false;
}

/// Executes the SED (Set Decimal Flag) instruction.
pub(crate) fn sed<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_d = true;
}

/// Executes the CLV (Clear Overflow Flag) instruction.
pub(crate) fn clv<M: MemoryBus>(cpu: &mut Cpu<M>) {
    cpu.flag_v = false;
}
