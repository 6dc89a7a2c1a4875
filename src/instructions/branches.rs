//! # Branch Instructions
//!
//! All eight conditional branches share [`branch_if`]: the offset byte is
//! always consumed, a taken branch costs one extra tick and a further tick
//! when the target is on another page.

use crate::{Cpu, MemoryBus};

fn branch_if<M: MemoryBus>(cpu: &mut Cpu<M>, condition: bool) {
    let offset = cpu.read_pc8();
    if condition {
        cpu.tick(1);
        cpu.branch(offset);
    }
}

/// Executes the BCC (Branch if Carry Clear) instruction.
pub(crate) fn bcc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = !cpu.flag_c;
    branch_if(cpu, condition);
}

/// Executes the BCS (Branch if Carry Set) instruction.
pub(crate) fn bcs<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = cpu.flag_c;
    branch_if(cpu, condition);
}

/// Executes the BEQ (Branch if Equal) instruction.
pub(crate) fn beq<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = cpu.flag_z;
    branch_if(cpu, condition);
}

/// Executes the BNE (Branch if Not Equal) instruction.
pub(crate) fn bne<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = !cpu.flag_z;
    branch_if(cpu, condition);
}

/// Executes the BMI (Branch if Minus) instruction.
pub(crate) fn bmi<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = cpu.flag_n;
    branch_if(cpu, condition);
}

/// Executes the BPL (Branch if Plus) instruction.
pub(crate) fn bpl<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = !cpu.flag_n;
    branch_if(cpu, condition);
}

/// Executes the BVC (Branch if Overflow Clear) instruction.
pub(crate) fn bvc<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = !cpu.flag_v;
    branch_if(cpu, condition);
}

/// Executes the BVS (Branch if Overflow Set) instruction.
pub(crate) fn bvs<M: MemoryBus>(cpu: &mut Cpu<M>) {
    let condition = cpu.flag_v;
    branch_if(cpu, condition);
}
