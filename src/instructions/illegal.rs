//! # Undocumented Opcodes
//!
//! The NMOS 6502 decodes most of its unassigned opcodes into combinations of
//! documented operations. This module models the stable ones listed in
//! [`ILLEGAL_OPCODE_TABLE`]:
//!
//! - SLO, RLA, SRE, RRA: shift or rotate memory, then ORA/AND/EOR/ADC with the result
//! - DCP, ISC: decrement or increment memory, then CMP/SBC
//! - LAX, SAX: load A and X together, store `A & X`
//! - ANC, ALR: immediate AND followed by a carry copy or a right shift
//! - SBC $EB and the multi-byte NOPs
//!
//! The unstable opcodes (XAA, AHX, TAS, SHX, SHY, LAS, ARR, AXS) and the JAM
//! opcodes are not modelled and fall through to the unknown-opcode path.

use super::{alu, control, shifts};
use crate::addressing::AddressingMode;
use crate::opcodes::{Mnemonic, ILLEGAL_OPCODE_TABLE};
use crate::{Cpu, MemoryBus};

/// Executes an undocumented opcode.
///
/// Returns false without touching the CPU when `opcode` is not in the
/// undocumented table.
pub(crate) fn execute<M: MemoryBus>(cpu: &mut Cpu<M>, opcode: u8) -> bool {
    let metadata = &ILLEGAL_OPCODE_TABLE[opcode as usize];
    if !metadata.is_defined() {
        return false;
    }

    cpu.tick(metadata.base_ticks as u32);
    let mode = metadata.addressing_mode;

    match metadata.mnemonic {
        Mnemonic::Slo => {
            let value = shifts::modify(cpu, mode, shifts::shift_left);
            cpu.a |= value;
            cpu.set_nz(cpu.a);
        }
        Mnemonic::Rla => {
            let value = shifts::modify(cpu, mode, shifts::rotate_left);
            cpu.a &= value;
            cpu.set_nz(cpu.a);
        }
        Mnemonic::Sre => {
            let value = shifts::modify(cpu, mode, shifts::shift_right);
            cpu.a ^= value;
            cpu.set_nz(cpu.a);
        }
        Mnemonic::Rra => {
            let value = shifts::modify(cpu, mode, shifts::rotate_right);
            alu::add_with_carry(cpu, value);
        }
        Mnemonic::Dcp => {
            let operand = cpu.fetch(mode);
            let value = operand.value.wrapping_sub(1);
            cpu.memory.write(operand.address, value);
            let a = cpu.a;
            alu::compare(cpu, a, value);
        }
        Mnemonic::Isc => {
            let operand = cpu.fetch(mode);
            let value = operand.value.wrapping_add(1);
            cpu.memory.write(operand.address, value);
            alu::subtract_with_borrow(cpu, value);
        }
        Mnemonic::Lax => {
            let value = cpu.fetch_read(mode).value;
            cpu.a = value;
            cpu.x = value;
            cpu.set_nz(value);
        }
        Mnemonic::Sax => {
            let address = cpu.resolve(mode).address;
            cpu.memory.write(address, cpu.a & cpu.x);
        }
        Mnemonic::Anc => {
            let value = cpu.fetch(mode).value;
            cpu.a &= value;
            cpu.set_nz(cpu.a);
            cpu.flag_c = cpu.flag_n;
        }
        Mnemonic::Alr => {
            let value = cpu.fetch(mode).value;
            cpu.a &= value;
            shifts::modify(cpu, AddressingMode::Accumulator, shifts::shift_right);
        }
        Mnemonic::Sbc => alu::sbc(cpu, mode),
        Mnemonic::Nop => control::nop(cpu, mode),
        _ => return false,
    }

    true
}
