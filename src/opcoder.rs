//! # Instruction Decoding
//!
//! An [`Opcoder`] reads the next opcode at PC and dispatches it. The
//! documented layer knows the 151 official instructions; the illegal layer
//! consults the undocumented table first and defers to the documented layer
//! for everything else.
//!
//! Opcodes neither layer knows are logged and executed as a two-tick no-op so
//! a stray jump into data never halts the emulation.

use crate::instructions;
use crate::{Cpu, MemoryBus};

/// Decoder layering used by [`Cpu::cycle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Opcoder {
    /// Documented instructions only.
    #[default]
    Documented,
    /// Undocumented opcodes layered over the documented set.
    WithIllegal,
}

/// Ticks charged for an opcode neither layer recognises.
const UNKNOWN_OPCODE_TICKS: u32 = 2;

impl Opcoder {
    /// Fetches the opcode at PC, advances PC and executes it.
    pub fn process<M: MemoryBus>(self, cpu: &mut Cpu<M>) {
        let address = cpu.pc();
        let opcode = cpu.read_pc8();

        if self == Opcoder::WithIllegal && instructions::illegal::execute(cpu, opcode) {
            return;
        }

        if !instructions::execute(cpu, opcode) {
            log::error!("Invalid opcode {:02X} detected at {:04X}", opcode, address);
            cpu.tick(UNKNOWN_OPCODE_TICKS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn cpu_with(program: &[u8], opcoder: Opcoder) -> Cpu<FlatMemory> {
        let mut mem = FlatMemory::new();
        mem.load(0x0200, program);
        let mut cpu = Cpu::with_opcoder(mem, opcoder);
        cpu.set_pc(0x0200);
        cpu
    }

    #[test]
    fn test_unknown_opcode_is_two_tick_noop() {
        let mut cpu = cpu_with(&[0xA7, 0x10], Opcoder::Documented);
        cpu.set_a(0x55);

        let spent = cpu.cycle();
        assert_eq!(spent, 2);
        assert_eq!(cpu.pc(), 0x0201);
        assert_eq!(cpu.a(), 0x55);
    }

    #[test]
    fn test_illegal_layer_executes_lax() {
        let mut cpu = cpu_with(&[0xA7, 0x10], Opcoder::WithIllegal);
        cpu.memory_mut().write(0x0010, 0x33);

        let spent = cpu.cycle();
        assert_eq!(spent, 3);
        assert_eq!(cpu.pc(), 0x0202);
        assert_eq!(cpu.a(), 0x33);
        assert_eq!(cpu.x(), 0x33);
    }

    #[test]
    fn test_illegal_layer_defers_documented() {
        let mut cpu = cpu_with(&[0xA9, 0x7F], Opcoder::WithIllegal);
        cpu.cycle();
        assert_eq!(cpu.a(), 0x7F);
    }
}
