//! 6510 Disassembler
//!
//! Decodes single instructions straight from a memory bus into
//! human-readable assembly. Used by the debugger to show the instruction at PC.

use std::fmt;

use crate::addressing::AddressingMode;
use crate::opcodes::{Mnemonic, ILLEGAL_OPCODE_TABLE, OPCODE_TABLE};
use crate::MemoryBus;

/// A single disassembled instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Memory address where this instruction starts
    pub address: u16,

    /// The opcode byte value (0x00-0xFF)
    pub opcode: u8,

    /// Instruction mnemonic; [`Mnemonic::Undefined`] for unknown opcodes
    pub mnemonic: Mnemonic,

    /// Addressing mode used by this instruction
    pub addressing_mode: AddressingMode,

    /// Operand bytes (0-2 bytes depending on addressing mode)
    pub operand_bytes: Vec<u8>,

    /// Total size in bytes (1-3 bytes: opcode + operands)
    pub size_bytes: u8,

    /// Base tick cost (excluding page-crossing penalties)
    pub base_ticks: u8,
}

/// Decodes the instruction at `address`.
///
/// With `include_illegal` set, undocumented opcodes are decoded by name,
/// otherwise they come back as [`Mnemonic::Undefined`] with a size of one.
///
/// ```
/// use mos6510::disassembler::decode;
/// use mos6510::{FlatMemory, MemoryBus};
///
/// let mut mem = FlatMemory::new();
/// mem.load(0xC000, &[0xBD, 0x00, 0x04]);
///
/// let instruction = decode(&mem, 0xC000, false);
/// assert_eq!(instruction.to_string(), "LDA $0400,X");
/// assert_eq!(instruction.size_bytes, 3);
/// ```
pub fn decode<M: MemoryBus>(memory: &M, address: u16, include_illegal: bool) -> Instruction {
    let opcode = memory.read(address);

    let mut metadata = &OPCODE_TABLE[opcode as usize];
    if !metadata.is_defined() && include_illegal {
        metadata = &ILLEGAL_OPCODE_TABLE[opcode as usize];
    }

    let operand_bytes = (1..metadata.size_bytes as u16)
        .map(|offset| memory.read(address.wrapping_add(offset)))
        .collect();

    Instruction {
        address,
        opcode,
        mnemonic: metadata.mnemonic,
        addressing_mode: metadata.addressing_mode,
        operand_bytes,
        size_bytes: metadata.size_bytes,
        base_ticks: metadata.base_ticks,
    }
}

impl Instruction {
    fn operand_word(&self) -> u16 {
        match self.operand_bytes.as_slice() {
            [low, high] => u16::from_le_bytes([*low, *high]),
            [low] => *low as u16,
            _ => 0,
        }
    }

    /// Formats the operand according to the addressing mode.
    fn format_operand(&self) -> String {
        use AddressingMode::*;

        if self.mnemonic == Mnemonic::Undefined {
            return format!("${:02X}", self.opcode);
        }

        let value = self.operand_word();
        match self.addressing_mode {
            Implicit => String::new(),
            Accumulator => "A".to_string(),
            Immediate => format!("#${:02X}", value),
            ZeroPage => format!("${:02X}", value),
            ZeroPageX => format!("${:02X},X", value),
            ZeroPageY => format!("${:02X},Y", value),
            Relative => {
                let offset = value as u8 as i8;
                let target = self.address.wrapping_add(2).wrapping_add(offset as u16);
                format!("${:04X}", target)
            }
            Absolute => format!("${:04X}", value),
            AbsoluteX => format!("${:04X},X", value),
            AbsoluteY => format!("${:04X},Y", value),
            Indirect => format!("(${:04X})", value),
            IndirectX => format!("(${:02X},X)", value),
            IndirectY => format!("(${:02X}),Y", value),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let operand = self.format_operand();
        if self.mnemonic == Mnemonic::Undefined {
            write!(f, ".byte {}", operand)
        } else if operand.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, operand)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn memory_with(address: u16, bytes: &[u8]) -> FlatMemory {
        let mut mem = FlatMemory::new();
        mem.load(address, bytes);
        mem
    }

    #[test]
    fn test_format_immediate() {
        let mem = memory_with(0x8000, &[0xA9, 0x42]);
        assert_eq!(decode(&mem, 0x8000, false).to_string(), "LDA #$42");
    }

    #[test]
    fn test_format_implied() {
        let mem = memory_with(0x1000, &[0xEA]);
        let instruction = decode(&mem, 0x1000, false);
        assert_eq!(instruction.to_string(), "NOP");
        assert_eq!(instruction.size_bytes, 1);
    }

    #[test]
    fn test_format_branch_target() {
        let mem = memory_with(0x2000, &[0xD0, 0xFE]);
        assert_eq!(decode(&mem, 0x2000, false).to_string(), "BNE $2000");
    }

    #[test]
    fn test_format_indirect_y() {
        let mem = memory_with(0x2000, &[0xB1, 0xFB]);
        assert_eq!(decode(&mem, 0x2000, false).to_string(), "LDA ($FB),Y");
    }

    #[test]
    fn test_undocumented_opcode() {
        let mem = memory_with(0x2000, &[0xA7, 0x10]);

        let plain = decode(&mem, 0x2000, false);
        assert_eq!(plain.to_string(), ".byte $A7");
        assert_eq!(plain.size_bytes, 1);

        let illegal = decode(&mem, 0x2000, true);
        assert_eq!(illegal.to_string(), "LAX $10");
        assert_eq!(illegal.size_bytes, 2);
    }
}
