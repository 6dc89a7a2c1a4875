//! # Addressing Modes
//!
//! This module defines the 13 addressing modes supported by the 6502 processor
//! and the operand fetchers that resolve them against the CPU state.
//!
//! Every fetcher consumes its operand bytes from the program counter and hands
//! back an [`Operand`] carrying both the effective address and, for reads, the
//! byte found there. Page-crossing is reported rather than charged; read
//! instructions add the extra tick themselves, while stores and
//! read-modify-write instructions already pay for it in their base cost.

use crate::bits::will_cross_page;
use crate::memory::Wrap;
use crate::{Cpu, MemoryBus};

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implicit, Accumulator
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLC, RTS, NOP
    Implicit,

    /// Operates directly on the accumulator register.
    ///
    /// Examples: LSR A, ROL A, ASL A
    Accumulator,

    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wrapping within page 0.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wrapping within page 0.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Signed 8-bit offset for branch instructions.
    Relative,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// May incur +1 cycle penalty if page boundary is crossed.
    AbsoluteY,

    /// Indirect jump through 16-bit pointer.
    ///
    /// Only used by JMP. The pointer's high byte is fetched without carrying
    /// into the page, see [`Wrap::Page`].
    Indirect,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: dereference ZP then add Y.
    ///
    /// Example: LDA ($40),Y
    /// May incur +1 cycle penalty if page boundary is crossed.
    IndirectY,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }
}

/// A resolved operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    /// Effective address. For immediate operands this is the address of the
    /// operand byte itself.
    pub address: u16,
    /// Byte read from `address` (zero when the fetcher did not read).
    pub value: u8,
    /// The indexed address landed on a different page than its base.
    pub page_crossed: bool,
}

impl<M: MemoryBus> Cpu<M> {
    /// Reads the byte at PC and advances PC.
    pub(crate) fn read_pc8(&mut self) -> u8 {
        let value = self.memory.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Reads the little-endian word at PC and advances PC by two.
    pub(crate) fn read_pc16(&mut self) -> u16 {
        let value = self.memory.read16(self.pc, Wrap::Linear);
        self.pc = self.pc.wrapping_add(2);
        value
    }

    /// Resolves the effective address for `mode` without reading the target.
    ///
    /// Used by stores and read-modify-write instructions.
    pub(crate) fn resolve(&mut self, mode: AddressingMode) -> Operand {
        let (address, page_crossed) = match mode {
            AddressingMode::Immediate => {
                let address = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (address, false)
            }
            AddressingMode::ZeroPage => (self.read_pc8() as u16, false),
            AddressingMode::ZeroPageX => (self.read_pc8().wrapping_add(self.x) as u16, false),
            AddressingMode::ZeroPageY => (self.read_pc8().wrapping_add(self.y) as u16, false),
            AddressingMode::Absolute => (self.read_pc16(), false),
            AddressingMode::AbsoluteX => {
                let base = self.read_pc16();
                (
                    base.wrapping_add(self.x as u16),
                    will_cross_page(base, self.x as i16),
                )
            }
            AddressingMode::AbsoluteY => {
                let base = self.read_pc16();
                (
                    base.wrapping_add(self.y as u16),
                    will_cross_page(base, self.y as i16),
                )
            }
            AddressingMode::Indirect => {
                let pointer = self.read_pc16();
                (self.memory.read16(pointer, Wrap::Page), false)
            }
            AddressingMode::IndirectX => {
                let pointer = self.read_pc8().wrapping_add(self.x) as u16;
                (self.memory.read16(pointer, Wrap::Page), false)
            }
            AddressingMode::IndirectY => {
                let pointer = self.read_pc8() as u16;
                let base = self.memory.read16(pointer, Wrap::Page);
                (
                    base.wrapping_add(self.y as u16),
                    will_cross_page(base, self.y as i16),
                )
            }
            AddressingMode::Relative => {
                let address = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (address, false)
            }
            AddressingMode::Implicit | AddressingMode::Accumulator => (0, false),
        };

        Operand {
            address,
            value: 0,
            page_crossed,
        }
    }

    /// Resolves `mode` and reads the operand byte.
    ///
    /// Does not charge the page-crossing tick; see [`Cpu::fetch_read`].
    pub(crate) fn fetch(&mut self, mode: AddressingMode) -> Operand {
        let mut operand = self.resolve(mode);
        operand.value = match mode {
            AddressingMode::Accumulator => self.a,
            AddressingMode::Implicit => 0,
            _ => self.memory.read(operand.address),
        };
        operand
    }

    /// Resolves and reads the operand of a read instruction, charging one tick
    /// when an indexed access crossed a page.
    pub(crate) fn fetch_read(&mut self, mode: AddressingMode) -> Operand {
        let operand = self.fetch(mode);
        if operand.page_crossed {
            self.tick(1);
        }
        operand
    }
}
