//! # Opcode Metadata Tables
//!
//! Two compile-time 256-entry tables describe every opcode the interpreter
//! knows about:
//!
//! - [`OPCODE_TABLE`]: the 151 documented NMOS 6502 instructions. Every other
//!   slot holds [`OpcodeMetadata::UNDEFINED`].
//! - [`ILLEGAL_OPCODE_TABLE`]: the undocumented opcodes the illegal-opcode
//!   layer models. Every other slot is undefined.
//!
//! Each entry carries the mnemonic, addressing mode, base tick cost and size.
//! Base costs exclude the conditional page-crossing and branch-taken ticks.

use crate::addressing::AddressingMode;
use crate::addressing::AddressingMode::*;

/// Instruction mnemonics, documented and undocumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    // Undocumented
    Alr,
    Anc,
    Dcp,
    Isc,
    Lax,
    Rla,
    Rra,
    Sax,
    Slo,
    Sre,
    /// Slot with no known instruction.
    Undefined,
}

impl Mnemonic {
    /// Upper-case assembler name, `"???"` for undefined slots.
    pub const fn name(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
            Mnemonic::Alr => "ALR",
            Mnemonic::Anc => "ANC",
            Mnemonic::Dcp => "DCP",
            Mnemonic::Isc => "ISC",
            Mnemonic::Lax => "LAX",
            Mnemonic::Rla => "RLA",
            Mnemonic::Rra => "RRA",
            Mnemonic::Sax => "SAX",
            Mnemonic::Slo => "SLO",
            Mnemonic::Sre => "SRE",
            Mnemonic::Undefined => "???",
        }
    }
}

impl std::fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata for a single opcode.
///
/// # Examples
///
/// ```
/// use mos6510::{AddressingMode, Mnemonic, OPCODE_TABLE};
///
/// let lda_imm = &OPCODE_TABLE[0xA9];
/// assert_eq!(lda_imm.mnemonic, Mnemonic::Lda);
/// assert_eq!(lda_imm.addressing_mode, AddressingMode::Immediate);
/// assert_eq!(lda_imm.base_ticks, 2);
/// assert_eq!(lda_imm.size_bytes, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Instruction mnemonic.
    pub mnemonic: Mnemonic,

    /// Addressing mode for this instruction.
    pub addressing_mode: AddressingMode,

    /// Base tick cost (before page crossing and branch penalties).
    pub base_ticks: u8,

    /// Total instruction size in bytes (opcode + operands).
    pub size_bytes: u8,
}

impl OpcodeMetadata {
    /// Filler for table slots without an instruction.
    pub const UNDEFINED: OpcodeMetadata = OpcodeMetadata {
        mnemonic: Mnemonic::Undefined,
        addressing_mode: Implicit,
        base_ticks: 2,
        size_bytes: 1,
    };

    const fn new(mnemonic: Mnemonic, addressing_mode: AddressingMode, base_ticks: u8) -> Self {
        Self {
            mnemonic,
            addressing_mode,
            base_ticks,
            size_bytes: 1 + addressing_mode.operand_bytes(),
        }
    }

    /// Returns true for slots that hold an instruction.
    pub const fn is_defined(&self) -> bool {
        !matches!(self.mnemonic, Mnemonic::Undefined)
    }
}

type Entry = (u8, Mnemonic, AddressingMode, u8);

const DOCUMENTED: &[Entry] = &[
    (0x69, Mnemonic::Adc, Immediate, 2),
    (0x65, Mnemonic::Adc, ZeroPage, 3),
    (0x75, Mnemonic::Adc, ZeroPageX, 4),
    (0x6D, Mnemonic::Adc, Absolute, 4),
    (0x7D, Mnemonic::Adc, AbsoluteX, 4),
    (0x79, Mnemonic::Adc, AbsoluteY, 4),
    (0x61, Mnemonic::Adc, IndirectX, 6),
    (0x71, Mnemonic::Adc, IndirectY, 5),
    (0x29, Mnemonic::And, Immediate, 2),
    (0x25, Mnemonic::And, ZeroPage, 3),
    (0x35, Mnemonic::And, ZeroPageX, 4),
    (0x2D, Mnemonic::And, Absolute, 4),
    (0x3D, Mnemonic::And, AbsoluteX, 4),
    (0x39, Mnemonic::And, AbsoluteY, 4),
    (0x21, Mnemonic::And, IndirectX, 6),
    (0x31, Mnemonic::And, IndirectY, 5),
    (0x0A, Mnemonic::Asl, Accumulator, 2),
    (0x06, Mnemonic::Asl, ZeroPage, 5),
    (0x16, Mnemonic::Asl, ZeroPageX, 6),
    (0x0E, Mnemonic::Asl, Absolute, 6),
    (0x1E, Mnemonic::Asl, AbsoluteX, 7),
    (0x90, Mnemonic::Bcc, Relative, 2),
    (0xB0, Mnemonic::Bcs, Relative, 2),
    (0xF0, Mnemonic::Beq, Relative, 2),
    (0x30, Mnemonic::Bmi, Relative, 2),
    (0xD0, Mnemonic::Bne, Relative, 2),
    (0x10, Mnemonic::Bpl, Relative, 2),
    (0x50, Mnemonic::Bvc, Relative, 2),
    (0x70, Mnemonic::Bvs, Relative, 2),
    (0x24, Mnemonic::Bit, ZeroPage, 3),
    (0x2C, Mnemonic::Bit, Absolute, 4),
    (0x00, Mnemonic::Brk, Implicit, 7),
    (0x18, Mnemonic::Clc, Implicit, 2),
    (0xD8, Mnemonic::Cld, Implicit, 2),
    (0x58, Mnemonic::Cli, Implicit, 2),
    (0xB8, Mnemonic::Clv, Implicit, 2),
    (0xC9, Mnemonic::Cmp, Immediate, 2),
    (0xC5, Mnemonic::Cmp, ZeroPage, 3),
    (0xD5, Mnemonic::Cmp, ZeroPageX, 4),
    (0xCD, Mnemonic::Cmp, Absolute, 4),
    (0xDD, Mnemonic::Cmp, AbsoluteX, 4),
    (0xD9, Mnemonic::Cmp, AbsoluteY, 4),
    (0xC1, Mnemonic::Cmp, IndirectX, 6),
    (0xD1, Mnemonic::Cmp, IndirectY, 5),
    (0xE0, Mnemonic::Cpx, Immediate, 2),
    (0xE4, Mnemonic::Cpx, ZeroPage, 3),
    (0xEC, Mnemonic::Cpx, Absolute, 4),
    (0xC0, Mnemonic::Cpy, Immediate, 2),
    (0xC4, Mnemonic::Cpy, ZeroPage, 3),
    (0xCC, Mnemonic::Cpy, Absolute, 4),
    (0xC6, Mnemonic::Dec, ZeroPage, 5),
    (0xD6, Mnemonic::Dec, ZeroPageX, 6),
    (0xCE, Mnemonic::Dec, Absolute, 6),
    (0xDE, Mnemonic::Dec, AbsoluteX, 7),
    (0xCA, Mnemonic::Dex, Implicit, 2),
    (0x88, Mnemonic::Dey, Implicit, 2),
    (0x49, Mnemonic::Eor, Immediate, 2),
    (0x45, Mnemonic::Eor, ZeroPage, 3),
    (0x55, Mnemonic::Eor, ZeroPageX, 4),
    (0x4D, Mnemonic::Eor, Absolute, 4),
    (0x5D, Mnemonic::Eor, AbsoluteX, 4),
    (0x59, Mnemonic::Eor, AbsoluteY, 4),
    (0x41, Mnemonic::Eor, IndirectX, 6),
    (0x51, Mnemonic::Eor, IndirectY, 5),
    (0xE6, Mnemonic::Inc, ZeroPage, 5),
    (0xF6, Mnemonic::Inc, ZeroPageX, 6),
    (0xEE, Mnemonic::Inc, Absolute, 6),
    (0xFE, Mnemonic::Inc, AbsoluteX, 7),
    (0xE8, Mnemonic::Inx, Implicit, 2),
    (0xC8, Mnemonic::Iny, Implicit, 2),
    (0x4C, Mnemonic::Jmp, Absolute, 3),
    (0x6C, Mnemonic::Jmp, Indirect, 5),
    (0x20, Mnemonic::Jsr, Absolute, 6),
    (0xA9, Mnemonic::Lda, Immediate, 2),
    (0xA5, Mnemonic::Lda, ZeroPage, 3),
    (0xB5, Mnemonic::Lda, ZeroPageX, 4),
    (0xAD, Mnemonic::Lda, Absolute, 4),
    (0xBD, Mnemonic::Lda, AbsoluteX, 4),
    (0xB9, Mnemonic::Lda, AbsoluteY, 4),
    (0xA1, Mnemonic::Lda, IndirectX, 6),
    (0xB1, Mnemonic::Lda, IndirectY, 5),
    (0xA2, Mnemonic::Ldx, Immediate, 2),
    (0xA6, Mnemonic::Ldx, ZeroPage, 3),
    (0xB6, Mnemonic::Ldx, ZeroPageY, 4),
    (0xAE, Mnemonic::Ldx, Absolute, 4),
    (0xBE, Mnemonic::Ldx, AbsoluteY, 4),
    (0xA0, Mnemonic::Ldy, Immediate, 2),
    (0xA4, Mnemonic::Ldy, ZeroPage, 3),
    (0xB4, Mnemonic::Ldy, ZeroPageX, 4),
    (0xAC, Mnemonic::Ldy, Absolute, 4),
    (0xBC, Mnemonic::Ldy, AbsoluteX, 4),
    (0x4A, Mnemonic::Lsr, Accumulator, 2),
    (0x46, Mnemonic::Lsr, ZeroPage, 5),
    (0x56, Mnemonic::Lsr, ZeroPageX, 6),
    (0x4E, Mnemonic::Lsr, Absolute, 6),
    (0x5E, Mnemonic::Lsr, AbsoluteX, 7),
    (0xEA, Mnemonic::Nop, Implicit, 2),
    (0x09, Mnemonic::Ora, Immediate, 2),
    (0x05, Mnemonic::Ora, ZeroPage, 3),
    (0x15, Mnemonic::Ora, ZeroPageX, 4),
    (0x0D, Mnemonic::Ora, Absolute, 4),
    (0x1D, Mnemonic::Ora, AbsoluteX, 4),
    (0x19, Mnemonic::Ora, AbsoluteY, 4),
    (0x01, Mnemonic::Ora, IndirectX, 6),
    (0x11, Mnemonic::Ora, IndirectY, 5),
    (0x48, Mnemonic::Pha, Implicit, 3),
    (0x08, Mnemonic::Php, Implicit, 3),
    (0x68, Mnemonic::Pla, Implicit, 4),
    (0x28, Mnemonic::Plp, Implicit, 4),
    (0x2A, Mnemonic::Rol, Accumulator, 2),
    (0x26, Mnemonic::Rol, ZeroPage, 5),
    (0x36, Mnemonic::Rol, ZeroPageX, 6),
    (0x2E, Mnemonic::Rol, Absolute, 6),
    (0x3E, Mnemonic::Rol, AbsoluteX, 7),
    (0x6A, Mnemonic::Ror, Accumulator, 2),
    (0x66, Mnemonic::Ror, ZeroPage, 5),
    (0x76, Mnemonic::Ror, ZeroPageX, 6),
    (0x6E, Mnemonic::Ror, Absolute, 6),
    (0x7E, Mnemonic::Ror, AbsoluteX, 7),
    (0x40, Mnemonic::Rti, Implicit, 6),
    (0x60, Mnemonic::Rts, Implicit, 6),
    (0xE9, Mnemonic::Sbc, Immediate, 2),
    (0xE5, Mnemonic::Sbc, ZeroPage, 3),
    (0xF5, Mnemonic::Sbc, ZeroPageX, 4),
    (0xED, Mnemonic::Sbc, Absolute, 4),
    (0xFD, Mnemonic::Sbc, AbsoluteX, 4),
    (0xF9, Mnemonic::Sbc, AbsoluteY, 4),
    (0xE1, Mnemonic::Sbc, IndirectX, 6),
    (0xF1, Mnemonic::Sbc, IndirectY, 5),
    (0x38, Mnemonic::Sec, Implicit, 2),
    (0xF8, Mnemonic::Sed, Implicit, 2),
    (0x78, Mnemonic::Sei, Implicit, 2),
    (0x85, Mnemonic::Sta, ZeroPage, 3),
    (0x95, Mnemonic::Sta, ZeroPageX, 4),
    (0x8D, Mnemonic::Sta, Absolute, 4),
    (0x9D, Mnemonic::Sta, AbsoluteX, 5),
    (0x99, Mnemonic::Sta, AbsoluteY, 5),
    (0x81, Mnemonic::Sta, IndirectX, 6),
    (0x91, Mnemonic::Sta, IndirectY, 6),
    (0x86, Mnemonic::Stx, ZeroPage, 3),
    (0x96, Mnemonic::Stx, ZeroPageY, 4),
    (0x8E, Mnemonic::Stx, Absolute, 4),
    (0x84, Mnemonic::Sty, ZeroPage, 3),
    (0x94, Mnemonic::Sty, ZeroPageX, 4),
    (0x8C, Mnemonic::Sty, Absolute, 4),
    (0xAA, Mnemonic::Tax, Implicit, 2),
    (0xA8, Mnemonic::Tay, Implicit, 2),
    (0xBA, Mnemonic::Tsx, Implicit, 2),
    (0x8A, Mnemonic::Txa, Implicit, 2),
    (0x9A, Mnemonic::Txs, Implicit, 2),
    (0x98, Mnemonic::Tya, Implicit, 2),
];

const UNDOCUMENTED: &[Entry] = &[
    (0x07, Mnemonic::Slo, ZeroPage, 5),
    (0x17, Mnemonic::Slo, ZeroPageX, 6),
    (0x0F, Mnemonic::Slo, Absolute, 6),
    (0x1F, Mnemonic::Slo, AbsoluteX, 7),
    (0x1B, Mnemonic::Slo, AbsoluteY, 7),
    (0x03, Mnemonic::Slo, IndirectX, 8),
    (0x13, Mnemonic::Slo, IndirectY, 8),
    (0x27, Mnemonic::Rla, ZeroPage, 5),
    (0x37, Mnemonic::Rla, ZeroPageX, 6),
    (0x2F, Mnemonic::Rla, Absolute, 6),
    (0x3F, Mnemonic::Rla, AbsoluteX, 7),
    (0x3B, Mnemonic::Rla, AbsoluteY, 7),
    (0x23, Mnemonic::Rla, IndirectX, 8),
    (0x33, Mnemonic::Rla, IndirectY, 8),
    (0x47, Mnemonic::Sre, ZeroPage, 5),
    (0x57, Mnemonic::Sre, ZeroPageX, 6),
    (0x4F, Mnemonic::Sre, Absolute, 6),
    (0x5F, Mnemonic::Sre, AbsoluteX, 7),
    (0x5B, Mnemonic::Sre, AbsoluteY, 7),
    (0x43, Mnemonic::Sre, IndirectX, 8),
    (0x53, Mnemonic::Sre, IndirectY, 8),
    (0x67, Mnemonic::Rra, ZeroPage, 5),
    (0x77, Mnemonic::Rra, ZeroPageX, 6),
    (0x6F, Mnemonic::Rra, Absolute, 6),
    (0x7F, Mnemonic::Rra, AbsoluteX, 7),
    (0x7B, Mnemonic::Rra, AbsoluteY, 7),
    (0x63, Mnemonic::Rra, IndirectX, 8),
    (0x73, Mnemonic::Rra, IndirectY, 8),
    (0x87, Mnemonic::Sax, ZeroPage, 3),
    (0x97, Mnemonic::Sax, ZeroPageY, 4),
    (0x8F, Mnemonic::Sax, Absolute, 4),
    (0x83, Mnemonic::Sax, IndirectX, 6),
    (0xA7, Mnemonic::Lax, ZeroPage, 3),
    (0xB7, Mnemonic::Lax, ZeroPageY, 4),
    (0xAF, Mnemonic::Lax, Absolute, 4),
    (0xBF, Mnemonic::Lax, AbsoluteY, 4),
    (0xA3, Mnemonic::Lax, IndirectX, 6),
    (0xB3, Mnemonic::Lax, IndirectY, 5),
    (0xC7, Mnemonic::Dcp, ZeroPage, 5),
    (0xD7, Mnemonic::Dcp, ZeroPageX, 6),
    (0xCF, Mnemonic::Dcp, Absolute, 6),
    (0xDF, Mnemonic::Dcp, AbsoluteX, 7),
    (0xDB, Mnemonic::Dcp, AbsoluteY, 7),
    (0xC3, Mnemonic::Dcp, IndirectX, 8),
    (0xD3, Mnemonic::Dcp, IndirectY, 8),
    (0xE7, Mnemonic::Isc, ZeroPage, 5),
    (0xF7, Mnemonic::Isc, ZeroPageX, 6),
    (0xEF, Mnemonic::Isc, Absolute, 6),
    (0xFF, Mnemonic::Isc, AbsoluteX, 7),
    (0xFB, Mnemonic::Isc, AbsoluteY, 7),
    (0xE3, Mnemonic::Isc, IndirectX, 8),
    (0xF3, Mnemonic::Isc, IndirectY, 8),
    (0x0B, Mnemonic::Anc, Immediate, 2),
    (0x2B, Mnemonic::Anc, Immediate, 2),
    (0x4B, Mnemonic::Alr, Immediate, 2),
    (0xEB, Mnemonic::Sbc, Immediate, 2),
    (0x1A, Mnemonic::Nop, Implicit, 2),
    (0x3A, Mnemonic::Nop, Implicit, 2),
    (0x5A, Mnemonic::Nop, Implicit, 2),
    (0x7A, Mnemonic::Nop, Implicit, 2),
    (0xDA, Mnemonic::Nop, Implicit, 2),
    (0xFA, Mnemonic::Nop, Implicit, 2),
    (0x80, Mnemonic::Nop, Immediate, 2),
    (0x82, Mnemonic::Nop, Immediate, 2),
    (0x89, Mnemonic::Nop, Immediate, 2),
    (0xC2, Mnemonic::Nop, Immediate, 2),
    (0xE2, Mnemonic::Nop, Immediate, 2),
    (0x04, Mnemonic::Nop, ZeroPage, 3),
    (0x44, Mnemonic::Nop, ZeroPage, 3),
    (0x64, Mnemonic::Nop, ZeroPage, 3),
    (0x14, Mnemonic::Nop, ZeroPageX, 4),
    (0x34, Mnemonic::Nop, ZeroPageX, 4),
    (0x54, Mnemonic::Nop, ZeroPageX, 4),
    (0x74, Mnemonic::Nop, ZeroPageX, 4),
    (0xD4, Mnemonic::Nop, ZeroPageX, 4),
    (0xF4, Mnemonic::Nop, ZeroPageX, 4),
    (0x0C, Mnemonic::Nop, Absolute, 4),
    (0x1C, Mnemonic::Nop, AbsoluteX, 4),
    (0x3C, Mnemonic::Nop, AbsoluteX, 4),
    (0x5C, Mnemonic::Nop, AbsoluteX, 4),
    (0x7C, Mnemonic::Nop, AbsoluteX, 4),
    (0xDC, Mnemonic::Nop, AbsoluteX, 4),
    (0xFC, Mnemonic::Nop, AbsoluteX, 4),
];

const fn build(entries: &[Entry]) -> [OpcodeMetadata; 256] {
    let mut table = [OpcodeMetadata::UNDEFINED; 256];
    let mut i = 0;
    while i < entries.len() {
        let (opcode, mnemonic, mode, ticks) = entries[i];
        table[opcode as usize] = OpcodeMetadata::new(mnemonic, mode, ticks);
        i += 1;
    }
    table
}

/// Documented NMOS 6502 instructions, indexed by opcode.
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = build(DOCUMENTED);

/// Undocumented opcodes modeled by the illegal-opcode layer, indexed by opcode.
pub const ILLEGAL_OPCODE_TABLE: [OpcodeMetadata; 256] = build(UNDOCUMENTED);

/// Looks an opcode up in the documented table, then the undocumented one.
pub fn lookup(opcode: u8) -> &'static OpcodeMetadata {
    let documented = &OPCODE_TABLE[opcode as usize];
    if documented.is_defined() {
        documented
    } else {
        &ILLEGAL_OPCODE_TABLE[opcode as usize]
    }
}
