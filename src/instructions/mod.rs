//! # 6502 Instruction Implementations
//!
//! This module contains the implementations of all documented 6502 instructions,
//! organized by category, plus the undocumented opcodes in [`illegal`].
//! Each instruction is a standalone function that takes a mutable reference to
//! the CPU and the addressing mode taken from the opcode table.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, RTI, BRK, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLI, SEI, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)
//!
//! The opcode byte has already been consumed when an instruction runs, and the
//! base tick cost has already been charged. Instructions only add the
//! conditional ticks (page crossing, branch taken).

pub mod alu;
pub mod branches;
pub mod control;
pub mod flags;
pub mod illegal;
pub mod inc_dec;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::opcodes::{Mnemonic, OPCODE_TABLE};
use crate::{Cpu, MemoryBus};

/// Executes a documented opcode.
///
/// Returns false without touching the CPU when `opcode` has no documented
/// meaning.
pub(crate) fn execute<M: MemoryBus>(cpu: &mut Cpu<M>, opcode: u8) -> bool {
    let metadata = &OPCODE_TABLE[opcode as usize];
    if !metadata.is_defined() {
        return false;
    }

    cpu.tick(metadata.base_ticks as u32);
    let mode = metadata.addressing_mode;

    match metadata.mnemonic {
        Mnemonic::Adc => alu::adc(cpu, mode),
        Mnemonic::And => alu::and(cpu, mode),
        Mnemonic::Bit => alu::bit(cpu, mode),
        Mnemonic::Cmp => alu::cmp(cpu, mode),
        Mnemonic::Cpx => alu::cpx(cpu, mode),
        Mnemonic::Cpy => alu::cpy(cpu, mode),
        Mnemonic::Eor => alu::eor(cpu, mode),
        Mnemonic::Ora => alu::ora(cpu, mode),
        Mnemonic::Sbc => alu::sbc(cpu, mode),

        Mnemonic::Bcc => branches::bcc(cpu),
        Mnemonic::Bcs => branches::bcs(cpu),
        Mnemonic::Beq => branches::beq(cpu),
        Mnemonic::Bmi => branches::bmi(cpu),
        Mnemonic::Bne => branches::bne(cpu),
        Mnemonic::Bpl => branches::bpl(cpu),
        Mnemonic::Bvc => branches::bvc(cpu),
        Mnemonic::Bvs => branches::bvs(cpu),

        Mnemonic::Brk => control::brk(cpu),
        Mnemonic::Jmp => control::jmp(cpu, mode),
        Mnemonic::Jsr => control::jsr(cpu),
        Mnemonic::Nop => control::nop(cpu, mode),
        Mnemonic::Rti => control::rti(cpu),
        Mnemonic::Rts => control::rts(cpu),

        Mnemonic::Clc => flags::clc(cpu),
        Mnemonic::Cld => flags::cld(cpu),
        Mnemonic::Cli => flags::cli(cpu),
        Mnemonic::Clv => flags::clv(cpu),
        Mnemonic::Sec => flags::sec(cpu),
        Mnemonic::Sed => flags::sed(cpu),
        Mnemonic::Sei => flags::sei(cpu),

        Mnemonic::Dec => inc_dec::dec(cpu, mode),
        Mnemonic::Dex => inc_dec::dex(cpu),
        Mnemonic::Dey => inc_dec::dey(cpu),
        Mnemonic::Inc => inc_dec::inc(cpu, mode),
        Mnemonic::Inx => inc_dec::inx(cpu),
        Mnemonic::Iny => inc_dec::iny(cpu),

        Mnemonic::Lda => load_store::lda(cpu, mode),
        Mnemonic::Ldx => load_store::ldx(cpu, mode),
        Mnemonic::Ldy => load_store::ldy(cpu, mode),
        Mnemonic::Sta => load_store::sta(cpu, mode),
        Mnemonic::Stx => load_store::stx(cpu, mode),
        Mnemonic::Sty => load_store::sty(cpu, mode),

        Mnemonic::Asl => shifts::asl(cpu, mode),
        Mnemonic::Lsr => shifts::lsr(cpu, mode),
        Mnemonic::Rol => shifts::rol(cpu, mode),
        Mnemonic::Ror => shifts::ror(cpu, mode),

        Mnemonic::Pha => stack::pha(cpu),
        Mnemonic::Php => stack::php(cpu),
        Mnemonic::Pla => stack::pla(cpu),
        Mnemonic::Plp => stack::plp(cpu),

        Mnemonic::Tax => transfer::tax(cpu),
        Mnemonic::Tay => transfer::tay(cpu),
        Mnemonic::Tsx => transfer::tsx(cpu),
        Mnemonic::Txa => transfer::txa(cpu),
        Mnemonic::Txs => transfer::txs(cpu),
        Mnemonic::Tya => transfer::tya(cpu),

        // The documented table never names these.
        Mnemonic::Alr
        | Mnemonic::Anc
        | Mnemonic::Dcp
        | Mnemonic::Isc
        | Mnemonic::Lax
        | Mnemonic::Rla
        | Mnemonic::Rra
        | Mnemonic::Sax
        | Mnemonic::Slo
        | Mnemonic::Sre
        | Mnemonic::Undefined => return false,
    }

    true
}
