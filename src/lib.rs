//! # MOS 6510 CPU Core
//!
//! An instruction-level NMOS 6510 emulator: the processor at the heart of
//! the Commodore 64.
//!
//! This crate provides the CPU state, a trait-based memory bus abstraction,
//! table-driven opcode metadata, an optional undocumented-opcode layer and a
//! single-instruction disassembler. The C64 chips and the machine built around
//! this core live in the `c64-core` workspace member.
//!
//! ## Quick Start
//!
//! ```rust
//! use mos6510::{Cpu, FlatMemory, MemoryBus};
//!
//! // Create 64KB flat memory
//! let mut memory = FlatMemory::new();
//!
//! // Set reset vector to point to program start at 0x8000
//! memory.write(0xFFFC, 0x00); // Low byte
//! memory.write(0xFFFD, 0x80); // High byte
//! memory.load(0x8000, &[0xA9, 0x05, 0x69, 0x03]); // LDA #5 ; ADC #3
//!
//! let mut cpu = Cpu::new(memory);
//! cpu.boot();
//! assert_eq!(cpu.pc(), 0x8000);
//!
//! cpu.cycle();
//! cpu.cycle();
//! assert_eq!(cpu.a(), 0x08);
//! ```
//!
//! ## Architecture
//!
//! - **Modularity**: CPU state is separated from memory implementation via the `MemoryBus` trait
//! - **Tick Accounting**: every instruction charges its documented cost,
//!   including page-crossing and branch penalties
//! - **Table-Driven Design**: all opcode metadata lives in two 256-entry tables
//! - **Layered Decoding**: the [`Opcoder`] selects documented-only or
//!   documented plus undocumented opcodes
//!
//! ## Modules
//!
//! - `cpu` - CPU state, stack, interrupts and the execution cycle
//! - `memory` - MemoryBus trait and the flat 64KB implementation
//! - `opcodes` - Opcode metadata tables
//! - `addressing` - Addressing modes and operand fetchers
//! - `opcoder` - Opcode dispatch layering
//! - `bits` - Bit and BCD helpers
//! - `disassembler` - Single-instruction disassembly

pub mod addressing;
pub mod bits;
pub mod cpu;
pub mod disassembler;
pub mod memory;
pub mod opcoder;
pub mod opcodes;

// Internal instruction implementations (not part of public API)
mod instructions;

// Re-export public API
pub use addressing::{AddressingMode, Operand};
pub use cpu::Cpu;
pub use memory::{FlatMemory, MemoryBus, Wrap};
pub use opcoder::Opcoder;
pub use opcodes::{Mnemonic, OpcodeMetadata, ILLEGAL_OPCODE_TABLE, OPCODE_TABLE};
