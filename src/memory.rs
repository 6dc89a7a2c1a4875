//! # Memory Bus Abstraction
//!
//! This module provides the `MemoryBus` trait that decouples the CPU from specific
//! memory implementations. The C64 banked memory, the functional test harness and
//! the unit tests all plug into the CPU through this trait.
//!
//! ## Design Principles
//!
//! The MemoryBus trait follows 6502 hardware behavior:
//! - No bus errors - reads/writes always succeed
//! - Writes to ROM/unmapped regions may be ignored
//! - 16-bit reads are little-endian and come in two flavours, see [`Wrap`]

/// How a 16-bit read treats the byte following `addr`.
///
/// The NMOS 6502 does not carry into the high address byte when it fetches the
/// second byte of an indirect vector, so `JMP ($30FF)` reads its high byte from
/// `$3000`. Zero-page pointer fetches wrap in the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// Read `addr` and `addr + 1`.
    Linear,
    /// Read `addr` and the next byte within the same 256-byte page.
    Page,
}

/// Memory bus trait for CPU to read/write bytes.
///
/// Implementations of this trait provide the memory backend for the CPU.
/// The CPU accesses all memory (RAM, ROM, I/O) through this abstraction.
///
/// # Design
///
/// - `read(&self)`: Immutable reference allows shared reads
/// - `write(&mut self)`: Mutable reference makes side effects explicit
/// - No error types: 6502 hardware has no bus error mechanism
///
/// # Examples
///
/// ```
/// use mos6510::{FlatMemory, MemoryBus, Wrap};
///
/// let mut mem = FlatMemory::new();
/// mem.write(0x30FF, 0x34);
/// mem.write(0x3000, 0x12);
/// mem.write(0x3100, 0x56);
///
/// assert_eq!(mem.read16(0x30FF, Wrap::Page), 0x1234);
/// assert_eq!(mem.read16(0x30FF, Wrap::Linear), 0x5634);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic. Reads of I/O registers may have side
    /// effects (acknowledging interrupts) through interior mutability.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic. If the address is read-only or unmapped,
    /// implementations may ignore the write (matching 6502 hardware behavior).
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word starting at `addr`.
    fn read16(&self, addr: u16, wrap: Wrap) -> u16 {
        let high_addr = match wrap {
            Wrap::Linear => addr.wrapping_add(1),
            Wrap::Page => (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF),
        };

        let low = self.read(addr) as u16;
        let high = self.read(high_addr) as u16;
        (high << 8) | low
    }
}

/// Simple 64KB flat memory implementation.
///
/// All 65536 addresses (0x0000-0xFFFF) are mapped to a single contiguous RAM
/// array initialized to 0x00. Used by the unit tests and by the functional
/// test runner, which needs every byte to be writable.
///
/// # Examples
///
/// ```
/// use mos6510::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Reset vector low byte
/// memory.write(0xFFFD, 0x80); // Reset vector high byte (PC = 0x8000)
///
/// let mut cpu = Cpu::new(memory);
/// cpu.boot();
/// assert_eq!(cpu.pc(), 0x8000);
/// ```
pub struct FlatMemory {
    /// 64KB contiguous memory array
    data: Box<[u8; 65536]>,
}

impl FlatMemory {
    /// Creates a new FlatMemory instance with all bytes initialized to zero.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; 65536]),
        }
    }

    /// Copies `bytes` into memory starting at `start`, wrapping at 0xFFFF.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        let mut addr = start;
        for &byte in bytes {
            self.data[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }
}

impl Default for FlatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBus for FlatMemory {
    fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }
}
