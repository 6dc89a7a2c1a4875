//! # CPU State and Execution
//!
//! This module contains the `Cpu` struct representing the 6510 processor state,
//! the stack, interrupt delivery and the tick counter.
//!
//! ## CPU State
//!
//! The CPU maintains:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): 8-bit offset into stack page (0x0100-0x01FF)
//! - **Status flags**: N, V, B, D, I, Z, C (individual bool fields). Bit 5 of
//!   the packed status byte has no storage and always reads as 1.
//! - **Tick counter**: u64 monotonically increasing tick count
//!
//! ## Execution Model
//!
//! `cycle()` runs one unit of work: it either services a latched interrupt or
//! hands the next opcode to the configured [`Opcoder`]. Nothing interrupts an
//! instruction half-way, so every side effect of an instruction is visible
//! before the surrounding machine advances its chips.

use crate::bits::will_cross_page;
use crate::memory::Wrap;
use crate::{MemoryBus, Opcoder};

/// NMI vector address.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Cold-start (reset) vector address.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// Shared IRQ/BRK vector address.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Base address of the hardware stack page.
const STACK_PAGE: u16 = 0x0100;

/// Status register bit masks (NV-BDIZC).
pub mod status {
    pub const CARRY: u8 = 0b0000_0001;
    pub const ZERO: u8 = 0b0000_0010;
    pub const IRQ_DISABLE: u8 = 0b0000_0100;
    pub const DECIMAL: u8 = 0b0000_1000;
    pub const BREAK: u8 = 0b0001_0000;
    pub const RESERVED: u8 = 0b0010_0000;
    pub const OVERFLOW: u8 = 0b0100_0000;
    pub const NEGATIVE: u8 = 0b1000_0000;
}

/// 6510 CPU state and execution context.
///
/// Generic over the memory implementation via the `MemoryBus` trait.
///
/// # Examples
///
/// ```
/// use mos6510::{Cpu, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00);
/// memory.write(0xFFFD, 0x80);
/// memory.write(0x8000, 0xA9); // LDA #$42
/// memory.write(0x8001, 0x42);
///
/// let mut cpu = Cpu::new(memory);
/// cpu.boot();
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.ticks(), 6);
///
/// let spent = cpu.cycle();
/// assert_eq!(spent, 2);
/// assert_eq!(cpu.a(), 0x42);
/// ```
pub struct Cpu<M: MemoryBus> {
    /// Accumulator register
    pub(crate) a: u8,

    /// X index register
    pub(crate) x: u8,

    /// Y index register
    pub(crate) y: u8,

    /// Program counter (address of next instruction)
    pub(crate) pc: u16,

    /// Stack pointer (0x0100 + sp gives full stack address)
    pub(crate) sp: u8,

    /// Negative flag (set if bit 7 of result is 1)
    pub(crate) flag_n: bool,

    /// Overflow flag (set on signed overflow)
    pub(crate) flag_v: bool,

    /// Decimal mode flag (enables BCD arithmetic)
    pub(crate) flag_d: bool,

    /// Interrupt disable flag
    pub(crate) flag_i: bool,

    /// Zero flag (set if result is zero)
    pub(crate) flag_z: bool,

    /// Carry flag (set on unsigned overflow/underflow)
    pub(crate) flag_c: bool,

    /// Total ticks spent since construction
    pub(crate) ticks: u64,

    /// An IRQ has been requested and not yet serviced
    irq_pending: bool,

    /// An NMI has been requested and not yet serviced
    nmi_pending: bool,

    /// Instruction decoder layering
    opcoder: Opcoder,

    /// Memory bus implementation
    pub(crate) memory: M,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a CPU attached to `memory`.
    ///
    /// Registers are zeroed, SP is 0xFF and PC is 0. Call [`Cpu::boot`] to
    /// load the program counter from the reset vector.
    pub fn new(memory: M) -> Self {
        Self {
            a: 0x00,
            x: 0x00,
            y: 0x00,
            pc: 0x0000,
            sp: 0xFF,
            flag_n: false,
            flag_v: false,
            flag_d: false,
            flag_i: false,
            flag_z: false,
            flag_c: false,
            ticks: 0,
            irq_pending: false,
            nmi_pending: false,
            opcoder: Opcoder::default(),
            memory,
        }
    }

    /// Creates a CPU that decodes with `opcoder`.
    pub fn with_opcoder(memory: M, opcoder: Opcoder) -> Self {
        let mut cpu = Self::new(memory);
        cpu.opcoder = opcoder;
        cpu
    }

    /// Cold start: clears every flag, loads PC from the reset vector and
    /// charges 6 ticks. A PHP right after boot pushes Reserved|Break.
    pub fn boot(&mut self) {
        self.set_status(0);
        self.pc = self.memory.read16(RESET_VECTOR, Wrap::Linear);
        self.tick(6);
    }

    /// Runs one unit of work and returns the ticks it consumed.
    ///
    /// A latched NMI is serviced first, then a latched IRQ. Without a pending
    /// request the next instruction is decoded and executed.
    pub fn cycle(&mut self) -> u32 {
        let start = self.ticks;

        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(NMI_VECTOR);
        } else if self.irq_pending {
            self.irq_pending = false;
            self.interrupt(IRQ_VECTOR);
        } else {
            let opcoder = self.opcoder;
            opcoder.process(self);
        }

        (self.ticks - start) as u32
    }

    /// Runs whole units of work until at least `tick_budget` ticks were spent.
    ///
    /// Returns the number of ticks actually consumed, which may exceed the
    /// budget by the tail of the last instruction.
    pub fn run_for_ticks(&mut self, tick_budget: u64) -> u64 {
        let start = self.ticks;
        let target = start + tick_budget;

        while self.ticks < target {
            self.cycle();
        }

        self.ticks - start
    }

    /// Latches an IRQ request, serviced at the start of the next cycle.
    ///
    /// The request is latched regardless of the I flag; interrupt sources are
    /// expected to consult [`Cpu::flag_i`] before raising it.
    pub fn trigger_irq(&mut self) {
        self.irq_pending = true;
    }

    /// Latches an NMI request.
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Returns true when an IRQ is latched.
    pub fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    /// Pushes PC and status, disables IRQs and jumps through `vector`.
    fn interrupt(&mut self, vector: u16) {
        self.stack_push16(self.pc);
        self.stack_push8(self.status() & !status::BREAK);
        self.flag_i = true;
        self.pc = self.memory.read16(vector, Wrap::Linear);
        self.tick(7);
    }

    /// Adds `ticks` to the tick counter.
    #[inline]
    pub fn tick(&mut self, ticks: u32) {
        self.ticks += ticks as u64;
    }

    /// Takes a relative branch from the current PC.
    ///
    /// `offset` is a two's-complement byte. One tick is charged when the
    /// target lies on a different page than the current PC.
    pub fn branch(&mut self, offset: u8) {
        let offset = offset as i8 as i16;
        if will_cross_page(self.pc, offset) {
            self.tick(1);
        }
        self.pc = self.pc.wrapping_add(offset as u16);
    }

    // ========== Stack ==========

    /// Pushes a byte onto the stack.
    pub fn stack_push8(&mut self, value: u8) {
        self.memory.write(STACK_PAGE | self.sp as u16, value);

        let (sp, wrapped) = self.sp.overflowing_sub(1);
        if wrapped {
            log::warn!("stack pointer wrapped below 0x00 at PC {:04X}", self.pc);
        }
        self.sp = sp;
    }

    /// Pushes a word, high byte first.
    pub fn stack_push16(&mut self, value: u16) {
        self.stack_push8((value >> 8) as u8);
        self.stack_push8((value & 0xFF) as u8);
    }

    /// Pops a byte from the stack.
    pub fn stack_pop8(&mut self) -> u8 {
        let (sp, wrapped) = self.sp.overflowing_add(1);
        if wrapped {
            log::warn!("stack pointer wrapped above 0xFF at PC {:04X}", self.pc);
        }
        self.sp = sp;

        self.memory.read(STACK_PAGE | self.sp as u16)
    }

    /// Pops a word, low byte first.
    pub fn stack_pop16(&mut self) -> u16 {
        let low = self.stack_pop8() as u16;
        let high = self.stack_pop8() as u16;
        (high << 8) | low
    }

    // ========== Flag helpers used by the instruction set ==========

    /// Updates Z and N from `value`.
    #[inline]
    pub(crate) fn set_nz(&mut self, value: u8) {
        self.flag_z = value == 0;
        self.flag_n = value & 0x80 != 0;
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    ///
    /// The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Returns the status register as a packed byte.
    ///
    /// Bit layout (NV-BDIZC), bit 5 always 1.
    ///
    /// ```
    /// use mos6510::{Cpu, FlatMemory};
    ///
    /// let mut cpu = Cpu::new(FlatMemory::new());
    /// cpu.set_status(0x00);
    /// assert_eq!(cpu.status(), 0x20);
    /// ```
    pub fn status(&self) -> u8 {
        let mut p = status::RESERVED;

        if self.flag_n {
            p |= status::NEGATIVE;
        }
        if self.flag_v {
            p |= status::OVERFLOW;
        }
        if self.flag_d {
            p |= status::DECIMAL;
        }
        if self.flag_i {
            p |= status::IRQ_DISABLE;
        }
        if self.flag_z {
            p |= status::ZERO;
        }
        if self.flag_c {
            p |= status::CARRY;
        }

        p
    }

    /// Returns the total number of ticks spent since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the decoder layering in use.
    pub fn opcoder(&self) -> Opcoder {
        self.opcoder
    }

    /// Borrows the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutably borrows the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.flag_n
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.flag_v
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.flag_d
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.flag_i
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.flag_z
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.flag_c
    }

    // ========== Setters ==========

    pub fn set_a(&mut self, value: u8) {
        self.a = value;
    }

    pub fn set_x(&mut self, value: u8) {
        self.x = value;
    }

    pub fn set_y(&mut self, value: u8) {
        self.y = value;
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    /// Unpacks a status byte into the individual flags. Bits 4 and 5 are
    /// ignored: Break only exists in pushed copies.
    pub fn set_status(&mut self, p: u8) {
        self.flag_n = p & status::NEGATIVE != 0;
        self.flag_v = p & status::OVERFLOW != 0;
        self.flag_d = p & status::DECIMAL != 0;
        self.flag_i = p & status::IRQ_DISABLE != 0;
        self.flag_z = p & status::ZERO != 0;
        self.flag_c = p & status::CARRY != 0;
    }

    pub fn set_flag_n(&mut self, value: bool) {
        self.flag_n = value;
    }

    pub fn set_flag_v(&mut self, value: bool) {
        self.flag_v = value;
    }

    pub fn set_flag_d(&mut self, value: bool) {
        self.flag_d = value;
    }

    pub fn set_flag_i(&mut self, value: bool) {
        self.flag_i = value;
    }

    pub fn set_flag_z(&mut self, value: bool) {
        self.flag_z = value;
    }

    pub fn set_flag_c(&mut self, value: bool) {
        self.flag_c = value;
    }

    /// Switches the decoder layering.
    pub fn set_opcoder(&mut self, opcoder: Opcoder) {
        self.opcoder = opcoder;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn booted_cpu() -> Cpu<FlatMemory> {
        let mut mem = FlatMemory::new();
        mem.write(0xFFFC, 0x00);
        mem.write(0xFFFD, 0x80);
        mem.write(0xFFFE, 0x00);
        mem.write(0xFFFF, 0x90);
        mem.write(0xFFFA, 0x00);
        mem.write(0xFFFB, 0xA0);
        let mut cpu = Cpu::new(mem);
        cpu.boot();
        cpu
    }

    #[test]
    fn test_boot_state() {
        let cpu = booted_cpu();

        assert_eq!(cpu.pc(), 0x8000);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.ticks(), 6);
        assert_eq!(cpu.status(), status::RESERVED);
    }

    #[test]
    fn test_reserved_bit_always_set() {
        let mut cpu = booted_cpu();
        for p in [0x00u8, 0xDF, 0xFF, 0x10] {
            cpu.set_status(p);
            assert_eq!(cpu.status() & status::RESERVED, status::RESERVED);
            assert_eq!(cpu.status(), (p | status::RESERVED) & !status::BREAK);
        }
    }

    #[test]
    fn test_stack_push_pop_order() {
        let mut cpu = booted_cpu();

        cpu.stack_push16(0x1234);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!(cpu.memory().read(0x01FF), 0x12);
        assert_eq!(cpu.memory().read(0x01FE), 0x34);

        assert_eq!(cpu.stack_pop16(), 0x1234);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn test_stack_pointer_wraps() {
        let mut cpu = booted_cpu();
        cpu.set_sp(0x00);

        cpu.stack_push8(0xAB);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(cpu.memory().read(0x0100), 0xAB);

        assert_eq!(cpu.stack_pop8(), 0xAB);
        assert_eq!(cpu.sp(), 0x00);
    }

    #[test]
    fn test_branch_page_cross_costs_tick() {
        let mut cpu = booted_cpu();

        cpu.set_pc(0x20FF);
        let before = cpu.ticks();
        cpu.branch(0x02);
        assert_eq!(cpu.pc(), 0x2101);
        assert_eq!(cpu.ticks() - before, 1);

        cpu.set_pc(0x2080);
        let before = cpu.ticks();
        cpu.branch(0x02);
        assert_eq!(cpu.pc(), 0x2082);
        assert_eq!(cpu.ticks() - before, 0);
    }

    #[test]
    fn test_branch_backwards() {
        let mut cpu = booted_cpu();
        cpu.set_pc(0x2005);
        cpu.branch(0xFB); // -5
        assert_eq!(cpu.pc(), 0x2000);
    }

    #[test]
    fn test_irq_service() {
        let mut cpu = booted_cpu();
        cpu.set_flag_c(true);
        cpu.trigger_irq();
        assert!(cpu.irq_pending());

        let spent = cpu.cycle();

        assert_eq!(spent, 7);
        assert!(!cpu.irq_pending());
        assert_eq!(cpu.pc(), 0x9000);
        assert!(cpu.flag_i());
        assert_eq!(cpu.sp(), 0xFC);
        // Return address then status with B cleared
        assert_eq!(cpu.memory().read(0x01FF), 0x80);
        assert_eq!(cpu.memory().read(0x01FE), 0x00);
        let pushed = cpu.memory().read(0x01FD);
        assert_eq!(pushed & status::BREAK, 0);
        assert_eq!(pushed & status::CARRY, status::CARRY);
        assert_eq!(pushed & status::RESERVED, status::RESERVED);
    }

    #[test]
    fn test_nmi_before_irq() {
        let mut cpu = booted_cpu();
        cpu.trigger_irq();
        cpu.trigger_nmi();

        cpu.cycle();
        assert_eq!(cpu.pc(), 0xA000);
        assert!(cpu.irq_pending());
    }

    #[test]
    fn test_run_for_ticks() {
        let mut cpu = booted_cpu();
        for addr in 0x8000..=0x8010 {
            cpu.memory_mut().write(addr, 0xEA);
        }

        let spent = cpu.run_for_ticks(10);
        assert_eq!(spent, 10);
        assert_eq!(cpu.pc(), 0x8005);
    }
}
