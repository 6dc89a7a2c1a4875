//! Tests for interrupt entry and return.
//!
//! Tests cover:
//! - IRQ and NMI vectors, stacked PC and status
//! - NMI priority when both requests are latched
//! - The I flag is left to the interrupt source
//! - RTI restoring flags and PC
//! - `run_for_ticks` budgets across interrupt entries

use mos6510::{Cpu, FlatMemory, MemoryBus};

/// CPU at 0x8000 with NOPs, IRQ handler at 0x9000, NMI handler at 0xA000.
fn setup_cpu() -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.write(0xFFFE, 0x00);
    memory.write(0xFFFF, 0x90);
    memory.write(0xFFFA, 0x00);
    memory.write(0xFFFB, 0xA0);
    memory.load(0x8000, &[0xEA; 16]);
    // Handlers: INX ; RTI and INY ; RTI
    memory.load(0x9000, &[0xE8, 0x40]);
    memory.load(0xA000, &[0xC8, 0x40]);

    let mut cpu = Cpu::new(memory);
    cpu.boot();
    cpu
}

// ========== Entry ==========

#[test]
fn test_irq_entry_pushes_pc_and_status() {
    let mut cpu = setup_cpu();
    cpu.cycle();
    cpu.set_flag_c(true);
    let sp = cpu.sp();

    cpu.trigger_irq();
    let ticks = cpu.cycle();

    assert_eq!(ticks, 7);
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.flag_i());
    assert!(!cpu.irq_pending());
    assert_eq!(cpu.sp(), sp.wrapping_sub(3));

    let stacked_status = cpu.memory().read(0x0100 + sp.wrapping_sub(2) as u16);
    let stacked_pc = u16::from_le_bytes([
        cpu.memory().read(0x0100 + sp.wrapping_sub(1) as u16),
        cpu.memory().read(0x0100 + sp as u16),
    ]);
    assert_eq!(stacked_pc, 0x8001);
    // Break clear, reserved and carry set
    assert_eq!(stacked_status & 0x31, 0x21);
}

#[test]
fn test_nmi_uses_its_own_vector() {
    let mut cpu = setup_cpu();
    cpu.trigger_nmi();
    cpu.cycle();
    assert_eq!(cpu.pc(), 0xA000);
}

#[test]
fn test_nmi_served_before_irq() {
    let mut cpu = setup_cpu();
    cpu.trigger_irq();
    cpu.trigger_nmi();

    cpu.cycle();
    assert_eq!(cpu.pc(), 0xA000);
    assert!(cpu.irq_pending());

    // The latched IRQ is taken next, even inside the NMI handler
    cpu.cycle();
    assert_eq!(cpu.pc(), 0x9000);
}

#[test]
fn test_irq_latch_ignores_i_flag() {
    let mut cpu = setup_cpu();
    cpu.set_flag_i(true);

    cpu.trigger_irq();
    cpu.cycle();
    assert_eq!(cpu.pc(), 0x9000);
}

// ========== Return ==========

#[test]
fn test_rti_restores_state() {
    let mut cpu = setup_cpu();
    cpu.set_flag_i(false);
    cpu.set_flag_c(true);
    let sp = cpu.sp();

    cpu.trigger_irq();
    cpu.cycle();
    cpu.set_flag_c(false);
    cpu.cycle(); // INX
    cpu.cycle(); // RTI

    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!(cpu.sp(), sp);
    assert_eq!(cpu.x(), 1);
    assert!(cpu.flag_c());
    assert!(!cpu.flag_i());
}

#[test]
fn test_nested_nmi_inside_irq() {
    let mut cpu = setup_cpu();
    cpu.trigger_irq();
    cpu.cycle();
    cpu.trigger_nmi();
    cpu.cycle();
    assert_eq!(cpu.pc(), 0xA000);

    // INY ; RTI back into the IRQ handler, INX ; RTI back to the main line
    for _ in 0..4 {
        cpu.cycle();
    }
    assert_eq!(cpu.pc(), 0x8000);
    assert_eq!((cpu.x(), cpu.y()), (1, 1));
}

// ========== Budgets ==========

#[test]
fn test_run_for_ticks_includes_interrupt_entry() {
    let mut cpu = setup_cpu();
    cpu.trigger_irq();

    // Entry (7) + INX (2) + RTI (6) + NOP (2)
    let spent = cpu.run_for_ticks(17);
    assert_eq!(spent, 17);
    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn test_run_for_ticks_overshoots_by_last_instruction() {
    let mut cpu = setup_cpu();
    cpu.trigger_irq();
    let spent = cpu.run_for_ticks(1);
    assert_eq!(spent, 7);
}
