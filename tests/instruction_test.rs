//! Instruction-level tests driven through `Cpu::cycle`.
//!
//! Tests cover:
//! - Arithmetic in binary and decimal mode
//! - Tick costs including page crossing and taken branches
//! - Subroutine, interrupt and stack round trips
//! - The JMP indirect page-wrap quirk

use mos6510::{Cpu, FlatMemory, MemoryBus};

/// Helper function to create a CPU with `program` loaded at 0x8000 and PC there
fn setup_cpu(program: &[u8]) -> Cpu<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    memory.load(0x8000, program);
    let mut cpu = Cpu::new(memory);
    cpu.boot();
    cpu
}

// ========== Arithmetic ==========

#[test]
fn test_adc_decimal_five_plus_five() {
    // SED ; CLC ; LDA #$05 ; ADC #$05
    let mut cpu = setup_cpu(&[0xF8, 0x18, 0xA9, 0x05, 0x69, 0x05]);

    for _ in 0..4 {
        cpu.cycle();
    }

    assert_eq!(cpu.a(), 0x10);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_z());
}

#[test]
fn test_adc_binary_signed_overflow() {
    // CLC ; LDA #$50 ; ADC #$50
    let mut cpu = setup_cpu(&[0x18, 0xA9, 0x50, 0x69, 0x50]);

    for _ in 0..3 {
        cpu.cycle();
    }

    assert_eq!(cpu.a(), 0xA0);
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert!(!cpu.flag_c());
}

#[test]
fn test_sbc_decimal_borrow() {
    // SED ; SEC ; LDA #$10 ; SBC #$01
    let mut cpu = setup_cpu(&[0xF8, 0x38, 0xA9, 0x10, 0xE9, 0x01]);

    for _ in 0..4 {
        cpu.cycle();
    }

    assert_eq!(cpu.a(), 0x09);
    assert!(cpu.flag_c());
}

#[test]
fn test_cmp_sets_carry_and_zero() {
    // LDA #$40 ; CMP #$40
    let mut cpu = setup_cpu(&[0xA9, 0x40, 0xC9, 0x40]);
    cpu.cycle();
    cpu.cycle();

    assert!(cpu.flag_c());
    assert!(cpu.flag_z());
    assert!(!cpu.flag_n());
}

#[test]
fn test_bit_copies_operand_bits() {
    // LDA #$01 ; BIT $10
    let mut cpu = setup_cpu(&[0xA9, 0x01, 0x24, 0x10]);
    cpu.memory_mut().write(0x0010, 0xC0);
    cpu.cycle();
    cpu.cycle();

    assert!(cpu.flag_z());
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert_eq!(cpu.a(), 0x01);
}

#[test]
fn test_ror_memory() {
    // SEC ; ROR $10
    let mut cpu = setup_cpu(&[0x38, 0x66, 0x10]);
    cpu.memory_mut().write(0x0010, 0x02);
    cpu.cycle();
    let spent = cpu.cycle();

    assert_eq!(spent, 5);
    assert_eq!(cpu.memory().read(0x0010), 0x81);
    assert!(!cpu.flag_c());
    assert!(cpu.flag_n());
}

// ========== Tick accounting ==========

#[test]
fn test_lda_absolute_x_page_cross_costs_tick() {
    // LDX #$01 ; LDA $10FF,X ; LDA $1000,X
    let mut cpu = setup_cpu(&[0xA2, 0x01, 0xBD, 0xFF, 0x10, 0xBD, 0x00, 0x10]);
    cpu.cycle();

    assert_eq!(cpu.cycle(), 5);
    assert_eq!(cpu.cycle(), 4);
}

#[test]
fn test_sta_absolute_x_has_fixed_cost() {
    // LDX #$01 ; STA $10FF,X
    let mut cpu = setup_cpu(&[0xA2, 0x01, 0x9D, 0xFF, 0x10]);
    cpu.cycle();

    assert_eq!(cpu.cycle(), 5);
}

#[test]
fn test_branch_costs() {
    // BNE +2 with Z clear (taken, same page) then BEQ not taken
    let mut cpu = setup_cpu(&[0xD0, 0x02, 0xEA, 0xEA, 0xF0, 0x10]);
    cpu.set_flag_z(false);

    assert_eq!(cpu.cycle(), 3);
    assert_eq!(cpu.pc(), 0x8004);
    assert_eq!(cpu.cycle(), 2);
    assert_eq!(cpu.pc(), 0x8006);
}

#[test]
fn test_branch_taken_across_page() {
    let mut cpu = setup_cpu(&[]);
    // BNE +2 at $20FD: the offset is applied from $20FF
    cpu.memory_mut().write(0x20FD, 0xD0);
    cpu.memory_mut().write(0x20FE, 0x02);
    cpu.set_pc(0x20FD);
    cpu.set_flag_z(false);

    assert_eq!(cpu.cycle(), 4);
    assert_eq!(cpu.pc(), 0x2101);
}

// ========== Control flow ==========

#[test]
fn test_jmp_indirect_page_wrap() {
    // JMP ($30FF)
    let mut cpu = setup_cpu(&[0x6C, 0xFF, 0x30]);
    cpu.memory_mut().write(0x30FF, 0x00);
    cpu.memory_mut().write(0x3000, 0x40);
    cpu.memory_mut().write(0x3100, 0x50);

    assert_eq!(cpu.cycle(), 5);
    assert_eq!(cpu.pc(), 0x4000);
}

#[test]
fn test_jsr_rts_round_trip() {
    // JSR $9000 ; at $9000: RTS
    let mut cpu = setup_cpu(&[0x20, 0x00, 0x90, 0xEA]);
    cpu.memory_mut().write(0x9000, 0x60);

    assert_eq!(cpu.cycle(), 6);
    assert_eq!(cpu.pc(), 0x9000);
    assert_eq!(cpu.sp(), 0xFD);
    // Return address points at the last byte of the JSR
    assert_eq!(cpu.memory().read(0x01FF), 0x80);
    assert_eq!(cpu.memory().read(0x01FE), 0x02);

    assert_eq!(cpu.cycle(), 6);
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.sp(), 0xFF);
}

#[test]
fn test_brk_rti_round_trip() {
    // BRK ; padding ; NOP
    let mut cpu = setup_cpu(&[0x00, 0xFF, 0xEA]);
    cpu.memory_mut().write(0xFFFE, 0x00);
    cpu.memory_mut().write(0xFFFF, 0x90);
    cpu.memory_mut().write(0x9000, 0x40); // RTI
    cpu.set_flag_c(true);

    assert_eq!(cpu.cycle(), 7);
    assert_eq!(cpu.pc(), 0x9000);
    assert!(cpu.flag_i());
    let pushed = cpu.memory().read(0x01FD);
    assert_eq!(pushed & 0x10, 0x10);
    assert_eq!(pushed & 0x01, 0x01);

    assert_eq!(cpu.cycle(), 6);
    assert_eq!(cpu.pc(), 0x8002);
    assert!(cpu.flag_c());
    assert_eq!(cpu.sp(), 0xFF);
    // Break only lives in the pushed copy
    assert_eq!(cpu.status() & 0x10, 0x00);
}

#[test]
fn test_break_bit_depends_on_pusher_only() {
    // BRK ; padding ; PHP, with the handler at $9000: PHP ; RTI
    let mut cpu = setup_cpu(&[0x00, 0xFF, 0x08]);
    cpu.memory_mut().write(0xFFFE, 0x00);
    cpu.memory_mut().write(0xFFFF, 0x90);
    cpu.memory_mut().load(0x9000, &[0x08, 0x40]);

    // BRK pushes B set
    cpu.cycle();
    assert_eq!(cpu.memory().read(0x01FD) & 0x10, 0x10);
    // An IRQ taken inside the handler pushes B clear, even after BRK
    cpu.trigger_irq();
    cpu.cycle();
    assert_eq!(cpu.memory().read(0x01FA) & 0x10, 0x00);
    // PHP pushes B set, even after an IRQ entry
    cpu.cycle();
    assert_eq!(cpu.memory().read(0x01F9) & 0x10, 0x10);
    assert_eq!(cpu.status() & 0x10, 0x00);
}

#[test]
fn test_php_pushes_break_bit() {
    // PHP ; PLA
    let mut cpu = setup_cpu(&[0x08, 0x68]);
    cpu.set_status(0x00);
    cpu.cycle();
    cpu.cycle();

    assert_eq!(cpu.a(), 0x30);
}

#[test]
fn test_txs_leaves_flags() {
    // LDX #$00 ; TXS
    let mut cpu = setup_cpu(&[0xA2, 0x00, 0x9A]);
    cpu.cycle();
    cpu.set_flag_z(false);
    cpu.cycle();

    assert_eq!(cpu.sp(), 0x00);
    assert!(!cpu.flag_z());
}

#[test]
fn test_irq_then_rti_resumes() {
    // CLI ; NOP ; NOP
    let mut cpu = setup_cpu(&[0x58, 0xEA, 0xEA]);
    cpu.memory_mut().write(0xFFFE, 0x00);
    cpu.memory_mut().write(0xFFFF, 0x90);
    cpu.memory_mut().write(0x9000, 0x40);

    cpu.cycle();
    cpu.trigger_irq();
    assert_eq!(cpu.cycle(), 7);
    assert_eq!(cpu.pc(), 0x9000);

    cpu.cycle();
    assert_eq!(cpu.pc(), 0x8001);
    assert!(!cpu.flag_i());
}

#[test]
fn test_zero_page_indexed_wraps() {
    // LDX #$FF ; LDA $80,X
    let mut cpu = setup_cpu(&[0xA2, 0xFF, 0xB5, 0x80]);
    cpu.memory_mut().write(0x007F, 0x5A);
    cpu.cycle();
    cpu.cycle();

    assert_eq!(cpu.a(), 0x5A);
}
