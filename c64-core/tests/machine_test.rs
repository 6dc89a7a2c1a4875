//! Integration tests: CPU, banked memory and chips driven through the
//! Machine.

use std::time::Duration;

use c64_core::devices::clock::ManualClock;
use c64_core::io::FrameCapture;
use c64_core::{Machine, MachineConfig, Memory, StepOutcome, WriteMode};

/// $0001 value mapping I/O at $D000 and RAM everywhere else.
const IO_ONLY: u8 = 0x35;

/// Main loop: CLI ; NOP ; JMP $1001
const MAIN_LOOP: [u8; 5] = [0x58, 0xEA, 0x4C, 0x01, 0x10];

/// Interrupt handler at $2000:
///   INX ; LDA #$FF ; STA $D019 ; LDA $DC0D ; LDA $DD0D ; RTI
const HANDLER: [u8; 13] = [
    0xE8, 0xA9, 0xFF, 0x8D, 0x19, 0xD0, 0xAD, 0x0D, 0xDC, 0xAD, 0x0D, 0xDD, 0x40,
];

fn poke(machine: &mut Machine<FrameCapture>, address: u16, bytes: &[u8]) {
    let memory = machine.memory_mut();
    for (i, &byte) in bytes.iter().enumerate() {
        memory.write8(address + i as u16, byte, WriteMode::Banked);
    }
}

/// A machine without ROMs, I/O banked in, the IRQ and NMI vectors pointing
/// at the handler and `main` at $1000.
fn machine(main: &[u8]) -> (Machine<FrameCapture>, ManualClock) {
    let _ = env_logger::builder().is_test(true).try_init();

    let clock = ManualClock::new();
    let config = MachineConfig::default();
    let memory = Memory::new(clock.clone(), &config);
    let mut machine = Machine::with_memory(config, memory, FrameCapture::new());

    poke(&mut machine, 0x0001, &[IO_ONLY]);
    poke(&mut machine, 0xFFFA, &[0x00, 0x20]);
    poke(&mut machine, 0xFFFE, &[0x00, 0x20]);
    poke(&mut machine, 0x2000, &HANDLER);
    poke(&mut machine, 0x1000, main);

    let cpu = machine.cpu_mut();
    cpu.set_pc(0x1000);
    cpu.set_sp(0xFF);
    cpu.set_flag_i(true);

    (machine, clock)
}

/// Programs timer A of the CIA at `base` for a continuous 10-tick period.
fn start_timer(machine: &mut Machine<FrameCapture>, base: u16) {
    poke(machine, base + 0x04, &[10, 0]);
    poke(machine, base + 0x0D, &[0x81]);
    poke(machine, base + 0x0E, &[0x11]);
}

#[test]
fn test_cia1_timer_raises_irq() {
    let (mut machine, clock) = machine(&MAIN_LOOP);
    start_timer(&mut machine, 0xDC00);

    // The first throttle opening only records the tick baseline
    for _ in 0..6 {
        machine.cycle();
    }
    assert_eq!(machine.cpu().x(), 0);

    clock.advance(Duration::from_millis(20));
    let cycles = machine.run_until(|m| m.cpu().pc() == 0x2000, 20);
    assert!(cycles.is_some(), "IRQ not taken");
    assert!(machine.cpu().flag_i());

    machine.run_until(|m| m.cpu().x() == 1, 20);
    let back = machine.run_until(|m| (0x1001..=0x1004).contains(&m.cpu().pc()), 20);
    assert!(back.is_some());
    assert!(!machine.cpu().flag_i());
}

#[test]
fn test_cia1_irq_is_masked_by_i_flag() {
    // SEI ; NOP ; JMP $1001
    let (mut machine, clock) = machine(&[0x78, 0xEA, 0x4C, 0x01, 0x10]);
    start_timer(&mut machine, 0xDC00);

    for _ in 0..6 {
        machine.cycle();
    }
    clock.advance(Duration::from_millis(20));
    for _ in 0..50 {
        machine.cycle();
    }

    assert_eq!(machine.cpu().x(), 0);
    assert_eq!(machine.memory().cia1().interrupt_status() & 0x01, 0x01);
}

#[test]
fn test_cia2_timer_raises_nmi_even_when_masked() {
    // SEI ; NOP ; JMP $1001
    let (mut machine, clock) = machine(&[0x78, 0xEA, 0x4C, 0x01, 0x10]);
    start_timer(&mut machine, 0xDD00);

    for _ in 0..6 {
        machine.cycle();
    }
    clock.advance(Duration::from_millis(20));

    let cycles = machine.run_until(|m| m.cpu().pc() == 0x2000, 20);
    assert!(cycles.is_some(), "NMI not taken");
}

#[test]
fn test_raster_irq() {
    let (mut machine, _clock) = machine(&MAIN_LOOP);
    // Raster compare at line 100, raster interrupt enabled
    poke(&mut machine, 0xD012, &[100]);
    poke(&mut machine, 0xD01A, &[0x01]);

    let cycles = machine.run_until(|m| m.cpu().x() == 1, 10_000);
    assert!(cycles.is_some(), "raster IRQ not taken");
    assert!(machine.memory().vic().raster_line() >= 100);

    // Handler acknowledged the interrupt
    machine.run_until(|m| (0x1001..=0x1004).contains(&m.cpu().pc()), 20);
    assert_eq!(machine.memory().vic().interrupt_status() & 0x80, 0);
}

#[test]
fn test_frames_reach_the_sink() {
    let (mut machine, _clock) = machine(&MAIN_LOOP);
    poke(&mut machine, 0xD020, &[0x02]);

    machine.run_until(|m| m.io().frames >= 2, 20_000);
    assert!(machine.io().frames >= 2);
    assert_eq!(machine.io().pixel(52, 15), Some(0x02));
}

#[test]
fn test_deadlock_detected() {
    // LDX #$05 ; DEX ; BNE -3 ; JMP $1005
    let (mut machine, _clock) = machine(&[0xA2, 0x05, 0xCA, 0xD0, 0xFD, 0x4C, 0x05, 0x10]);

    let mut outcome = StepOutcome::Running;
    for _ in 0..20 {
        outcome = machine.cycle();
        if outcome != StepOutcome::Running {
            break;
        }
    }

    assert_eq!(outcome, StepOutcome::Deadlock(0x1005));
    assert_eq!(machine.cpu().x(), 0);
}

#[test]
fn test_vic_bank_follows_cia2() {
    let (mut machine, _clock) = machine(&MAIN_LOOP);
    poke(&mut machine, 0xDD00, &[0x00]);
    assert_eq!(machine.memory().cia2().vic_bank(), 3);
    poke(&mut machine, 0xDD00, &[0x03]);
    assert_eq!(machine.memory().cia2().vic_bank(), 0);
}
