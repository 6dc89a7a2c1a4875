//! Klaus Dormann's 6502 Functional Test
//!
//! This module integrates the comprehensive functional test suite from
//! https://github.com/Klaus2m5/6502_65C02_functional_tests
//!
//! The test validates all valid opcodes and addressing modes of the NMOS 6502 CPU.
//!
//! ## How the Test Works
//!
//! 1. Load the 64KB binary image into memory (includes code and data)
//! 2. Set PC to entry point ($0400)
//! 3. Execute instructions until PC stops changing (`JMP *` or a branch to itself)
//! 4. Check if the final PC matches the success address ($3469)
//!
//! The binary is not shipped with the crate. Drop it at
//! `tests/fixtures/6502_functional_test.bin` and run with `--ignored`.

use mos6510::{Cpu, FlatMemory};
use std::path::Path;

/// Success address - where PC ends up when all tests pass
const SUCCESS_ADDRESS: u16 = 0x3469;

/// Entry point for the functional test
const ENTRY_POINT: u16 = 0x0400;

/// Maximum ticks to run before timing out
const MAX_TICKS: u64 = 100_000_000;

const FIXTURE: &str = "tests/fixtures/6502_functional_test.bin";

/// Runs until the PC stops changing and returns the trap address.
fn run_until_trap(cpu: &mut Cpu<FlatMemory>) -> Result<u16, String> {
    loop {
        let pc = cpu.pc();
        if cpu.ticks() >= MAX_TICKS {
            return Err(format!("Timeout: exceeded {} ticks at ${:04X}", MAX_TICKS, pc));
        }

        cpu.cycle();

        if cpu.pc() == pc {
            return Ok(pc);
        }
    }
}

/// Format CPU state for diagnostic output
fn format_cpu_state(cpu: &Cpu<FlatMemory>) -> String {
    format!(
        "PC:${:04X} A:${:02X} X:${:02X} Y:${:02X} SP:${:02X} P:${:02X} Ticks:{}",
        cpu.pc(),
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.sp(),
        cpu.status(),
        cpu.ticks()
    )
}

#[test]
#[ignore = "needs tests/fixtures/6502_functional_test.bin - run with --ignored"]
fn klaus_6502_functional_test() {
    if !Path::new(FIXTURE).exists() {
        eprintln!("skipping: {} not found", FIXTURE);
        return;
    }

    let image = std::fs::read(FIXTURE).expect("read functional test binary");
    assert_eq!(image.len(), 65536, "Test binary must be exactly 64KB");

    let mut memory = FlatMemory::new();
    memory.load(0x0000, &image);

    let mut cpu = Cpu::new(memory);
    cpu.set_pc(ENTRY_POINT);

    let final_pc = match run_until_trap(&mut cpu) {
        Ok(pc) => pc,
        Err(e) => panic!("{} ({})", e, format_cpu_state(&cpu)),
    };

    assert_eq!(
        final_pc,
        SUCCESS_ADDRESS,
        "trapped at ${:04X}, see the listing for the failing case ({})",
        final_pc,
        format_cpu_state(&cpu)
    );
}
