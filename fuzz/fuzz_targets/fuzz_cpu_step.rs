//! Fuzz target for instruction execution.
//!
//! Starts the CPU from an arbitrary register file with arbitrary code,
//! zero page and stack, then runs a handful of instructions with either
//! opcode layer, with interrupts optionally latched.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mos6510::{Cpu, FlatMemory, MemoryBus, Opcoder};

#[derive(Debug, Arbitrary)]
struct Registers {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    status: u8,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    registers: Registers,
    illegal: bool,
    irq: bool,
    nmi: bool,
    code: [u8; 16],
    zero_page: [u8; 256],
    stack_page: [u8; 256],
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();
    memory.load(0x0000, &input.zero_page);
    memory.load(0x0100, &input.stack_page);
    memory.load(0x8000, &input.code);
    memory.write(0xFFFA, 0x00);
    memory.write(0xFFFB, 0x80);
    memory.write(0xFFFE, 0x08);
    memory.write(0xFFFF, 0x80);

    let opcoder = if input.illegal {
        Opcoder::WithIllegal
    } else {
        Opcoder::Documented
    };
    let mut cpu = Cpu::with_opcoder(memory, opcoder);
    cpu.set_pc(0x8000);
    cpu.set_a(input.registers.a);
    cpu.set_x(input.registers.x);
    cpu.set_y(input.registers.y);
    cpu.set_sp(input.registers.sp);
    cpu.set_status(input.registers.status);

    if input.irq {
        cpu.trigger_irq();
    }
    if input.nmi {
        cpu.trigger_nmi();
    }

    let before = cpu.ticks();
    for _ in 0..(input.steps % 32) {
        cpu.cycle();
        // Bit 5 of the packed status reads back set
        assert_eq!(cpu.status() & 0x20, 0x20);
    }
    assert!(cpu.ticks() >= before);
});
