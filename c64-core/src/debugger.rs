//! Single-key debugger.
//!
//! The debugger drives a [`Machine`] in units of commands:
//!
//! | key     | command                                             |
//! |---------|-----------------------------------------------------|
//! | `s`     | step over: run a `JSR` until its `RTS` has executed |
//! | `r`     | run until a breakpoint or a deadlock                |
//! | `o`     | run until the current subroutine has returned       |
//! | enter   | single step                                         |
//!
//! Subroutine tracking matches on the stack pointer: the `RTS` belonging to
//! a call is the one executed with the stack at the depth the call left it.

use std::collections::BTreeSet;
use std::fmt::Write;

use mos6510::disassembler::decode;
use mos6510::{MemoryBus, Opcoder};

use crate::io::Io;
use crate::system::{Machine, Memory, StepOutcome};

const OPCODE_JSR: u8 = 0x20;
const OPCODE_RTS: u8 = 0x60;

/// Read-only view of [`Memory`] that leaves I/O latches untouched.
struct Inspect<'a>(&'a Memory);

impl MemoryBus for Inspect<'_> {
    fn read(&self, addr: u16) -> u8 {
        self.0.peek8(addr)
    }

    fn write(&mut self, _addr: u16, _value: u8) {}
}

/// A debugger command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Step,
    StepOver,
    Run,
    StepOut,
}

impl Command {
    /// Maps a key press to a command.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            's' | 'S' => Some(Command::StepOver),
            'r' | 'R' => Some(Command::Run),
            'o' | 'O' => Some(Command::StepOut),
            '\n' | '\r' => Some(Command::Step),
            _ => None,
        }
    }
}

/// Why a command stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A single step completed.
    Stepped,
    /// PC reached a breakpoint.
    Breakpoint(u16),
    /// The tracked subroutine returned.
    Returned,
    /// The CPU is stuck on an instruction jumping to itself.
    Deadlock(u16),
    /// The cycle budget ran out.
    Limit,
}

/// Breakpoints plus command execution.
#[derive(Debug, Default, Clone)]
pub struct Debugger {
    breakpoints: BTreeSet<u16>,
}

impl Debugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a debugger with the given breakpoints.
    pub fn with_breakpoints<I: IntoIterator<Item = u16>>(breakpoints: I) -> Self {
        Self {
            breakpoints: breakpoints.into_iter().collect(),
        }
    }

    pub fn add_breakpoint(&mut self, address: u16) {
        self.breakpoints.insert(address);
    }

    pub fn remove_breakpoint(&mut self, address: u16) -> bool {
        self.breakpoints.remove(&address)
    }

    pub fn is_breakpoint(&self, address: u16) -> bool {
        self.breakpoints.contains(&address)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u16> + '_ {
        self.breakpoints.iter().copied()
    }

    /// Executes `command`, cycling at most `max_cycles` times.
    pub fn execute<S: Io>(
        &self,
        machine: &mut Machine<S>,
        command: Command,
        max_cycles: u64,
    ) -> StopReason {
        let cpu = machine.cpu();
        let opcode = machine.memory().peek8(cpu.pc());
        let sp = cpu.sp();

        match command {
            Command::Step => Self::step(machine),
            Command::StepOver if opcode == OPCODE_JSR => {
                // The matching RTS runs with the return address on top
                self.run_to_return(machine, sp.wrapping_sub(2), max_cycles)
            }
            Command::StepOver => Self::step(machine),
            Command::StepOut => self.run_to_return(machine, sp, max_cycles),
            Command::Run => self.run(machine, max_cycles, |_| false),
        }
    }

    fn step<S: Io>(machine: &mut Machine<S>) -> StopReason {
        match machine.cycle() {
            StepOutcome::Deadlock(pc) => StopReason::Deadlock(pc),
            StepOutcome::Running => StopReason::Stepped,
        }
    }

    /// Runs until an `RTS` executes with the stack pointer at `depth`.
    fn run_to_return<S: Io>(
        &self,
        machine: &mut Machine<S>,
        depth: u8,
        max_cycles: u64,
    ) -> StopReason {
        self.run(machine, max_cycles, |machine| {
            let cpu = machine.cpu();
            machine.memory().peek8(cpu.pc()) == OPCODE_RTS && cpu.sp() == depth
        })
    }

    /// Cycles until a breakpoint, a deadlock, or an instruction for which
    /// `is_last` holds has run.
    fn run<S: Io, F>(&self, machine: &mut Machine<S>, max_cycles: u64, is_last: F) -> StopReason
    where
        F: Fn(&Machine<S>) -> bool,
    {
        for _ in 0..max_cycles {
            let last = is_last(machine);

            if let StepOutcome::Deadlock(pc) = machine.cycle() {
                return StopReason::Deadlock(pc);
            }
            if last {
                return StopReason::Returned;
            }

            let pc = machine.cpu().pc();
            if self.is_breakpoint(pc) {
                return StopReason::Breakpoint(pc);
            }
        }
        StopReason::Limit
    }
}

/// Registers, flags and the instruction at PC, as two lines of text.
///
/// ```text
/// PC:C000 A:42 X:00 Y:00 SP:FD NV-BDIZC:00100100 T:12
/// C000  8D 20 D0  STA $D020
/// ```
pub fn snapshot<S: Io>(machine: &Machine<S>) -> String {
    let cpu = machine.cpu();
    let include_illegal = cpu.opcoder() == Opcoder::WithIllegal;
    let instruction = decode(&Inspect(machine.memory()), cpu.pc(), include_illegal);

    let mut bytes = format!("{:02X}", instruction.opcode);
    for byte in &instruction.operand_bytes {
        let _ = write!(bytes, " {:02X}", byte);
    }

    format!(
        "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} NV-BDIZC:{:08b} T:{}\n{:04X}  {:<8}  {}",
        cpu.pc(),
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.sp(),
        cpu.status(),
        cpu.ticks(),
        instruction.address,
        bytes,
        instruction
    )
}

/// Hex dump of `rows` lines of 16 bytes from `start`, read through the bank
/// table without disturbing I/O registers.
pub fn memory_dump(memory: &Memory, start: u16, rows: usize) -> String {
    let mut out = String::new();
    for row in 0..rows {
        let base = start.wrapping_add((row * 16) as u16);
        let _ = write!(out, "{:04X}:", base);
        for i in 0..16u16 {
            let _ = write!(out, " {:02X}", memory.peek8(base.wrapping_add(i)));
        }
        out.push('\n');
    }
    out
}
