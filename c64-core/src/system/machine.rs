//! The complete C64: CPU, memory and chips driven one instruction at a time.

use std::path::Path;

use mos6510::{Cpu, Opcoder};

use super::memory::{Memory, WriteMode, PORT_DATA};
use crate::config::MachineConfig;
use crate::devices::clock::SystemClock;
use crate::error::{LoadError, MachineError};
use crate::io::Io;

/// PC of the BASIC main loop, reached once the READY prompt is up.
pub const BASIC_READY: u16 = 0xA65C;

/// Entry point of the 6502 functional test image.
pub const FUNCTIONAL_TEST_START: u16 = 0x0400;

/// Where the functional test image keeps the number of the running test.
pub const FUNCTIONAL_TEST_NUMBER: u16 = 0x0200;

/// Self-jumps above this address mark the end of the functional test.
const FUNCTIONAL_TEST_PASS_FLOOR: u16 = 0x3000;

const OPCODE_JMP_ABSOLUTE: u8 = 0x4C;

/// Result of a single machine cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    /// The instruction at this address jumped or branched to itself.
    Deadlock(u16),
}

/// How a functional test run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestVerdict {
    /// Trapped on the final success loop.
    Passed { pc: u16 },
    /// Trapped anywhere else, while running test number `test`.
    Failed { pc: u16, test: u8 },
}

/// A Commodore 64.
pub struct Machine<S: Io> {
    cpu: Cpu<Memory>,
    io: S,
    config: MachineConfig,
}

impl<S: Io> Machine<S> {
    /// Builds a machine and loads its ROMs.
    pub fn new(config: MachineConfig, io: S) -> Result<Self, LoadError> {
        let memory = Memory::new(SystemClock::new(), &config).with_roms(&config)?;
        Ok(Self::with_memory(config, memory, io))
    }

    /// Builds a machine with empty ROMs.
    pub fn without_roms(config: MachineConfig, io: S) -> Self {
        let memory = Memory::new(SystemClock::new(), &config);
        Self::with_memory(config, memory, io)
    }

    /// Builds a machine around a prepared memory system.
    pub fn with_memory(config: MachineConfig, memory: Memory, io: S) -> Self {
        let opcoder = if config.illegal_opcodes {
            Opcoder::WithIllegal
        } else {
            Opcoder::Documented
        };

        Self {
            cpu: Cpu::with_opcoder(memory, opcoder),
            io,
            config,
        }
    }

    /// Resets the CPU, optionally running until BASIC is ready.
    pub fn boot(&mut self, wait_for_basic: bool) -> Result<(), MachineError> {
        self.cpu.boot();

        if !wait_for_basic {
            return Ok(());
        }

        let limit = self.config.boot_cycle_limit;
        match self.run_until(|machine| machine.cpu.pc() == BASIC_READY, limit) {
            Some(cycles) => {
                log::info!("BASIC ready after {} cycles", cycles);
                Ok(())
            }
            None => Err(MachineError::BootTimeout { cycles: limit }),
        }
    }

    /// Runs one instruction (or interrupt entry) and advances the chips.
    pub fn cycle(&mut self) -> StepOutcome {
        let pc = self.cpu.pc();
        self.cpu.cycle();
        let moved = self.cpu.pc() != pc;

        let ticks = self.cpu.ticks();
        let irq_disabled = self.cpu.flag_i();
        let memory = self.cpu.memory_mut();

        let (irq, nmi) = memory.cycle_cias(ticks, irq_disabled);
        let video_irq = memory.cycle_video(&mut self.io);

        if irq || (video_irq && !irq_disabled) {
            self.cpu.trigger_irq();
        }
        if nmi {
            self.cpu.trigger_nmi();
        }

        self.poll_input();

        if moved {
            StepOutcome::Running
        } else {
            StepOutcome::Deadlock(pc)
        }
    }

    /// Latches host keyboard and joystick state into CIA1.
    fn poll_input(&mut self) {
        let keyboard = self.io.read_keyboard();
        let joy1 = self.io.read_joystick(1);
        let joy2 = self.io.read_joystick(2);

        let cia1 = self.cpu.memory_mut().cia1_mut();
        cia1.set_keyboard(keyboard);
        cia1.set_joystick(1, joy1);
        cia1.set_joystick(2, joy2);
    }

    /// Cycles until `predicate` holds, checking it before every cycle.
    ///
    /// Returns the number of cycles run, or `None` if `max_cycles` ran out.
    pub fn run_until<F>(&mut self, mut predicate: F, max_cycles: u64) -> Option<u64>
    where
        F: FnMut(&Self) -> bool,
    {
        for cycles in 0..=max_cycles {
            if predicate(self) {
                return Some(cycles);
            }
            if cycles < max_cycles {
                self.cycle();
            }
        }
        None
    }

    /// Loads a PRG file, optionally typing RUN. Returns its load address.
    pub fn load_program(&mut self, path: &Path, auto_run: bool) -> Result<u16, LoadError> {
        let memory = self.cpu.memory_mut();
        let address = memory.load_program(path)?;
        if auto_run {
            memory.inject_run();
        }
        Ok(address)
    }

    /// Loads a functional test image over all of RAM, banks everything to
    /// RAM and points the CPU at the test entry.
    pub fn load_functional_test(&mut self, path: &Path) -> Result<(), LoadError> {
        let length = std::fs::metadata(path)
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len()
            .min(0x10000) as usize;

        let memory = self.cpu.memory_mut();
        memory.load_ram(path, 0, length, 0x0000)?;
        memory.write8(PORT_DATA, 0x00, WriteMode::Banked);
        self.cpu.set_pc(FUNCTIONAL_TEST_START);
        Ok(())
    }

    /// Judges a functional test deadlock at `pc`.
    pub fn functional_verdict(&self, pc: u16) -> TestVerdict {
        let memory = self.cpu.memory();
        if memory.read8(pc) == OPCODE_JMP_ABSOLUTE && pc > FUNCTIONAL_TEST_PASS_FLOOR {
            TestVerdict::Passed { pc }
        } else {
            TestVerdict::Failed {
                pc,
                test: memory.read8(FUNCTIONAL_TEST_NUMBER),
            }
        }
    }

    /// Cycles until a deadlock and judges it, or gives up after `max_cycles`.
    pub fn run_functional_test(&mut self, max_cycles: u64) -> Option<TestVerdict> {
        for _ in 0..max_cycles {
            if let StepOutcome::Deadlock(pc) = self.cycle() {
                return Some(self.functional_verdict(pc));
            }
        }
        None
    }

    pub fn cpu(&self) -> &Cpu<Memory> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu<Memory> {
        &mut self.cpu
    }

    pub fn memory(&self) -> &Memory {
        self.cpu.memory()
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        self.cpu.memory_mut()
    }

    pub fn io(&self) -> &S {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut S {
        &mut self.io
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::NullIo;

    fn machine(program: &[u8]) -> Machine<NullIo> {
        let mut machine = Machine::without_roms(MachineConfig::default(), NullIo);
        let memory = machine.memory_mut();
        for (i, &byte) in program.iter().enumerate() {
            memory.write8(0x1000 + i as u16, byte, WriteMode::Banked);
        }
        machine.cpu_mut().set_pc(0x1000);
        machine
    }

    #[test]
    fn test_cycle_runs_instructions() {
        // LDA #$42 ; STA $2000
        let mut machine = machine(&[0xA9, 0x42, 0x8D, 0x00, 0x20]);
        assert_eq!(machine.cycle(), StepOutcome::Running);
        assert_eq!(machine.cycle(), StepOutcome::Running);
        assert_eq!(machine.memory().read8(0x2000), 0x42);
    }

    #[test]
    fn test_jump_to_self_is_deadlock() {
        let mut machine = machine(&[0xEA, 0x4C, 0x01, 0x10]);
        assert_eq!(machine.cycle(), StepOutcome::Running);
        assert_eq!(machine.cycle(), StepOutcome::Deadlock(0x1001));
    }

    #[test]
    fn test_branch_to_self_is_deadlock() {
        // CLC ; BCC *
        let mut machine = machine(&[0x18, 0x90, 0xFE]);
        machine.cycle();
        assert_eq!(machine.cycle(), StepOutcome::Deadlock(0x1001));
    }

    #[test]
    fn test_run_until_counts_cycles() {
        // INX ; JMP $1000
        let mut machine = machine(&[0xE8, 0x4C, 0x00, 0x10]);
        let cycles = machine.run_until(|m| m.cpu().x() == 3, 100);
        assert_eq!(cycles, Some(5));
        assert_eq!(machine.run_until(|m| m.cpu().x() == 0, 3), None);
    }

    #[test]
    fn test_boot_timeout_without_roms() {
        let config = MachineConfig {
            boot_cycle_limit: 1000,
            ..MachineConfig::default()
        };
        let mut machine = Machine::without_roms(config, NullIo);
        assert!(matches!(
            machine.boot(true),
            Err(MachineError::BootTimeout { cycles: 1000 })
        ));
    }

    #[test]
    fn test_functional_verdict() {
        let mut machine = machine(&[]);
        let memory = machine.memory_mut();
        memory.write8(PORT_DATA, 0x00, WriteMode::Banked);
        memory.write8(0x3469, 0x4C, WriteMode::Banked);
        memory.write8(0x0800, 0xD0, WriteMode::Banked);
        memory.write8(FUNCTIONAL_TEST_NUMBER, 0x2A, WriteMode::Banked);

        assert_eq!(
            machine.functional_verdict(0x3469),
            TestVerdict::Passed { pc: 0x3469 }
        );
        assert_eq!(
            machine.functional_verdict(0x0800),
            TestVerdict::Failed {
                pc: 0x0800,
                test: 0x2A
            }
        );
    }

    #[test]
    fn test_illegal_opcodes_follow_config() {
        let config = MachineConfig {
            illegal_opcodes: true,
            ..MachineConfig::default()
        };
        let machine = Machine::without_roms(config, NullIo);
        assert_eq!(machine.cpu().opcoder(), Opcoder::WithIllegal);
    }
}
