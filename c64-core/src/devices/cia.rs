//! CIA (MOS 6526) Complex Interface Adapter emulation.
//!
//! The C64 has two CIA chips:
//! - CIA1 ($DC00-$DCFF): Keyboard matrix, joystick ports, IRQ generation
//! - CIA2 ($DD00-$DDFF): VIC-II bank selection, NMI generation
//!
//! Each CIA provides:
//! - Two 8-bit I/O ports (A and B)
//! - Two 16-bit countdown timers with interrupt capability
//! - Time-of-day clock
//! - Serial shift register (stub)
//!
//! Timers are not clocked every CPU tick. A host-time [`Throttle`] opens a
//! few dozen times per second and the timers are then charged all CPU ticks
//! elapsed since the previous opening.
//!
//! CIA2 shares the whole register file with CIA1 except for the registers
//! listed in [`CIA2_OVERRIDES`], which it handles itself.

use std::cell::Cell;

use mos6510::bits::{bit_set, bit_test, dec2bcd};

use super::clock::{Clock, Throttle};
use crate::io::KeyboardMatrix;

/// Interrupt status bit for timer A underflow.
pub const ICR_TIMER_A: u8 = 0x01;
/// Interrupt status bit for timer B underflow.
pub const ICR_TIMER_B: u8 = 0x02;
/// Interrupt status bit 7: set on read when an enabled source fired.
pub const ICR_IRQ: u8 = 0x80;

/// Which of the two chips an instance plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiaRole {
    /// $DC00: keyboard, joysticks, IRQ.
    Cia1,
    /// $DD00: VIC bank select, NMI.
    Cia2,
}

/// Timer clock source (control register bits 5-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMode {
    /// System clock ticks.
    SystemTicks,
    /// Positive edges on the CNT pin.
    CntPin,
    /// Timer A underflows (timer B only).
    TimerA,
    /// Timer A underflows while CNT is high (timer B only).
    TimerAWithCnt,
}

impl CountMode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => CountMode::SystemTicks,
            1 => CountMode::CntPin,
            2 => CountMode::TimerA,
            _ => CountMode::TimerAWithCnt,
        }
    }
}

/// CIA timer state.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Live countdown value. Signed so a large elapsed tick count can carry
    /// it below zero before the underflow check.
    pub counter: i32,
    /// Reload latch value.
    pub latch: u16,
    /// Timer is running.
    pub started: bool,
    /// One-shot mode (stops after underflow).
    pub one_shot: bool,
    /// Clock source.
    pub count_mode: CountMode,
    /// Underflow raises an interrupt.
    pub irq_enabled: bool,
    name: char,
    warned: bool,
}

impl Timer {
    fn new(name: char) -> Self {
        Self {
            counter: 0xFFFF,
            latch: 0xFFFF,
            started: false,
            one_shot: false,
            count_mode: CountMode::SystemTicks,
            irq_enabled: false,
            name,
            warned: false,
        }
    }

    /// Charges `ticks` elapsed CPU ticks. Returns true on underflow.
    fn advance(&mut self, ticks: u64) -> bool {
        if !self.started {
            return false;
        }

        if self.count_mode != CountMode::SystemTicks {
            if !self.warned {
                log::warn!(
                    "CIA timer {} uses count mode {:?} which is not supported",
                    self.name,
                    self.count_mode
                );
                self.warned = true;
            }
            return false;
        }

        self.counter -= ticks.min(i32::MAX as u64) as i32;
        if self.counter > 0 {
            return false;
        }

        self.counter = self.latch as i32;
        if self.one_shot {
            self.started = false;
        }
        true
    }

    fn write_low(&mut self, value: u8) {
        self.latch = (self.latch & 0xFF00) | value as u16;
    }

    /// Writes the latch high byte; a stopped timer also loads its counter.
    fn write_high(&mut self, value: u8) {
        self.latch = (self.latch & 0x00FF) | ((value as u16) << 8);
        if !self.started {
            self.counter = self.latch as i32;
        }
    }

    fn counter_low(&self) -> u8 {
        (self.counter.clamp(0, 0xFFFF) & 0xFF) as u8
    }

    fn counter_high(&self) -> u8 {
        (self.counter.clamp(0, 0xFFFF) >> 8) as u8
    }

    /// Applies control register bits 0 (start), 3 (one-shot) and 4 (force load).
    fn control(&mut self, value: u8) {
        self.started = bit_test(value, 0);
        self.one_shot = bit_test(value, 3);
        if bit_test(value, 4) {
            self.counter = self.latch as i32;
        }
    }
}

/// CIA2 registers handled outside the shared register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    /// Port A: VIC bank select in bits 0-1.
    VicBank,
    /// Port B: user port, reads 0 and ignores writes.
    UserPort,
    /// Data direction A: fixed to outputs on bits 0-1.
    DirectionA,
}

/// Register offset → override for CIA2.
pub const CIA2_OVERRIDES: [Option<Override>; 16] = {
    let mut table = [None; 16];
    table[0x00] = Some(Override::VicBank);
    table[0x01] = Some(Override::UserPort);
    table[0x02] = Some(Override::DirectionA);
    table
};

/// MOS 6526 Complex Interface Adapter.
pub struct Cia {
    role: CiaRole,

    port_a: u8,
    port_b: u8,
    ddr_a: u8,
    ddr_b: u8,

    /// Timer A.
    pub timer_a: Timer,
    /// Timer B.
    pub timer_b: Timer,

    /// Accumulated interrupt sources. Reading ICR clears it, hence the Cell.
    interrupt_status: Cell<u8>,

    cra: u8,
    crb: u8,
    ssr: u8,

    keyboard: KeyboardMatrix,
    /// Active-high joystick bits for ports 1 and 2.
    joysticks: [u8; 2],

    /// Raw VIC bank select written through CIA2 port A.
    vic_select: u8,

    clock: Box<dyn Clock>,
    throttle: Throttle,
    /// CPU tick count at the last throttle opening.
    previous_ticks: u64,
}

impl Cia {
    /// Creates a CIA paced at 50 Hz of `clock` time.
    pub fn new(role: CiaRole, clock: Box<dyn Clock>) -> Self {
        Self::with_frequency(role, clock, 50)
    }

    /// Creates a CIA paced at `hz` of `clock` time.
    pub fn with_frequency(role: CiaRole, clock: Box<dyn Clock>, hz: u32) -> Self {
        Self {
            role,
            port_a: 0xFF,
            port_b: 0xFF,
            ddr_a: 0,
            ddr_b: 0,
            timer_a: Timer::new('A'),
            timer_b: Timer::new('B'),
            interrupt_status: Cell::new(0),
            cra: 0,
            crb: 0,
            ssr: 0,
            keyboard: KeyboardMatrix::default(),
            joysticks: [0; 2],
            vic_select: 0x03,
            clock,
            throttle: Throttle::with_frequency(hz),
            previous_ticks: 0,
        }
    }

    pub fn role(&self) -> CiaRole {
        self.role
    }

    /// Advances the timers.
    ///
    /// `cpu_ticks` is the CPU's running tick count, `irq_disabled` its I flag.
    /// Returns true when an enabled timer underflowed and the CPU accepts
    /// interrupts.
    pub fn cycle(&mut self, cpu_ticks: u64, irq_disabled: bool) -> bool {
        if !self.throttle.ready(self.clock.as_ref()) {
            return false;
        }

        let elapsed = cpu_ticks.saturating_sub(self.previous_ticks);
        self.previous_ticks = cpu_ticks;

        let mut raise = false;

        if self.timer_a.advance(elapsed) {
            self.raise_status(ICR_TIMER_A);
            raise |= self.timer_a.irq_enabled && !irq_disabled;
        }

        if self.timer_b.advance(elapsed) {
            self.raise_status(ICR_TIMER_B);
            raise |= self.timer_b.irq_enabled && !irq_disabled;
        }

        raise
    }

    fn raise_status(&self, bits: u8) {
        self.interrupt_status
            .set(self.interrupt_status.get() | bits);
    }

    /// Sources whose interrupt is enabled, as ICR bits.
    fn enabled_sources(&self) -> u8 {
        let mut mask = 0;
        if self.timer_a.irq_enabled {
            mask |= ICR_TIMER_A;
        }
        if self.timer_b.irq_enabled {
            mask |= ICR_TIMER_B;
        }
        mask
    }

    /// Interrupt status without the read side effect.
    pub fn interrupt_status(&self) -> u8 {
        self.interrupt_status.get()
    }

    /// VIC-II bank (0-3) selected through CIA2 port A.
    ///
    /// The select lines are inverted: a select value of 3 maps bank 0
    /// ($0000-$3FFF).
    pub fn vic_bank(&self) -> u8 {
        3 - (self.vic_select & 0x03)
    }

    /// Latches the currently pressed keys.
    pub fn set_keyboard(&mut self, matrix: KeyboardMatrix) {
        self.keyboard = matrix;
    }

    /// Latches joystick `port` (1 or 2), active-high.
    pub fn set_joystick(&mut self, port: u8, bits: u8) {
        match port {
            1 => self.joysticks[0] = bits & 0x1F,
            2 => self.joysticks[1] = bits & 0x1F,
            _ => log::warn!("no joystick port {}", port),
        }
    }

    fn override_for(&self, offset: u8) -> Option<Override> {
        match self.role {
            CiaRole::Cia1 => None,
            CiaRole::Cia2 => CIA2_OVERRIDES[(offset & 0x0F) as usize],
        }
    }

    /// Reads register `offset` (mirrored every 16 bytes). Reading ICR
    /// clears the accumulated interrupt sources.
    pub fn read(&self, offset: u8) -> u8 {
        let offset = offset & 0x0F;
        let value = self.peek(offset);
        if offset == 0x0D && self.override_for(offset).is_none() {
            self.interrupt_status.set(0);
        }
        value
    }

    /// Reads register `offset` without acknowledging anything.
    pub fn peek(&self, offset: u8) -> u8 {
        let offset = offset & 0x0F;

        if let Some(register) = self.override_for(offset) {
            return match register {
                Override::VicBank => (self.vic_select & 0x03) | 0xFC,
                Override::UserPort => 0x00,
                Override::DirectionA => 0x03,
            };
        }

        match offset {
            // Port A: column select, joystick 2
            0x00 => (self.port_a | !self.ddr_a) & !self.joysticks[1],
            // Port B: keyboard rows, joystick 1
            0x01 => {
                let rows = if self.keyboard.cols & !self.port_a != 0 {
                    self.keyboard.rows
                } else {
                    0
                };
                (self.port_b | !self.ddr_b) & !rows & !self.joysticks[0]
            }
            0x02 => self.ddr_a,
            0x03 => self.ddr_b,
            0x04 => self.timer_a.counter_low(),
            0x05 => self.timer_a.counter_high(),
            0x06 => self.timer_b.counter_low(),
            0x07 => self.timer_b.counter_high(),
            0x08..=0x0B => self.read_tod(offset),
            0x0C => self.ssr,
            0x0D => {
                let status = self.interrupt_status.get();
                if status & self.enabled_sources() != 0 {
                    status | ICR_IRQ
                } else {
                    status
                }
            }
            0x0E => {
                let mut value = self.cra & 0xF6;
                value = bit_set(value, 0, self.timer_a.started);
                bit_set(value, 3, self.timer_a.one_shot) & !0x10
            }
            _ => {
                let mut value = self.crb & 0xF6;
                value = bit_set(value, 0, self.timer_b.started);
                bit_set(value, 3, self.timer_b.one_shot) & !0x10
            }
        }
    }

    /// Time of day as BCD, counted from the clock's start.
    fn read_tod(&self, offset: u8) -> u8 {
        let now = self.clock.elapsed();
        let seconds = now.as_secs();

        match offset {
            0x08 => dec2bcd((now.subsec_millis() / 100) as u8),
            0x09 => dec2bcd((seconds % 60) as u8),
            0x0A => dec2bcd(((seconds / 60) % 60) as u8),
            _ => {
                let hours = (seconds / 3600) % 24;
                let pm = if hours >= 12 { 0x80 } else { 0x00 };
                let hours = match hours % 12 {
                    0 => 12,
                    h => h,
                };
                dec2bcd(hours as u8) | pm
            }
        }
    }

    /// Writes register `offset` (mirrored every 16 bytes).
    pub fn write(&mut self, offset: u8, value: u8) {
        let offset = offset & 0x0F;

        if let Some(register) = self.override_for(offset) {
            if register == Override::VicBank {
                self.vic_select = value;
            }
            return;
        }

        match offset {
            0x00 => self.port_a = value,
            0x01 => self.port_b = value,
            0x02 => self.ddr_a = value,
            0x03 => self.ddr_b = value,
            0x04 => self.timer_a.write_low(value),
            0x05 => self.timer_a.write_high(value),
            0x06 => self.timer_b.write_low(value),
            0x07 => self.timer_b.write_high(value),
            0x08..=0x0B => {
                if bit_test(self.crb, 7) {
                    log::warn!("CIA TOD alarm cannot be set");
                } else {
                    log::warn!("CIA TOD clock cannot be set");
                }
            }
            0x0C => log::warn!("CIA serial shift register cannot be written"),
            0x0D => {
                // Bit 7 selects set or clear for the addressed sources
                let enable = bit_test(value, 7);
                if bit_test(value, 0) {
                    self.timer_a.irq_enabled = enable;
                }
                if bit_test(value, 1) {
                    self.timer_b.irq_enabled = enable;
                }
            }
            0x0E => {
                self.cra = value;
                self.timer_a.control(value);
                self.timer_a.count_mode = CountMode::from_bits((value >> 5) & 0x01);
            }
            _ => {
                self.crb = value;
                self.timer_b.control(value);
                self.timer_b.count_mode = CountMode::from_bits((value >> 5) & 0x03);
            }
        }
    }
}
