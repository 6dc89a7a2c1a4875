//! Bank switching tables.
//!
//! The processor port at $0001 selects, through its low three bits
//! (LORAM, HIRAM, CHAREN), what the CPU sees in each of seven address zones.
//! The cartridge lines are assumed inactive, leaving eight layouts.

/// What a zone is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankMode {
    Ram,
    Rom,
    Io,
}

use BankMode::{Io, Ram, Rom};

/// Number of address zones.
pub const ZONE_COUNT: usize = 7;

/// Zone boundaries, inclusive.
pub const ZONES: [(u16, u16); ZONE_COUNT] = [
    (0x0000, 0x0FFF),
    (0x1000, 0x7FFF),
    (0x8000, 0x9FFF),
    (0xA000, 0xBFFF),
    (0xC000, 0xCFFF),
    (0xD000, 0xDFFF),
    (0xE000, 0xFFFF),
];

/// Layout of all zones for each value of the low three port bits.
pub const BANK_PRESETS: [[BankMode; ZONE_COUNT]; 8] = [
    [Ram, Ram, Ram, Ram, Ram, Ram, Ram],
    [Ram, Ram, Ram, Ram, Ram, Ram, Ram],
    [Ram, Ram, Ram, Ram, Ram, Rom, Rom],
    [Ram, Ram, Rom, Rom, Ram, Rom, Rom],
    [Ram, Ram, Ram, Ram, Ram, Ram, Ram],
    [Ram, Ram, Ram, Ram, Ram, Io, Ram],
    [Ram, Ram, Ram, Ram, Ram, Io, Rom],
    [Ram, Ram, Rom, Rom, Ram, Io, Rom],
];

/// Zone index for each 256-byte page.
pub const ZONE_OF_PAGE: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut page = 0;
    while page < 256 {
        let addr = (page as u16) << 8;
        let mut zone = 0;
        while zone < ZONE_COUNT {
            if addr >= ZONES[zone].0 && addr <= ZONES[zone].1 {
                table[page] = zone as u8;
            }
            zone += 1;
        }
        page += 1;
    }
    table
};

/// Zone holding `addr`.
#[inline]
pub fn zone_of(addr: u16) -> usize {
    ZONE_OF_PAGE[(addr >> 8) as usize] as usize
}
