//! C64 memory system with bank switching.
//!
//! The C64 maps RAM, three ROMs and the I/O chips onto overlapping address
//! ranges. The processor port at $0001 picks the layout; see
//! [`banks`](super::banks) for the tables.
//!
//! Memory Map (default layout, port value $37):
//! - $0000-$9FFF: RAM
//! - $A000-$BFFF: BASIC ROM
//! - $C000-$CFFF: RAM
//! - $D000-$DFFF: I/O (VIC-II, colour RAM, CIA1, CIA2)
//! - $E000-$FFFF: KERNAL ROM
//!
//! RAM and ROM are both full 64KB images. ROM contents live at the addresses
//! they are mapped to, so the character ROM sits at $D000 of the ROM image.
//! Writes never reach ROM: a write into a ROM zone lands in the RAM below.

use std::path::Path;

use mos6510::MemoryBus;

use super::banks::{zone_of, BankMode, BANK_PRESETS, ZONE_COUNT};
use crate::config::MachineConfig;
use crate::devices::cia::{Cia, CiaRole};
use crate::devices::clock::{Clock, SystemClock};
use crate::devices::vic_ii::{Vic2, VideoMemory};
use crate::error::LoadError;
use crate::io::VideoSink;

/// BASIC ROM start address.
pub const BASIC_ADDR: u16 = 0xA000;
/// Character ROM address in the ROM image.
pub const CHARACTER_ADDR: u16 = 0xD000;
/// KERNAL ROM start address.
pub const KERNAL_ADDR: u16 = 0xE000;

/// Processor port data direction register.
pub const PORT_DDR: u16 = 0x0000;
/// Processor port data register: the bank latch.
pub const PORT_DATA: u16 = 0x0001;

/// Keyboard buffer and its fill count.
const KEYBOARD_BUFFER: u16 = 0x0277;
const KEYBOARD_COUNT: u16 = 0x00C6;

/// KERNAL RAM test loop patched to finish early.
const BOOT_PATCH: [(u16, u8); 2] = [(0xFD84, 0x88), (0xFD85, 0xEA)];

/// How a write is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Straight into RAM, bypassing banking and I/O.
    Direct,
    /// Through the bank layout, as the CPU writes.
    Banked,
}

/// C64 memory system implementing bank switching.
pub struct Memory {
    /// 64KB main RAM.
    ram: Box<[u8; 0x10000]>,
    /// ROM image, addressed like the CPU sees it.
    rom: Box<[u8; 0x10000]>,

    /// Low three bits of the last value written to $0001.
    bank: u8,
    layout: [BankMode; ZONE_COUNT],

    /// CIA1 (keyboard, joystick, IRQ).
    cia1: Cia,
    /// CIA2 (VIC bank, NMI).
    cia2: Cia,
    /// VIC-II video chip.
    vic: Vic2,
}

impl Memory {
    /// Create a memory system with empty ROMs, chips paced by `clock`.
    pub fn new<C: Clock + Clone + 'static>(clock: C, config: &MachineConfig) -> Self {
        let hz = config.cia_frequency_hz;
        Self::with_chips(
            Cia::with_frequency(CiaRole::Cia1, Box::new(clock.clone()), hz),
            Cia::with_frequency(CiaRole::Cia2, Box::new(clock), hz),
            Vic2::with_pixel_steps(config.vic_pixel_steps),
        )
    }

    /// Create a memory system around existing chips.
    pub fn with_chips(cia1: Cia, cia2: Cia, vic: Vic2) -> Self {
        let mut memory = Self {
            ram: Box::new([0; 0x10000]),
            rom: Box::new([0; 0x10000]),
            bank: 7,
            layout: BANK_PRESETS[7],
            cia1,
            cia2,
            vic,
        };
        memory.ram[PORT_DDR as usize] = 0x2F;
        memory.ram[PORT_DATA as usize] = 0x37;
        memory
    }

    /// Loads BASIC, KERNAL and the character ROM from the configured images
    /// and resets the processor port.
    pub fn with_roms(mut self, config: &MachineConfig) -> Result<Self, LoadError> {
        let basic_kernal = config.basic_kernal_path();
        self.load_rom(&basic_kernal, 0, 8192, BASIC_ADDR)?;
        self.load_rom(&basic_kernal, 8192, 8192, KERNAL_ADDR)?;
        self.load_rom(&config.char_rom_path(), 0, 4096, CHARACTER_ADDR)?;

        self.write8(PORT_DDR, 0x2F, WriteMode::Direct);
        self.set_bank(0x37);

        if config.patch_kernal_boot {
            for (addr, value) in BOOT_PATCH {
                self.patch_rom(addr, value);
            }
        }

        Ok(self)
    }

    /// Reads a byte as the CPU sees it.
    pub fn read8(&self, addr: u16) -> u8 {
        match self.layout[zone_of(addr)] {
            BankMode::Ram => self.ram[addr as usize],
            BankMode::Rom => self.rom[addr as usize],
            BankMode::Io => self.read_io(addr),
        }
    }

    /// Reads a byte as the CPU sees it, without the side effects of reading
    /// I/O registers.
    pub fn peek8(&self, addr: u16) -> u8 {
        match self.layout[zone_of(addr)] {
            BankMode::Ram => self.ram[addr as usize],
            BankMode::Rom => self.rom[addr as usize],
            BankMode::Io => match addr {
                0xD000..=0xD3FF => self.vic.peek((addr & 0x3F) as u8),
                0xDC00..=0xDCFF => self.cia1.peek((addr & 0x0F) as u8),
                0xDD00..=0xDDFF => self.cia2.peek((addr & 0x0F) as u8),
                _ => self.ram[addr as usize],
            },
        }
    }

    fn read_io(&self, addr: u16) -> u8 {
        match addr {
            0xD000..=0xD3FF => self.vic.read((addr & 0x3F) as u8),
            0xDC00..=0xDCFF => self.cia1.read((addr & 0x0F) as u8),
            0xDD00..=0xDDFF => self.cia2.read((addr & 0x0F) as u8),
            // Colour RAM and unmapped I/O
            _ => self.ram[addr as usize],
        }
    }

    /// Writes a byte.
    ///
    /// Banked writes to $0001 reconfigure the bank layout. Writes to ROM
    /// zones land in RAM.
    pub fn write8(&mut self, addr: u16, value: u8, mode: WriteMode) {
        if mode == WriteMode::Direct {
            self.ram[addr as usize] = value;
            return;
        }

        if addr == PORT_DATA {
            self.set_bank(value);
            return;
        }

        match self.layout[zone_of(addr)] {
            BankMode::Ram | BankMode::Rom => self.ram[addr as usize] = value,
            BankMode::Io => self.write_io(addr, value),
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        match addr {
            0xD000..=0xD3FF => self.vic.write((addr & 0x3F) as u8, value),
            0xDC00..=0xDCFF => self.cia1.write((addr & 0x0F) as u8, value),
            0xDD00..=0xDDFF => self.cia2.write((addr & 0x0F) as u8, value),
            _ => self.ram[addr as usize] = value,
        }
    }

    /// Latches a processor port value: selects the layout from the low three
    /// bits and stores the raw value at $0001.
    pub fn set_bank(&mut self, value: u8) {
        let bank = value & 0x07;
        if bank != self.bank {
            log::debug!("Changing bank mode to {:02X}", bank);
        }
        self.bank = bank;
        self.layout = BANK_PRESETS[bank as usize];
        self.ram[PORT_DATA as usize] = value;
    }

    /// Current bank mode (0-7).
    pub fn bank_mode(&self) -> u8 {
        self.bank
    }

    /// What the CPU currently sees at `addr`.
    pub fn zone_mode(&self, addr: u16) -> BankMode {
        self.layout[zone_of(addr)]
    }

    /// Reads RAM regardless of banking.
    pub fn read8_raw_ram(&self, addr: u16) -> u8 {
        self.ram[addr as usize]
    }

    /// Reads the ROM image regardless of banking.
    pub fn read8_raw_rom(&self, addr: u16) -> u8 {
        self.rom[addr as usize]
    }

    /// Overwrites one ROM byte.
    pub fn patch_rom(&mut self, addr: u16, value: u8) {
        self.rom[addr as usize] = value;
    }

    /// Copies `length` bytes from `offset` of `path` into ROM at `dest`.
    pub fn load_rom(
        &mut self,
        path: &Path,
        offset: usize,
        length: usize,
        dest: u16,
    ) -> Result<(), LoadError> {
        let bytes = read_range(path, offset, length)?;
        copy_wrapping(&mut self.rom[..], dest, bytes);
        Ok(())
    }

    /// Copies `length` bytes from `offset` of `path` into RAM at `dest`.
    pub fn load_ram(
        &mut self,
        path: &Path,
        offset: usize,
        length: usize,
        dest: u16,
    ) -> Result<(), LoadError> {
        let bytes = read_range(path, offset, length)?;
        copy_wrapping(&mut self.ram[..], dest, bytes);
        Ok(())
    }

    /// Loads a PRG file into RAM. Returns the load address.
    pub fn load_program(&mut self, path: &Path) -> Result<u16, LoadError> {
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_program_bytes(&data)
    }

    /// Loads a PRG image (two-byte little-endian load address, then data)
    /// into RAM. Returns the load address.
    pub fn load_program_bytes(&mut self, image: &[u8]) -> Result<u16, LoadError> {
        let [low, high, payload @ ..] = image else {
            return Err(LoadError::EmptyProgram);
        };

        let address = u16::from_le_bytes([*low, *high]);
        copy_wrapping(&mut self.ram[..], address, payload);
        log::debug!(
            "Loaded {} bytes at ${:04X}",
            payload.len(),
            address
        );
        Ok(address)
    }

    /// Types RUN and return into the keyboard buffer.
    pub fn inject_run(&mut self) {
        for (i, &key) in b"RUN\r".iter().enumerate() {
            self.write8(KEYBOARD_BUFFER + i as u16, key, WriteMode::Direct);
        }
        self.write8(KEYBOARD_COUNT, 4, WriteMode::Direct);
    }

    /// Advances both CIAs. Returns (IRQ from CIA1, NMI from CIA2).
    pub fn cycle_cias(&mut self, cpu_ticks: u64, irq_disabled: bool) -> (bool, bool) {
        let irq = self.cia1.cycle(cpu_ticks, irq_disabled);
        let nmi = self.cia2.cycle(cpu_ticks, false);
        (irq, nmi)
    }

    /// Advances the VIC-II. Returns true if it requests an IRQ.
    pub fn cycle_video(&mut self, sink: &mut dyn VideoSink) -> bool {
        let view = VideoMemory {
            ram: &self.ram,
            rom: &self.rom,
            bank: self.cia2.vic_bank(),
        };
        self.vic.cycle(&view, sink)
    }

    pub fn ram(&self) -> &[u8; 0x10000] {
        &self.ram
    }

    pub fn cia1(&self) -> &Cia {
        &self.cia1
    }

    pub fn cia1_mut(&mut self) -> &mut Cia {
        &mut self.cia1
    }

    pub fn cia2(&self) -> &Cia {
        &self.cia2
    }

    pub fn cia2_mut(&mut self) -> &mut Cia {
        &mut self.cia2
    }

    pub fn vic(&self) -> &Vic2 {
        &self.vic
    }

    pub fn vic_mut(&mut self) -> &mut Vic2 {
        &mut self.vic
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(SystemClock::new(), &MachineConfig::default())
    }
}

impl MemoryBus for Memory {
    fn read(&self, addr: u16) -> u8 {
        self.read8(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write8(addr, value, WriteMode::Banked);
    }
}

/// Reads `length` bytes at `offset` of the file at `path`.
fn read_range(path: &Path, offset: usize, length: usize) -> Result<Vec<u8>, LoadError> {
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let needed = offset + length;
    if data.len() < needed {
        return Err(LoadError::TooShort {
            path: path.to_path_buf(),
            needed,
            actual: data.len(),
        });
    }

    Ok(data[offset..needed].to_vec())
}

/// Copies `bytes` into a 64KB image from `dest`, wrapping past $FFFF.
fn copy_wrapping<B: AsRef<[u8]>>(image: &mut [u8], dest: u16, bytes: B) {
    for (i, &byte) in bytes.as_ref().iter().enumerate() {
        image[dest.wrapping_add(i as u16) as usize] = byte;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::clock::ManualClock;
    use std::io::Write;

    fn memory() -> Memory {
        Memory::new(ManualClock::new(), &MachineConfig::default())
    }

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("c64-core-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file");
        path
    }

    #[test]
    fn test_new_memory() {
        let mem = memory();
        assert_eq!(mem.read8(0x0000), 0x2F);
        assert_eq!(mem.read8(0x0001), 0x37);
        assert_eq!(mem.bank_mode(), 7);
        assert_eq!(mem.zone_mode(0xA000), BankMode::Rom);
    }

    #[test]
    fn test_rom_zone_writes_land_in_ram() {
        let mut mem = memory();
        mem.patch_rom(0xA123, 0x55);
        mem.write8(0xA123, 0x42, WriteMode::Banked);

        assert_eq!(mem.read8(0xA123), 0x55);
        assert_eq!(mem.read8_raw_ram(0xA123), 0x42);
        assert_eq!(mem.read8_raw_rom(0xA123), 0x55);

        // Banking BASIC out reveals the RAM below
        mem.write8(PORT_DATA, 0x36, WriteMode::Banked);
        assert_eq!(mem.read8(0xA123), 0x42);
    }

    #[test]
    fn test_bank_latch_stores_raw_value() {
        let mut mem = memory();
        mem.write8(PORT_DATA, 0xF5, WriteMode::Banked);
        assert_eq!(mem.bank_mode(), 5);
        assert_eq!(mem.read8_raw_ram(PORT_DATA), 0xF5);
        assert_eq!(mem.zone_mode(0xE000), BankMode::Ram);
        assert_eq!(mem.zone_mode(0xD000), BankMode::Io);
    }

    #[test]
    fn test_direct_write_skips_bank_latch() {
        let mut mem = memory();
        mem.write8(PORT_DATA, 0x30, WriteMode::Direct);
        assert_eq!(mem.bank_mode(), 7);
        assert_eq!(mem.read8_raw_ram(PORT_DATA), 0x30);
    }

    #[test]
    fn test_io_dispatch() {
        let mut mem = memory();
        mem.write8(0xD020, 0x0E, WriteMode::Banked);
        assert_eq!(mem.vic().border_colour(), 0x0E);
        // VIC registers repeat every 64 bytes
        assert_eq!(mem.read8(0xD060), 0x0E);

        mem.write8(0xDC02, 0xFF, WriteMode::Banked);
        assert_eq!(mem.read8(0xDC12), 0xFF);

        mem.write8(0xDD00, 0x01, WriteMode::Banked);
        assert_eq!(mem.cia2().vic_bank(), 2);

        // Colour RAM is plain RAM
        mem.write8(0xD800, 0x07, WriteMode::Banked);
        assert_eq!(mem.read8_raw_ram(0xD800), 0x07);
        assert_eq!(mem.read8(0xD800), 0x07);
    }

    #[test]
    fn test_peek_leaves_io_latches() {
        let mut mem = memory();
        mem.write8(0xDC04, 0x01, WriteMode::Banked);
        mem.write8(0xDC05, 0x00, WriteMode::Banked);
        mem.write8(0xDC0D, 0x81, WriteMode::Banked);
        mem.write8(0xDC0E, 0x11, WriteMode::Banked);
        mem.cycle_cias(5, true);

        assert_eq!(mem.peek8(0xDC0D), 0x81);
        assert_eq!(mem.peek8(0xDC0D), 0x81);
        assert_eq!(mem.read8(0xDC0D), 0x81);
        assert_eq!(mem.peek8(0xDC0D), 0x00);

        // Outside I/O, peek and read agree
        mem.write8(0x1234, 0x56, WriteMode::Banked);
        assert_eq!(mem.peek8(0x1234), mem.read8(0x1234));
    }

    #[test]
    fn test_char_rom_bank() {
        let mut mem = memory();
        mem.patch_rom(0xD000, 0x3C);
        mem.write8(PORT_DATA, 0x33, WriteMode::Banked);
        assert_eq!(mem.read8(0xD000), 0x3C);

        // Writes under the character ROM reach RAM, not the VIC
        mem.write8(0xD020, 0x01, WriteMode::Banked);
        assert_eq!(mem.read8_raw_ram(0xD020), 0x01);
        assert_eq!(mem.vic().border_colour(), 0x00);
    }

    #[test]
    fn test_memory_bus_read16_wraps() {
        let mut mem = memory();
        mem.write(0x30FF, 0x80);
        mem.write(0x3000, 0x50);
        mem.write(0x3100, 0x40);
        assert_eq!(mem.read16(0x30FF, mos6510::Wrap::Page), 0x5080);
        assert_eq!(mem.read16(0x30FF, mos6510::Wrap::Linear), 0x4080);
    }

    #[test]
    fn test_load_program_bytes() {
        let mut mem = memory();
        let address = mem
            .load_program_bytes(&[0x01, 0x08, 0x0B, 0x08, 0x0A])
            .unwrap();
        assert_eq!(address, 0x0801);
        assert_eq!(mem.read8(0x0801), 0x0B);
        assert_eq!(mem.read8(0x0803), 0x0A);

        assert!(matches!(
            mem.load_program_bytes(&[0x01]),
            Err(LoadError::EmptyProgram)
        ));
    }

    #[test]
    fn test_inject_run() {
        let mut mem = memory();
        mem.inject_run();
        assert_eq!(mem.read8(0x00C6), 4);
        assert_eq!(&mem.ram()[0x0277..0x027B], b"RUN\r");
    }

    #[test]
    fn test_load_rom_ranges() {
        let contents: Vec<u8> = (0..32u8).collect();
        let path = temp_file("rom.bin", &contents);

        let mut mem = memory();
        mem.load_rom(&path, 16, 8, 0xE000).unwrap();
        assert_eq!(mem.read8_raw_rom(0xE000), 16);
        assert_eq!(mem.read8_raw_rom(0xE007), 23);
        assert_eq!(mem.read8(0xE000), 16);

        mem.load_ram(&path, 0, 4, 0xFFFE).unwrap();
        assert_eq!(mem.read8_raw_ram(0xFFFF), 1);
        assert_eq!(mem.read8_raw_ram(0x0000), 2);

        let err = mem.load_rom(&path, 30, 8, 0xE000).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooShort {
                needed: 38,
                actual: 32,
                ..
            }
        ));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_rom_is_an_error() {
        let config = MachineConfig {
            rom_dir: std::env::temp_dir().join("c64-core-no-such-dir"),
            ..MachineConfig::default()
        };
        let result = memory().with_roms(&config);
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_with_roms_loads_and_patches() {
        let basic_kernal: Vec<u8> = (0..16384u32).map(|i| (i >> 8) as u8).collect();
        let chars = vec![0xC3; 4096];
        let dir = std::env::temp_dir().join(format!("c64-core-roms-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("basic-kernal.bin"), &basic_kernal).unwrap();
        std::fs::write(dir.join("chars.bin"), &chars).unwrap();

        let config = MachineConfig {
            rom_dir: dir.clone(),
            basic_kernal_rom: "basic-kernal.bin".to_string(),
            char_rom: "chars.bin".to_string(),
            ..MachineConfig::default()
        };
        let mem = memory().with_roms(&config).unwrap();

        assert_eq!(mem.read8(0xA000), 0x00);
        assert_eq!(mem.read8(0xBFFF), 0x1F);
        assert_eq!(mem.read8(0xE000), 0x20);
        assert_eq!(mem.read8_raw_rom(0xD000), 0xC3);
        assert_eq!(mem.read8(0xFD84), 0x88);
        assert_eq!(mem.read8(0xFD85), 0xEA);
        assert_eq!(mem.read8(0x0000), 0x2F);
        assert_eq!(mem.read8(0x0001), 0x37);

        std::fs::remove_dir_all(&dir).ok();
    }
}
