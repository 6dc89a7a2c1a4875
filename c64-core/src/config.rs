//! Machine configuration.

use std::path::PathBuf;

/// Video standard. Selects the mains rate the CIA timers are paced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// PAL (European) mains: 50 Hz
    #[default]
    PAL,
    /// NTSC (American) mains: 60 Hz
    NTSC,
}

impl Region {
    /// Get the mains frequency the CIA timers are paced to.
    pub fn mains_hz(&self) -> u32 {
        match self {
            Region::PAL => 50,
            Region::NTSC => 60,
        }
    }
}

/// Everything needed to build a [`Machine`](crate::Machine).
///
/// ```
/// use c64_core::MachineConfig;
///
/// let config = MachineConfig {
///     illegal_opcodes: true,
///     ..MachineConfig::default()
/// };
/// assert_eq!(config.vic_pixel_steps, 64);
/// assert!(config.patch_kernal_boot);
/// ```
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Directory the ROM image file names are resolved against.
    pub rom_dir: PathBuf,
    /// Combined BASIC + KERNAL image (16KB: BASIC first, then KERNAL).
    pub basic_kernal_rom: String,
    /// Character generator image (4KB).
    pub char_rom: String,
    /// Shorten the KERNAL RAM test at 0xFD84.
    pub patch_kernal_boot: bool,
    /// Decode the modelled undocumented opcodes.
    pub illegal_opcodes: bool,
    /// Beam positions the VIC-II advances per machine cycle.
    pub vic_pixel_steps: u32,
    /// Host-time rate at which the CIA timers are advanced.
    pub cia_frequency_hz: u32,
    /// Upper bound on machine cycles spent waiting for the BASIC prompt.
    pub boot_cycle_limit: u64,
    /// Video standard.
    pub region: Region,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            rom_dir: PathBuf::from("rom"),
            basic_kernal_rom: "64c.251913-01.bin".to_string(),
            char_rom: "character-rom.bin".to_string(),
            patch_kernal_boot: true,
            illegal_opcodes: false,
            vic_pixel_steps: 64,
            cia_frequency_hz: Region::PAL.mains_hz(),
            boot_cycle_limit: 20_000_000,
            region: Region::PAL,
        }
    }
}

impl MachineConfig {
    /// Full path of the BASIC + KERNAL image.
    pub fn basic_kernal_path(&self) -> PathBuf {
        self.rom_dir.join(&self.basic_kernal_rom)
    }

    /// Full path of the character ROM image.
    pub fn char_rom_path(&self) -> PathBuf {
        self.rom_dir.join(&self.char_rom)
    }
}
