//! VIC-II (MOS 6569) Video Interface Chip emulation.
//!
//! The VIC-II is the C64's graphics chip, responsible for:
//! - Text and bitmap display modes
//! - 8 hardware sprites
//! - Raster interrupts
//! - Border and background colors
//!
//! The chip drives a beam across a 504 × 312 frame that includes the blanking
//! areas. Every call to [`Vic2::cycle`] advances the beam a fixed number of
//! positions, colouring each visible one, and hands the frame to the
//! [`VideoSink`] when the beam wraps. This is frame-accurate, not cycle-exact.

mod graphics;
mod sprites;

use std::cell::Cell;

use mos6510::bits::{bit_get, bit_set, bit_test};

use crate::io::VideoSink;

pub use graphics::GraphicsMode;

/// Beam positions per line, including horizontal blanking.
pub const FRAME_WIDTH: usize = 504;

/// Lines per frame, including vertical blanking.
pub const FRAME_HEIGHT: usize = 312;

/// Beam positions per frame.
pub const FRAME_PIXELS: usize = FRAME_WIDTH * FRAME_HEIGHT;

/// Screen width in pixels (active area).
pub const SCREEN_WIDTH: usize = 320;

/// Screen height in pixels (active area).
pub const SCREEN_HEIGHT: usize = 200;

/// First and last visible beam column.
pub const VISIBLE_X: (usize, usize) = (52, 454);

/// First and last visible beam line.
pub const VISIBLE_Y: (usize, usize) = (15, 298);

/// Border width around the active area, inside the visible window.
pub const BORDER: usize = 43;

/// Beam positions advanced per cycle unless configured otherwise.
pub const DEFAULT_PIXEL_STEPS: u32 = 64;

/// Interrupt status/control bits.
pub const IRQ_RASTER: u8 = 0x01;
pub const IRQ_SPRITE_BACKGROUND: u8 = 0x02;
pub const IRQ_SPRITE_SPRITE: u8 = 0x04;
pub const IRQ_ANY: u8 = 0x80;

/// Character ROM window as seen by the VIC in banks 0 and 2.
const CHAR_ROM_WINDOW: std::ops::Range<u16> = 0x1000..0x2000;

/// Where the character ROM sits in the CPU's ROM image.
const CHAR_ROM_BASE: u16 = 0xD000;

/// Colour RAM location.
const COLOUR_RAM: u16 = 0xD800;

/// Memory as the VIC-II sees it: a 16KB window of RAM selected by CIA2, with
/// the character ROM showing through in two of the four banks.
#[derive(Clone, Copy)]
pub struct VideoMemory<'a> {
    pub ram: &'a [u8; 0x10000],
    pub rom: &'a [u8; 0x10000],
    /// Bank 0-3 as reported by CIA2.
    pub bank: u8,
}

impl<'a> VideoMemory<'a> {
    /// First address of the selected 16KB bank.
    pub fn bank_base(&self) -> u16 {
        (self.bank as u16 & 0x03) * 0x4000
    }

    /// Reads an absolute address through the VIC's view.
    pub fn read(&self, addr: u16) -> u8 {
        let in_bank = addr & 0x3FFF;
        if self.bank & 0x01 == 0 && CHAR_ROM_WINDOW.contains(&in_bank) {
            self.rom[(CHAR_ROM_BASE + (in_bank & 0x0FFF)) as usize]
        } else {
            self.ram[addr as usize]
        }
    }

    /// Colour RAM nibble for screen cell `index`.
    pub fn colour(&self, index: u16) -> u8 {
        self.ram[COLOUR_RAM.wrapping_add(index) as usize] & 0x0F
    }
}

/// Memory offsets derived from the memory setup register and bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoOffsets {
    /// Screen (video matrix) start.
    pub screen: u16,
    /// Character generator start.
    pub chars: u16,
    /// Bitmap start.
    pub bitmap: u16,
    memory_setup: u8,
    bank: u8,
}

impl VideoOffsets {
    fn compute(memory_setup: u8, bank: u8) -> Self {
        let base = (bank as u16 & 0x03) * 0x4000;
        Self {
            screen: base + ((memory_setup as u16 & 0xF0) >> 4) * 0x400,
            chars: base + ((memory_setup as u16 & 0x0E) >> 1) * 0x800,
            bitmap: base + ((memory_setup as u16 & 0x08) >> 3) * 0x2000,
            memory_setup,
            bank,
        }
    }
}

/// Hardware sprite registers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sprite {
    /// 9-bit X position.
    pub x: u16,
    pub y: u8,
    pub colour: u8,
}

/// Colour index and whether it came from foreground graphics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub colour: u8,
    pub foreground: bool,
}

impl Pixel {
    fn background(colour: u8) -> Self {
        Self {
            colour,
            foreground: false,
        }
    }

    fn foreground(colour: u8) -> Self {
        Self {
            colour,
            foreground: true,
        }
    }
}

/// MOS 6569 Video Interface Chip.
pub struct Vic2 {
    cr1: u8,
    cr2: u8,
    memory_setup: u8,

    /// Current beam line (0-311).
    raster_line: u16,
    /// Raster interrupt compare value (9 bits).
    raster_compare: u16,
    /// Raster interrupt already latched on the current line.
    raster_matched: bool,

    interrupt_status: u8,
    interrupt_control: u8,

    sprites: [Sprite; 8],
    sprite_enable: u8,
    sprite_priority: u8,
    sprite_multicolour: u8,
    sprite_double_width: u8,
    sprite_double_height: u8,
    sprite_extra_colours: [u8; 2],

    /// Sprite-sprite collisions (cleared on read).
    collision_sprite: Cell<u8>,
    /// Sprite-background collisions (cleared on read).
    collision_background: Cell<u8>,

    border_colour: u8,
    /// Background colour 0 and extra background colours 1-3.
    background_colours: [u8; 4],

    mode: GraphicsMode,
    screen_enabled: bool,

    /// Beam position within the frame (0..FRAME_PIXELS).
    beam: usize,
    pixel_steps: u32,
    frame: Vec<u8>,

    offsets: VideoOffsets,
}

impl Vic2 {
    /// Create a new VIC-II advancing [`DEFAULT_PIXEL_STEPS`] per cycle.
    pub fn new() -> Self {
        Self::with_pixel_steps(DEFAULT_PIXEL_STEPS)
    }

    /// Create a new VIC-II advancing `pixel_steps` beam positions per cycle.
    pub fn with_pixel_steps(pixel_steps: u32) -> Self {
        Self {
            cr1: 0,
            cr2: 0,
            memory_setup: 0,
            raster_line: 0,
            raster_compare: 0,
            raster_matched: false,
            interrupt_status: 0,
            interrupt_control: 0,
            sprites: [Sprite::default(); 8],
            sprite_enable: 0,
            sprite_priority: 0,
            sprite_multicolour: 0,
            sprite_double_width: 0,
            sprite_double_height: 0,
            sprite_extra_colours: [0; 2],
            collision_sprite: Cell::new(0),
            collision_background: Cell::new(0),
            border_colour: 0,
            background_colours: [0; 4],
            mode: GraphicsMode::StandardChar,
            screen_enabled: false,
            beam: 0,
            pixel_steps: pixel_steps.max(1),
            frame: vec![0; FRAME_PIXELS],
            offsets: VideoOffsets::compute(0, 0),
        }
    }

    /// Current raster line.
    pub fn raster_line(&self) -> u16 {
        self.raster_line
    }

    /// Beam position within the frame.
    pub fn beam(&self) -> usize {
        self.beam
    }

    pub fn mode(&self) -> GraphicsMode {
        self.mode
    }

    pub fn screen_enabled(&self) -> bool {
        self.screen_enabled
    }

    pub fn pixel_steps(&self) -> u32 {
        self.pixel_steps
    }

    /// Frame being drawn, one colour index per beam position.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Offsets currently cached for rendering.
    pub fn offsets(&self) -> VideoOffsets {
        self.offsets
    }

    pub fn border_colour(&self) -> u8 {
        self.border_colour
    }

    pub fn background_colour(&self, index: usize) -> u8 {
        self.background_colours[index & 0x03]
    }

    pub fn interrupt_status(&self) -> u8 {
        self.interrupt_status
    }

    /// Reads register `offset` (the register file repeats every 64 bytes).
    /// Reading a collision register clears it.
    pub fn read(&self, offset: u8) -> u8 {
        let offset = offset & 0x3F;
        match offset {
            0x1E => self.collision_sprite.replace(0),
            0x1F => self.collision_background.replace(0),
            _ => self.peek(offset),
        }
    }

    /// Reads register `offset` leaving the collision latches intact.
    pub fn peek(&self, offset: u8) -> u8 {
        let offset = offset & 0x3F;

        match offset {
            0x00..=0x0F => {
                let sprite = &self.sprites[(offset >> 1) as usize];
                if offset & 0x01 == 0 {
                    (sprite.x & 0xFF) as u8
                } else {
                    sprite.y
                }
            }
            0x10 => self
                .sprites
                .iter()
                .enumerate()
                .fold(0, |value, (i, s)| bit_set(value, i as u8, s.x & 0x100 != 0)),
            0x11 => bit_set(self.cr1, 7, self.raster_line & 0x100 != 0),
            0x12 => (self.raster_line & 0xFF) as u8,
            // Light pen is not supported
            0x13 | 0x14 => 0,
            0x15 => self.sprite_enable,
            0x16 => self.cr2,
            0x17 => self.sprite_double_height,
            0x18 => self.memory_setup,
            0x19 => {
                let mut value = self.interrupt_status & 0x0F;
                if value != 0 {
                    value |= IRQ_ANY;
                }
                value | 0x70
            }
            0x1A => self.interrupt_control,
            0x1B => self.sprite_priority,
            0x1C => self.sprite_multicolour,
            0x1D => self.sprite_double_width,
            0x1E => self.collision_sprite.get(),
            0x1F => self.collision_background.get(),
            0x20 => self.border_colour,
            0x21..=0x24 => self.background_colours[(offset - 0x21) as usize],
            0x25 | 0x26 => self.sprite_extra_colours[(offset - 0x25) as usize],
            0x27..=0x2E => self.sprites[(offset - 0x27) as usize].colour,
            _ => 0,
        }
    }

    /// Writes register `offset` (the register file repeats every 64 bytes).
    pub fn write(&mut self, offset: u8, value: u8) {
        let offset = offset & 0x3F;

        match offset {
            0x00..=0x0F => {
                let sprite = &mut self.sprites[(offset >> 1) as usize];
                if offset & 0x01 == 0 {
                    sprite.x = (sprite.x & 0x100) | value as u16;
                } else {
                    sprite.y = value;
                }
            }
            0x10 => {
                for (i, sprite) in self.sprites.iter_mut().enumerate() {
                    sprite.x = (sprite.x & 0xFF) | ((bit_get(value, i as u8) as u16) << 8);
                }
            }
            0x11 => {
                self.cr1 = value;
                self.raster_compare =
                    (self.raster_compare & 0xFF) | ((bit_get(value, 7) as u16) << 8);
                self.update_video_settings();
            }
            0x12 => self.raster_compare = (self.raster_compare & 0x100) | value as u16,
            0x13 | 0x14 => {}
            0x15 => self.sprite_enable = value,
            0x16 => {
                self.cr2 = value;
                self.update_video_settings();
            }
            0x17 => self.sprite_double_height = value,
            0x18 => self.memory_setup = value,
            0x19 => {
                // Acknowledge the given interrupts
                self.interrupt_status &= !(value & 0x0F);
                if self.interrupt_status & 0x0F == 0 {
                    self.interrupt_status = 0;
                }
            }
            0x1A => self.interrupt_control = value & 0x0F,
            0x1B => self.sprite_priority = value,
            0x1C => self.sprite_multicolour = value,
            0x1D => self.sprite_double_width = value,
            // Collision latches are read-only
            0x1E | 0x1F => {}
            0x20 => self.border_colour = value & 0x0F,
            0x21..=0x24 => self.background_colours[(offset - 0x21) as usize] = value & 0x0F,
            0x25 | 0x26 => self.sprite_extra_colours[(offset - 0x25) as usize] = value & 0x0F,
            0x27..=0x2E => self.sprites[(offset - 0x27) as usize].colour = value & 0x0F,
            _ => {}
        }
    }

    /// Changes the mode depending on the cr1 and cr2 registers.
    fn update_video_settings(&mut self) {
        self.screen_enabled = bit_test(self.cr1, 4);

        let mode = GraphicsMode::from_bits(
            bit_test(self.cr1, 6),
            bit_test(self.cr1, 5),
            bit_test(self.cr2, 4),
        );
        if mode != self.mode {
            log::debug!("VIC-II graphics mode {:?}", mode);
            self.mode = mode;
        }
    }

    /// Recomputes the cached offsets if the memory setup or bank moved.
    fn refresh_offsets(&mut self, bank: u8) {
        if self.offsets.memory_setup != self.memory_setup || self.offsets.bank != bank {
            self.offsets = VideoOffsets::compute(self.memory_setup, bank);
            log::debug!(
                "VIC-II bank {} screen ${:04X} chars ${:04X} bitmap ${:04X}",
                bank,
                self.offsets.screen,
                self.offsets.chars,
                self.offsets.bitmap
            );
        }
    }

    /// Advances the beam by the configured step count.
    ///
    /// Returns true when the CPU IRQ line must be raised: on a raster line
    /// match, on a new collision with its interrupt enabled, or on every call
    /// while an earlier interrupt is still unacknowledged.
    pub fn cycle(&mut self, mem: &VideoMemory, sink: &mut dyn VideoSink) -> bool {
        if self.interrupt_status & IRQ_ANY != 0 {
            return true;
        }

        self.refresh_offsets(mem.bank);

        for _ in 0..self.pixel_steps {
            let raise = self.plot(mem);

            self.beam += 1;
            if self.beam >= FRAME_PIXELS {
                sink.write_frame(&self.frame);
                self.beam = 0;
            }

            if self.beam % FRAME_WIDTH == 0 {
                self.raster_line = (self.beam / FRAME_WIDTH) as u16;
                self.raster_matched = false;
            }

            // Compare on every step; latch at most once per line
            if !self.raster_matched && self.raster_line == self.raster_compare {
                self.raster_matched = true;
                self.raise(IRQ_RASTER);
            }

            if raise || self.interrupt_status & IRQ_ANY != 0 {
                return true;
            }
        }

        false
    }

    /// Latches interrupt source `bit`; flags the CPU if it is enabled.
    fn raise(&mut self, bit: u8) {
        self.interrupt_status |= bit;
        if self.interrupt_control & bit != 0 {
            self.interrupt_status |= IRQ_ANY;
        }
    }

    /// Colours the beam's current position. Returns true if a collision
    /// interrupt fired.
    fn plot(&mut self, mem: &VideoMemory) -> bool {
        let x = self.beam % FRAME_WIDTH;
        let y = self.beam / FRAME_WIDTH;

        if x < VISIBLE_X.0 || x > VISIBLE_X.1 || y < VISIBLE_Y.0 || y > VISIBLE_Y.1 {
            // HBLANK or VBLANK
            return false;
        }

        let (wx, wy) = (x - VISIBLE_X.0, y - VISIBLE_Y.0);
        let inside = (BORDER..BORDER + SCREEN_WIDTH).contains(&wx)
            && (BORDER..BORDER + SCREEN_HEIGHT).contains(&wy);

        if !inside || !self.screen_enabled {
            self.frame[self.beam] = self.border_colour;
            return false;
        }

        let (sx, sy) = (wx - BORDER, wy - BORDER);
        let background = self.background_pixel(mem, sx, sy);
        let (pixel, collisions) = self.composite_sprites(mem, sx, sy, background);
        self.frame[self.beam] = pixel.colour;
        self.latch_collisions(collisions)
    }

    /// Folds a pixel's collisions into the latches. Returns true if a newly
    /// latched collision has its interrupt enabled.
    fn latch_collisions(&mut self, collisions: sprites::Collisions) -> bool {
        let mut raise = false;

        if collisions.sprites != 0 {
            let before = self.collision_sprite.get();
            self.collision_sprite.set(before | collisions.sprites);
            if before == 0 {
                self.raise(IRQ_SPRITE_SPRITE);
                raise |= self.interrupt_status & IRQ_ANY != 0;
            }
        }

        if collisions.background != 0 {
            let before = self.collision_background.get();
            self.collision_background
                .set(before | collisions.background);
            if before == 0 {
                self.raise(IRQ_SPRITE_BACKGROUND);
                raise |= self.interrupt_status & IRQ_ANY != 0;
            }
        }

        raise
    }
}

impl Default for Vic2 {
    fn default() -> Self {
        Self::new()
    }
}
