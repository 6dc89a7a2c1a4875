//! Background graphics: the five display modes.
//!
//! Each resolver maps a screen pixel (0-319, 0-199) to a colour index, and
//! reports whether the pixel is foreground so sprite priority and collision
//! detection can use it.

use mos6510::bits::bit_test;

use super::{Pixel, Vic2, VideoMemory};

/// Number of character columns on screen.
const CHAR_COLUMNS: usize = 40;

/// Height of each character in pixels.
const CHAR_HEIGHT: usize = 8;

/// Display mode selected by the ECM, BMM and MCM bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsMode {
    StandardChar,
    MulticolourChar,
    StandardBitmap,
    MulticolourBitmap,
    ExtendedBackground,
    /// ECM together with BMM or MCM. Renders black.
    Invalid,
}

impl GraphicsMode {
    pub fn from_bits(ecm: bool, bmm: bool, mcm: bool) -> Self {
        match (ecm, bmm, mcm) {
            (false, false, false) => GraphicsMode::StandardChar,
            (false, false, true) => GraphicsMode::MulticolourChar,
            (false, true, false) => GraphicsMode::StandardBitmap,
            (false, true, true) => GraphicsMode::MulticolourBitmap,
            (true, false, false) => GraphicsMode::ExtendedBackground,
            _ => GraphicsMode::Invalid,
        }
    }
}

/// Screen cell index and the pixel's row within it.
fn cell(x: usize, y: usize) -> (u16, u16) {
    (
        ((y / CHAR_HEIGHT) * CHAR_COLUMNS + x / 8) as u16,
        (y % CHAR_HEIGHT) as u16,
    )
}

/// Two-bit value of the pixel pair holding column `x`.
pub(super) fn pair(pattern: u8, x: usize) -> u8 {
    (pattern >> (6 - ((x % 8) & 0x06))) & 0x03
}

impl Vic2 {
    /// Resolves the background graphics at screen pixel (`x`, `y`).
    pub(super) fn background_pixel(&self, mem: &VideoMemory, x: usize, y: usize) -> Pixel {
        match self.mode {
            GraphicsMode::StandardChar => self.standard_char(mem, x, y),
            GraphicsMode::MulticolourChar => self.multicolour_char(mem, x, y),
            GraphicsMode::StandardBitmap => self.standard_bitmap(mem, x, y),
            GraphicsMode::MulticolourBitmap => self.multicolour_bitmap(mem, x, y),
            GraphicsMode::ExtendedBackground => self.extended_background(mem, x, y),
            GraphicsMode::Invalid => Pixel::background(0),
        }
    }

    /// Character code and pattern row for the cell under (`x`, `y`).
    fn char_row(&self, mem: &VideoMemory, x: usize, y: usize, code_mask: u8) -> (u8, u8, u16) {
        let (index, line) = cell(x, y);
        let code = mem.read(self.offsets.screen + index);
        let pattern = mem.read(self.offsets.chars + (code & code_mask) as u16 * 8 + line);
        (code, pattern, index)
    }

    fn standard_char(&self, mem: &VideoMemory, x: usize, y: usize) -> Pixel {
        let (_, pattern, index) = self.char_row(mem, x, y, 0xFF);

        if bit_test(pattern, 7 - (x % 8) as u8) {
            Pixel::foreground(mem.colour(index))
        } else {
            Pixel::background(self.background_colours[0])
        }
    }

    /// Multicolour text: characters with colour RAM bit 3 clear fall back to
    /// hires rendering in the low 8 colours.
    fn multicolour_char(&self, mem: &VideoMemory, x: usize, y: usize) -> Pixel {
        let (_, pattern, index) = self.char_row(mem, x, y, 0xFF);
        let colour = mem.colour(index);

        if !bit_test(colour, 3) {
            return if bit_test(pattern, 7 - (x % 8) as u8) {
                Pixel::foreground(colour & 0x07)
            } else {
                Pixel::background(self.background_colours[0])
            };
        }

        match pair(pattern, x) {
            0b00 => Pixel::background(self.background_colours[0]),
            0b01 => Pixel::background(self.background_colours[1]),
            0b10 => Pixel::foreground(self.background_colours[2]),
            _ => Pixel::foreground(colour & 0x07),
        }
    }

    /// Hires bitmap: the screen byte holds the set colour in its high nibble
    /// and the clear colour in its low nibble.
    fn standard_bitmap(&self, mem: &VideoMemory, x: usize, y: usize) -> Pixel {
        let (index, line) = cell(x, y);
        let pattern = mem.read(self.offsets.bitmap + index * 8 + line);
        let colours = mem.read(self.offsets.screen + index);

        if bit_test(pattern, 7 - (x % 8) as u8) {
            Pixel::foreground(colours >> 4)
        } else {
            Pixel::background(colours & 0x0F)
        }
    }

    fn multicolour_bitmap(&self, mem: &VideoMemory, x: usize, y: usize) -> Pixel {
        let (index, line) = cell(x, y);
        let pattern = mem.read(self.offsets.bitmap + index * 8 + line);
        let colours = mem.read(self.offsets.screen + index);

        match pair(pattern, x) {
            0b00 => Pixel::background(self.background_colours[0]),
            0b01 => Pixel::background(colours >> 4),
            0b10 => Pixel::foreground(colours & 0x0F),
            _ => Pixel::foreground(mem.colour(index)),
        }
    }

    /// Extended background: the top two bits of the character code pick one
    /// of four background colours, leaving 64 characters.
    fn extended_background(&self, mem: &VideoMemory, x: usize, y: usize) -> Pixel {
        let (code, pattern, index) = self.char_row(mem, x, y, 0x3F);

        if bit_test(pattern, 7 - (x % 8) as u8) {
            Pixel::foreground(mem.colour(index))
        } else {
            Pixel::background(self.background_colours[(code >> 6) as usize])
        }
    }
}
