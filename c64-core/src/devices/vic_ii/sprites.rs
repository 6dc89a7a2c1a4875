//! Sprite compositing.
//!
//! Sprites are 24 × 21 pixels, 3 bytes per row. Sprite `n` takes its shape
//! from `bank + pointer * 64`, where the pointer byte sits at
//! `screen + 0x3F8 + n`. Sprites are drawn from 7 down to 0 so sprite 0 ends
//! up on top.

use mos6510::bits::bit_test;

use super::graphics::pair;
use super::{Pixel, Vic2, VideoMemory};

const SPRITE_WIDTH: i32 = 24;
const SPRITE_HEIGHT: i32 = 21;

/// Sprite coordinates of the top-left screen pixel.
const SCREEN_ORIGIN_X: i32 = 24;
const SCREEN_ORIGIN_Y: i32 = 50;

/// Offset of the sprite pointers from the start of screen memory.
const POINTER_OFFSET: u16 = 0x3F8;

/// Sprites overlapping at one pixel, as bit masks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Collisions {
    pub sprites: u8,
    pub background: u8,
}

impl Vic2 {
    /// Draws all enabled sprites over `background` at screen pixel
    /// (`x`, `y`).
    pub(super) fn composite_sprites(
        &self,
        mem: &VideoMemory,
        x: usize,
        y: usize,
        background: Pixel,
    ) -> (Pixel, Collisions) {
        if self.sprite_enable == 0 {
            return (background, Collisions::default());
        }

        let vx = x as i32 + SCREEN_ORIGIN_X;
        let vy = y as i32 + SCREEN_ORIGIN_Y;

        let mut pixel = background;
        let mut covered = 0u8;

        for n in (0..8u8).rev() {
            if !bit_test(self.sprite_enable, n) {
                continue;
            }
            let Some(colour) = self.sprite_colour(mem, n, vx, vy) else {
                continue;
            };

            covered |= 1 << n;

            // Behind-background sprites only cover background colour 0
            if bit_test(self.sprite_priority, n) && !self.shows_behind(background) {
                continue;
            }
            pixel = Pixel::foreground(colour);
        }

        let collisions = Collisions {
            sprites: if covered.count_ones() > 1 { covered } else { 0 },
            background: if background.foreground { covered } else { 0 },
        };

        (pixel, collisions)
    }

    /// True where a behind-background sprite may draw over `background`.
    fn shows_behind(&self, background: Pixel) -> bool {
        !background.foreground && background.colour == self.background_colours[0]
    }

    /// Colour of sprite `n` at sprite coordinates (`vx`, `vy`), or `None`
    /// where it is transparent or absent.
    fn sprite_colour(&self, mem: &VideoMemory, n: u8, vx: i32, vy: i32) -> Option<u8> {
        let sprite = &self.sprites[n as usize];

        let mut dx = vx - sprite.x as i32;
        let mut dy = vy - sprite.y as i32;
        if dx < 0 || dy < 0 {
            return None;
        }

        if bit_test(self.sprite_double_width, n) {
            dx /= 2;
        }
        if bit_test(self.sprite_double_height, n) {
            dy /= 2;
        }
        if dx >= SPRITE_WIDTH || dy >= SPRITE_HEIGHT {
            return None;
        }

        let pointer = mem.read(self.offsets.screen + POINTER_OFFSET + n as u16);
        let shape = mem.bank_base() + pointer as u16 * 64;
        let data = mem.read(shape + (dy * 3 + dx / 8) as u16);

        if bit_test(self.sprite_multicolour, n) {
            match pair(data, dx as usize) {
                0b00 => None,
                0b01 => Some(self.sprite_extra_colours[0]),
                0b10 => Some(sprite.colour),
                _ => Some(self.sprite_extra_colours[1]),
            }
        } else if bit_test(data, 7 - (dx % 8) as u8) {
            Some(sprite.colour)
        } else {
            None
        }
    }
}
