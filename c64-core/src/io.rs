//! Video output and keyboard/joystick input.
//!
//! The emulator core only talks to the outside world through these traits.
//! A frame is one byte per beam position (504 × 312), row-major, each byte a
//! colour index 0-15.

/// Receives rendered video.
pub trait VideoSink {
    /// Accepts a complete frame.
    fn write_frame(&mut self, frame: &[u8]);

    /// Accepts a single out-of-band pixel.
    fn write_pixel(&mut self, x: u16, y: u16, colour: u8);

    /// Turns output on or off. Sinks may ignore frames while disabled.
    fn enable_output(&mut self, _enabled: bool) {}
}

/// Currently pressed keys as matrix coordinates.
///
/// Both masks are active high: bit n of `cols` means a pressed key sits in
/// column n, bit n of `rows` means one sits in row n.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardMatrix {
    pub rows: u8,
    pub cols: u8,
}

impl KeyboardMatrix {
    /// A single pressed key at (`row`, `col`).
    pub fn key(row: u8, col: u8) -> Self {
        Self {
            rows: 1 << (row & 0x07),
            cols: 1 << (col & 0x07),
        }
    }
}

/// Supplies keyboard and joystick state.
pub trait InputSource {
    fn read_keyboard(&mut self) -> KeyboardMatrix;

    /// Joystick `port` (1 or 2) as active-high bits:
    /// 0=up, 1=down, 2=left, 3=right, 4=fire.
    fn read_joystick(&mut self, _port: u8) -> u8 {
        0
    }
}

/// Everything a [`Machine`](crate::Machine) needs from its host.
pub trait Io: VideoSink + InputSource {}

impl<T: VideoSink + InputSource> Io for T {}

/// Discards video and reports no input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIo;

impl VideoSink for NullIo {
    fn write_frame(&mut self, _frame: &[u8]) {}

    fn write_pixel(&mut self, _x: u16, _y: u16, _colour: u8) {}
}

impl InputSource for NullIo {
    fn read_keyboard(&mut self) -> KeyboardMatrix {
        KeyboardMatrix::default()
    }
}

/// Keeps the most recent frame and counts frames. Input is scripted through
/// the public fields.
#[derive(Debug, Default, Clone)]
pub struct FrameCapture {
    pub last_frame: Vec<u8>,
    pub frames: u64,
    pub pixels: Vec<(u16, u16, u8)>,
    pub keyboard: KeyboardMatrix,
    pub joysticks: [u8; 2],
    pub enabled: bool,
}

impl FrameCapture {
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Colour index at beam position (`x`, `y`) of the last frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        self.last_frame
            .get(y * crate::devices::vic_ii::FRAME_WIDTH + x)
            .copied()
    }
}

impl VideoSink for FrameCapture {
    fn write_frame(&mut self, frame: &[u8]) {
        if !self.enabled {
            return;
        }
        self.last_frame.clear();
        self.last_frame.extend_from_slice(frame);
        self.frames += 1;
    }

    fn write_pixel(&mut self, x: u16, y: u16, colour: u8) {
        self.pixels.push((x, y, colour));
    }

    fn enable_output(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl InputSource for FrameCapture {
    fn read_keyboard(&mut self) -> KeyboardMatrix {
        self.keyboard
    }

    fn read_joystick(&mut self, port: u8) -> u8 {
        match port {
            1 => self.joysticks[0],
            2 => self.joysticks[1],
            _ => 0,
        }
    }
}
