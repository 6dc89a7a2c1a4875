//! # Commodore 64 Emulator Core
//!
//! An instruction-level Commodore 64 built on the `mos6510` CPU core.
//!
//! ## Architecture
//!
//! The [`Machine`] owns a [`mos6510::Cpu`] whose bus is the banked
//! [`Memory`]. Memory in turn owns the memory-mapped chips:
//!
//! - **VIC-II** (MOS 6569): raster beam, character and bitmap modes,
//!   sprites, raster and collision interrupts
//! - **CIA 1 / CIA 2** (MOS 6526): timers, time of day, keyboard and
//!   joystick ports, VIC bank selection
//!
//! Each [`Machine::cycle`] runs one CPU instruction, then lets the CIAs and
//! the VIC-II catch up and forwards the interrupts they request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use c64_core::{Machine, MachineConfig, NullIo};
//!
//! let mut c64 = Machine::new(MachineConfig::default(), NullIo)?;
//! c64.boot(true)?;
//! c64.load_program("game.prg".as_ref(), true)?;
//! loop {
//!     c64.cycle();
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `devices`: CIA and VIC-II chips plus the clock that paces the CIAs
//! - `system`: bank tables, banked memory and the machine
//! - `d64`: read-only disk image access
//! - `debugger`: breakpoints and step commands

pub mod config;
pub mod d64;
pub mod debugger;
pub mod devices;
pub mod error;
pub mod io;
pub mod system;

pub use config::{MachineConfig, Region};
pub use d64::{D64Image, DirEntry, Directory, FileType};
pub use debugger::{Command, Debugger, StopReason};
pub use devices::{Cia, CiaRole, GraphicsMode, Vic2};
pub use error::{D64Error, LoadError, MachineError};
pub use io::{FrameCapture, InputSource, Io, KeyboardMatrix, NullIo, VideoSink};
pub use system::{Machine, Memory, StepOutcome, TestVerdict, WriteMode, BASIC_READY};
