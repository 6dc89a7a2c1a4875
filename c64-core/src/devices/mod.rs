//! C64-specific hardware devices.
//!
//! Each device emulates a specific chip from the Commodore 64:
//!
//! - [`Vic2`]: MOS 6569 Video Interface Chip (graphics, sprites, raster)
//! - [`Cia`]: MOS 6526 Complex Interface Adapter (timers, I/O, keyboard)
//!
//! Chips never hold references to the CPU or to each other. They report
//! interrupt requests as return values and the [`Machine`](crate::Machine)
//! forwards them.

pub mod cia;
pub mod clock;
pub mod vic_ii;

pub use cia::{Cia, CiaRole};
pub use clock::{Clock, ManualClock, SystemClock, Throttle};
pub use vic_ii::{GraphicsMode, Vic2, VideoMemory};
