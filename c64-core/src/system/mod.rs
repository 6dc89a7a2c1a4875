//! C64 system integration: banked memory and the machine that drives it.
//!
//! This module provides the top-level [`Machine`] that coordinates the CPU,
//! the VIC-II and both CIAs through the banked [`Memory`].

pub mod banks;
pub mod machine;
pub mod memory;

pub use banks::BankMode;
pub use machine::{Machine, StepOutcome, TestVerdict, BASIC_READY};
pub use memory::{Memory, WriteMode};
