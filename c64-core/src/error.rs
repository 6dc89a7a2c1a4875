//! Error types.
//!
//! Only setup work can fail: reading ROM, RAM and program images, waiting for
//! the BASIC prompt, and parsing disk images. Emulated hardware never errors.

use std::fmt;
use std::path::PathBuf;

/// Failure loading an image file into memory.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file ends before the requested byte range.
    TooShort {
        path: PathBuf,
        needed: usize,
        actual: usize,
    },
    /// A program image has no room for its two-byte load address.
    EmptyProgram,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            LoadError::TooShort {
                path,
                needed,
                actual,
            } => write!(
                f,
                "{} is too short: need {} bytes, found {}",
                path.display(),
                needed,
                actual
            ),
            LoadError::EmptyProgram => write!(f, "program image has no load address"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure driving the machine.
#[derive(Debug)]
pub enum MachineError {
    /// An image could not be loaded.
    Load(LoadError),
    /// The BASIC prompt was not reached within the configured cycle budget.
    BootTimeout { cycles: u64 },
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MachineError::Load(e) => write!(f, "{}", e),
            MachineError::BootTimeout { cycles } => {
                write!(f, "BASIC prompt not reached after {} cycles", cycles)
            }
        }
    }
}

impl std::error::Error for MachineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MachineError::Load(e) => Some(e),
            MachineError::BootTimeout { .. } => None,
        }
    }
}

impl From<LoadError> for MachineError {
    fn from(e: LoadError) -> Self {
        MachineError::Load(e)
    }
}

/// Failure reading a D64 disk image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum D64Error {
    /// The image size matches neither 35 nor 40 tracks.
    InvalidSize(usize),
    /// Track number outside the image.
    InvalidTrack(u8),
    /// Sector number outside the track.
    InvalidSector { track: u8, sector: u8 },
    /// A sector chain visits the same sector twice.
    ChainLoop { track: u8, sector: u8 },
}

impl fmt::Display for D64Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            D64Error::InvalidSize(size) => write!(f, "invalid D64 image size: {} bytes", size),
            D64Error::InvalidTrack(track) => write!(f, "invalid track: {}", track),
            D64Error::InvalidSector { track, sector } => {
                write!(f, "invalid sector {} on track {}", sector, track)
            }
            D64Error::ChainLoop { track, sector } => {
                write!(f, "sector chain loops at {}/{}", track, sector)
            }
        }
    }
}

impl std::error::Error for D64Error {}
