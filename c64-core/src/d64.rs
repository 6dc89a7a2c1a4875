//! D64 disk image reader.
//!
//! ## D64 File Format
//!
//! A D64 image is a plain dump of a 1541 disk, 256 bytes per sector, with
//! fewer sectors on the shorter outer tracks:
//! - Tracks 1-17:  21 sectors each
//! - Tracks 18-24: 19 sectors each
//! - Tracks 25-30: 18 sectors each
//! - Tracks 31-40: 17 sectors each
//!
//! Standard images have 35 tracks (174,848 bytes), extended ones 40
//! (196,608 bytes). Either may carry one trailing error byte per sector.
//!
//! Track 18 holds the BAM (sector 0) and the directory chain (from sector 1).
//! Files are chains of sectors: bytes 0/1 link to the next track/sector, and
//! a zero track marks the last sector, whose byte 1 is the index of its last
//! used byte.

use std::collections::HashSet;
use std::fmt;

use crate::error::D64Error;

/// Bytes per sector.
pub const SECTOR_SIZE: usize = 256;

/// Directory track number
pub const DIRECTORY_TRACK: u8 = 18;

/// First directory sector
pub const DIRECTORY_FIRST_SECTOR: u8 = 1;

/// BAM sector (Block Availability Map)
pub const BAM_SECTOR: u8 = 0;

/// Directory entries per sector.
const ENTRIES_PER_SECTOR: usize = 8;
const ENTRY_SIZE: usize = 32;

/// Shifted space, used to pad names.
const PADDING: u8 = 0xA0;

/// Sectors per track, by track number.
fn sectors_in_track(track: u8) -> u8 {
    match track {
        1..=17 => 21,
        18..=24 => 19,
        25..=30 => 18,
        _ => 17,
    }
}

/// Sectors on a disk of `tracks` tracks.
fn total_sectors(tracks: u8) -> usize {
    (1..=tracks).map(|t| sectors_in_track(t) as usize).sum()
}

/// CBM DOS file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Del,
    Seq,
    Prg,
    Usr,
    Rel,
    Unknown(u8),
}

impl FileType {
    fn from_byte(value: u8) -> Self {
        match value & 0x0F {
            0 => FileType::Del,
            1 => FileType::Seq,
            2 => FileType::Prg,
            3 => FileType::Usr,
            4 => FileType::Rel,
            other => FileType::Unknown(other),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FileType::Del => "DEL",
            FileType::Seq => "SEQ",
            FileType::Prg => "PRG",
            FileType::Usr => "USR",
            FileType::Rel => "REL",
            FileType::Unknown(_) => "???",
        };
        f.write_str(name)
    }
}

/// One directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub file_type: FileType,
    /// File was closed properly (unset marks a "splat" file).
    pub closed: bool,
    pub locked: bool,
    pub track: u8,
    pub sector: u8,
    /// Size in blocks.
    pub blocks: u16,
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let quoted = format!("\"{}\"", self.name);
        write!(
            f,
            "{:<4} {:<18} {}{}{} ({:02}/{:02})",
            self.blocks,
            quoted,
            if self.closed { ' ' } else { '*' },
            self.file_type,
            if self.locked { '<' } else { ' ' },
            self.track,
            self.sector
        )
    }
}

/// Disk header plus all directory entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub name: String,
    pub id: [u8; 2],
    pub entries: Vec<DirEntry>,
    pub blocks_free: u16,
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let quoted = format!("\"{}\"", self.name);
        writeln!(
            f,
            "0 {:<18} {}{}",
            quoted,
            petscii_to_ascii(self.id[0]),
            petscii_to_ascii(self.id[1])
        )?;
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        write!(f, "{} BLOCKS FREE.", self.blocks_free)
    }
}

/// D64 disk image representation.
#[derive(Clone)]
pub struct D64Image {
    /// Raw disk data without the error bytes.
    data: Box<[u8]>,
    tracks: u8,
}

impl D64Image {
    /// Parses a raw image.
    ///
    /// # Errors
    /// Returns an error if the data size matches no known layout.
    pub fn from_bytes(data: &[u8]) -> Result<Self, D64Error> {
        for tracks in [35u8, 40] {
            let sectors = total_sectors(tracks);
            let size = sectors * SECTOR_SIZE;
            if data.len() == size || data.len() == size + sectors {
                return Ok(Self {
                    data: data[..size].to_vec().into_boxed_slice(),
                    tracks,
                });
            }
        }
        Err(D64Error::InvalidSize(data.len()))
    }

    /// Number of tracks (35 or 40).
    pub fn tracks(&self) -> u8 {
        self.tracks
    }

    /// Calculate the byte offset for a given track and sector.
    ///
    /// Tracks are 1-indexed, sectors are 0-indexed.
    fn sector_offset(&self, track: u8, sector: u8) -> Result<usize, D64Error> {
        if !(1..=self.tracks).contains(&track) {
            return Err(D64Error::InvalidTrack(track));
        }
        if sector >= sectors_in_track(track) {
            return Err(D64Error::InvalidSector { track, sector });
        }
        Ok((total_sectors(track - 1) + sector as usize) * SECTOR_SIZE)
    }

    /// Read a sector from the disk image.
    pub fn read_sector(&self, track: u8, sector: u8) -> Result<&[u8], D64Error> {
        let offset = self.sector_offset(track, sector)?;
        Ok(&self.data[offset..offset + SECTOR_SIZE])
    }

    /// Walks a sector chain, calling `visit` with every sector.
    fn walk_chain<F>(&self, track: u8, sector: u8, mut visit: F) -> Result<(), D64Error>
    where
        F: FnMut(&[u8]),
    {
        let mut seen = HashSet::new();
        let (mut track, mut sector) = (track, sector);

        while track != 0 {
            if !seen.insert((track, sector)) {
                return Err(D64Error::ChainLoop { track, sector });
            }
            let data = self.read_sector(track, sector)?;
            visit(data);
            track = data[0];
            sector = data[1];
        }
        Ok(())
    }

    /// Reads the disk header and the directory chain.
    pub fn directory(&self) -> Result<Directory, D64Error> {
        let bam = self.read_sector(DIRECTORY_TRACK, BAM_SECTOR)?;
        let name = padded_name(&bam[0x90..0xA0]);
        let id = [bam[0xA2], bam[0xA3]];
        let blocks_free = (1..=35u8)
            .filter(|&t| t != DIRECTORY_TRACK)
            .map(|t| bam[4 * t as usize] as u16)
            .sum();

        let mut entries = Vec::new();
        self.walk_chain(DIRECTORY_TRACK, DIRECTORY_FIRST_SECTOR, |data| {
            for slot in data.chunks_exact(ENTRY_SIZE).take(ENTRIES_PER_SECTOR) {
                if slot[2] == 0 {
                    continue;
                }
                entries.push(DirEntry {
                    name: padded_name(&slot[0x05..0x15]),
                    file_type: FileType::from_byte(slot[2]),
                    closed: slot[2] & 0x80 != 0,
                    locked: slot[2] & 0x40 != 0,
                    track: slot[3],
                    sector: slot[4],
                    blocks: u16::from_le_bytes([slot[30], slot[31]]),
                });
            }
        })?;

        Ok(Directory {
            name,
            id,
            entries,
            blocks_free,
        })
    }

    /// Reads the file whose chain starts at `track`/`sector`.
    ///
    /// For a PRG file the first two bytes are its load address.
    pub fn read_file(&self, track: u8, sector: u8) -> Result<Vec<u8>, D64Error> {
        let mut contents = Vec::new();
        self.walk_chain(track, sector, |data| {
            if data[0] == 0 {
                // Last sector: byte 1 is the index of the last used byte
                let end = (data[1] as usize + 1).max(2);
                contents.extend_from_slice(&data[2..end]);
            } else {
                contents.extend_from_slice(&data[2..]);
            }
        })?;
        Ok(contents)
    }

    /// Looks up a directory entry by name.
    pub fn find(&self, name: &str) -> Result<Option<DirEntry>, D64Error> {
        let wanted = name.to_uppercase();
        Ok(self
            .directory()?
            .entries
            .into_iter()
            .find(|entry| entry.name == wanted))
    }
}

/// Decodes a 0xA0-padded PETSCII name.
fn padded_name(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != PADDING && b != 0)
        .map(|&b| petscii_to_ascii(b))
        .collect()
}

/// Convert PETSCII character to ASCII.
fn petscii_to_ascii(c: u8) -> char {
    match c {
        0x20..=0x5F => c as char,
        0x61..=0x7A => (c - 0x20) as char,
        0xC1..=0xDA => (c - 0x80) as char,
        0x00..=0x1F | 0x80..=0x9F | 0xA0 => ' ',
        _ => '?',
    }
}
