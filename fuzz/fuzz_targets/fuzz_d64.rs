//! Fuzz target for the D64 reader.
//!
//! Patches arbitrary sectors into a blank 35-track image, then lists the
//! directory and follows every file chain. Malformed links must surface as
//! errors, never as panics or endless loops.

#![no_main]

use arbitrary::Arbitrary;
use c64_core::D64Image;
use libfuzzer_sys::fuzz_target;

const IMAGE_SIZE: usize = 174_848;

#[derive(Debug, Arbitrary)]
struct Patch {
    sector_index: u16,
    contents: Vec<u8>,
}

fuzz_target!(|patches: Vec<Patch>| {
    let mut data = vec![0u8; IMAGE_SIZE];
    for patch in patches.iter().take(64) {
        let start = (patch.sector_index as usize % (IMAGE_SIZE / 256)) * 256;
        let len = patch.contents.len().min(256);
        data[start..start + len].copy_from_slice(&patch.contents[..len]);
    }

    let Ok(image) = D64Image::from_bytes(&data) else {
        return;
    };

    if let Ok(directory) = image.directory() {
        for entry in &directory.entries {
            let _ = image.read_file(entry.track, entry.sector);
        }
    }
});
