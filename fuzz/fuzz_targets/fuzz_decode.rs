//! Fuzz target for the one-instruction decoder.
//!
//! Decodes a linear sweep over arbitrary bytes and checks that sizes,
//! addresses and operand counts stay consistent.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mos6510::disassembler::decode;
use mos6510::FlatMemory;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    start: u16,
    include_illegal: bool,
    bytes: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    if input.bytes.len() > 4096 {
        return;
    }

    let mut memory = FlatMemory::new();
    memory.load(input.start, &input.bytes);

    let mut address = input.start;
    let mut covered = 0usize;
    while covered < input.bytes.len() {
        let instruction = decode(&memory, address, input.include_illegal);

        assert_eq!(instruction.address, address);
        assert!((1..=3).contains(&instruction.size_bytes));
        assert_eq!(
            instruction.operand_bytes.len(),
            instruction.size_bytes as usize - 1
        );
        assert!(!instruction.to_string().is_empty());

        covered += instruction.size_bytes as usize;
        address = address.wrapping_add(instruction.size_bytes as u16);
    }
});
