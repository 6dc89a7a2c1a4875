//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry
//! - SBC: Subtract with Carry
//! - AND, ORA, EOR: Bitwise logic
//! - CMP, CPX, CPY: Register comparisons
//! - BIT: Bit test
//!
//! ADC and SBC honour the decimal flag with NMOS semantics. In decimal mode
//! the Z flag still reflects the binary result, and N and V come from the
//! intermediate value before the high-nibble correction.

use crate::addressing::AddressingMode;
use crate::{Cpu, MemoryBus};

/// Adds `value` and the carry flag to the accumulator.
pub(crate) fn add_with_carry<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) {
    let a = cpu.a as u16;
    let m = value as u16;
    let carry = cpu.flag_c as u16;

    if cpu.flag_d {
        let mut sum = (a & 0x0F) + (m & 0x0F) + carry;
        if sum > 0x09 {
            sum += 0x06;
        }
        sum = if sum <= 0x0F {
            (sum & 0x0F) + (a & 0xF0) + (m & 0xF0)
        } else {
            (sum & 0x0F) + (a & 0xF0) + (m & 0xF0) + 0x10
        };

        cpu.flag_z = (a + m + carry) & 0xFF == 0;
        cpu.flag_n = sum & 0x80 != 0;
        cpu.flag_v = (a ^ sum) & 0x80 != 0 && (a ^ m) & 0x80 == 0;

        if sum & 0x1F0 > 0x90 {
            sum += 0x60;
        }
        cpu.flag_c = sum & 0xFF0 > 0xF0;
        cpu.a = (sum & 0xFF) as u8;
    } else {
        let sum = a + m + carry;
        let result = (sum & 0xFF) as u8;

        cpu.flag_c = sum > 0xFF;
        cpu.flag_v = (a ^ m) & 0x80 == 0 && (a ^ sum) & 0x80 != 0;
        cpu.set_nz(result);
        cpu.a = result;
    }
}

/// Subtracts `value` and the inverted carry flag from the accumulator.
pub(crate) fn subtract_with_borrow<M: MemoryBus>(cpu: &mut Cpu<M>, value: u8) {
    let a = cpu.a as i32;
    let m = value as i32;
    let borrow = (!cpu.flag_c) as i32;

    // Flags always come from the binary difference
    let difference = (a - m - borrow) & 0xFFFF;
    cpu.flag_c = difference <= 0xFF;
    cpu.flag_v = (a ^ difference) & 0x80 != 0 && (a ^ m) & 0x80 != 0;
    cpu.set_nz((difference & 0xFF) as u8);

    if cpu.flag_d {
        let low = ((a & 0x0F) - (m & 0x0F) - borrow) & 0xFFFF;
        let mut result = if low & 0x10 != 0 {
            ((low - 0x06) & 0x0F) | ((a & 0xF0) - (m & 0xF0) - 0x10)
        } else {
            (low & 0x0F) | ((a & 0xF0) - (m & 0xF0))
        };
        if result & 0x100 != 0 {
            result -= 0x60;
        }
        cpu.a = (result & 0xFF) as u8;
    } else {
        cpu.a = (difference & 0xFF) as u8;
    }
}

/// Sets C, Z and N as if `rhs` were subtracted from `lhs`.
pub(crate) fn compare<M: MemoryBus>(cpu: &mut Cpu<M>, lhs: u8, rhs: u8) {
    cpu.flag_c = lhs >= rhs;
    cpu.set_nz(lhs.wrapping_sub(rhs));
}

/// Executes the ADC (Add with Carry) instruction.
pub(crate) fn adc<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    add_with_carry(cpu, operand.value);
}

/// Executes the SBC (Subtract with Carry) instruction.
pub(crate) fn sbc<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    subtract_with_borrow(cpu, operand.value);
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn and<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    cpu.a &= operand.value;
    cpu.set_nz(cpu.a);
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn ora<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    cpu.a |= operand.value;
    cpu.set_nz(cpu.a);
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn eor<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    cpu.a ^= operand.value;
    cpu.set_nz(cpu.a);
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn cmp<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    let register = cpu.a;
    compare(cpu, register, operand.value);
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn cpx<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    let register = cpu.x;
    compare(cpu, register, operand.value);
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn cpy<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    let register = cpu.y;
    compare(cpu, register, operand.value);
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z reflects `A & M`; N and V are copied from bits 7 and 6 of the operand.
/// The accumulator is left unchanged.
pub(crate) fn bit<M: MemoryBus>(cpu: &mut Cpu<M>, mode: AddressingMode) {
    let operand = cpu.fetch_read(mode);
    cpu.flag_z = cpu.a & operand.value == 0;
    cpu.flag_v = operand.value & 0x40 != 0;
    cpu.flag_n = operand.value & 0x80 != 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlatMemory;

    fn cpu() -> Cpu<FlatMemory> {
        Cpu::new(FlatMemory::new())
    }

    #[test]
    fn test_binary_add_overflow() {
        let mut cpu = cpu();
        cpu.a = 0x50;
        add_with_carry(&mut cpu, 0x50);

        assert_eq!(cpu.a, 0xA0);
        assert!(cpu.flag_v);
        assert!(cpu.flag_n);
        assert!(!cpu.flag_c);
        assert!(!cpu.flag_z);
    }

    #[test]
    fn test_binary_add_carry_out() {
        let mut cpu = cpu();
        cpu.a = 0xFF;
        cpu.flag_c = true;
        add_with_carry(&mut cpu, 0x00);

        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flag_c);
        assert!(cpu.flag_z);
        assert!(!cpu.flag_v);
    }

    #[test]
    fn test_decimal_add() {
        let mut cpu = cpu();
        cpu.flag_d = true;
        cpu.a = 0x05;
        add_with_carry(&mut cpu, 0x05);

        assert_eq!(cpu.a, 0x10);
        assert!(!cpu.flag_c);
        assert!(!cpu.flag_z);
    }

    #[test]
    fn test_decimal_add_carry_out() {
        let mut cpu = cpu();
        cpu.flag_d = true;
        cpu.a = 0x99;
        add_with_carry(&mut cpu, 0x01);

        assert_eq!(cpu.a, 0x00);
        assert!(cpu.flag_c);
        // Z follows the binary sum 0x9A
        assert!(!cpu.flag_z);
    }

    #[test]
    fn test_decimal_add_every_bcd_pair() {
        let mut cpu = cpu();
        cpu.flag_d = true;
        for x in 0..100u8 {
            for y in 0..100u8 {
                for carry in [false, true] {
                    cpu.a = crate::bits::dec2bcd(x);
                    cpu.flag_c = carry;
                    add_with_carry(&mut cpu, crate::bits::dec2bcd(y));

                    let expected = x as u16 + y as u16 + carry as u16;
                    assert_eq!(cpu.a, crate::bits::dec2bcd((expected % 100) as u8));
                    assert_eq!(cpu.flag_c, expected > 99);
                }
            }
        }
    }

    #[test]
    fn test_binary_subtract() {
        let mut cpu = cpu();
        cpu.a = 0x50;
        cpu.flag_c = true;
        subtract_with_borrow(&mut cpu, 0xB0);

        assert_eq!(cpu.a, 0xA0);
        assert!(!cpu.flag_c);
        assert!(cpu.flag_v);
        assert!(cpu.flag_n);
    }

    #[test]
    fn test_binary_subtract_with_borrow_in() {
        let mut cpu = cpu();
        cpu.a = 0x10;
        cpu.flag_c = false;
        subtract_with_borrow(&mut cpu, 0x10);

        assert_eq!(cpu.a, 0xFF);
        assert!(!cpu.flag_c);
        assert!(cpu.flag_n);
    }

    #[test]
    fn test_decimal_subtract_every_bcd_pair() {
        let mut cpu = cpu();
        cpu.flag_d = true;
        for x in 0..100u8 {
            for y in 0..100u8 {
                for carry in [false, true] {
                    cpu.a = crate::bits::dec2bcd(x);
                    cpu.flag_c = carry;
                    subtract_with_borrow(&mut cpu, crate::bits::dec2bcd(y));

                    let borrow = (!carry) as i16;
                    let expected = x as i16 - y as i16 - borrow;
                    assert_eq!(
                        cpu.a,
                        crate::bits::dec2bcd(expected.rem_euclid(100) as u8)
                    );
                    assert_eq!(cpu.flag_c, expected >= 0);
                }
            }
        }
    }

    #[test]
    fn test_compare_flags() {
        let mut cpu = cpu();

        compare(&mut cpu, 0x40, 0x40);
        assert!(cpu.flag_c && cpu.flag_z && !cpu.flag_n);

        compare(&mut cpu, 0x40, 0x41);
        assert!(!cpu.flag_c && !cpu.flag_z && cpu.flag_n);

        compare(&mut cpu, 0x41, 0x40);
        assert!(cpu.flag_c && !cpu.flag_z && !cpu.flag_n);
    }
}
