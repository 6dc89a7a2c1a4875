//! # Bit and BCD helpers
//!
//! Small helpers shared by the CPU core and the C64 chips. Bit numbers are
//! 0 (least significant) through 7.

/// Returns true when `bit` is set in `value`.
#[inline]
pub fn bit_test(value: u8, bit: u8) -> bool {
    value & (1 << bit) != 0
}

/// Returns `value` with `bit` set or cleared.
#[inline]
pub fn bit_set(value: u8, bit: u8, on: bool) -> u8 {
    if on {
        value | (1 << bit)
    } else {
        value & !(1 << bit)
    }
}

/// Returns `bit` of `value` as 0 or 1.
#[inline]
pub fn bit_get(value: u8, bit: u8) -> u8 {
    (value >> bit) & 0x01
}

/// Encodes a decimal value (0-99) as packed BCD.
///
/// Values above 99 are reduced modulo 100.
///
/// ```
/// use mos6510::bits::dec2bcd;
///
/// assert_eq!(dec2bcd(42), 0x42);
/// assert_eq!(dec2bcd(9), 0x09);
/// ```
#[inline]
pub fn dec2bcd(value: u8) -> u8 {
    let value = value % 100;
    ((value / 10) << 4) | (value % 10)
}

/// Decodes a packed BCD byte into its decimal value.
#[inline]
pub fn bcd2dec(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Returns true when `addr + offset` lands on a different 256-byte page than `addr`.
#[inline]
pub fn will_cross_page(addr: u16, offset: i16) -> bool {
    let target = addr.wrapping_add(offset as u16);
    (addr & 0xFF00) != (target & 0xFF00)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_helpers() {
        assert!(bit_test(0b1000_0000, 7));
        assert!(!bit_test(0b1000_0000, 6));
        assert_eq!(bit_set(0x00, 3, true), 0x08);
        assert_eq!(bit_set(0xFF, 0, false), 0xFE);
        assert_eq!(bit_get(0x40, 6), 1);
        assert_eq!(bit_get(0x40, 5), 0);
    }

    #[test]
    fn test_bcd_conversion() {
        for value in 0..100u8 {
            assert_eq!(bcd2dec(dec2bcd(value)), value);
        }
        assert_eq!(dec2bcd(59), 0x59);
        assert_eq!(bcd2dec(0x12), 12);
    }

    #[test]
    fn test_page_crossing() {
        assert!(will_cross_page(0x20FF, 2));
        assert!(!will_cross_page(0x2080, 2));
        assert!(will_cross_page(0x2000, -1));
        assert!(!will_cross_page(0x20FE, 1));
    }
}
