//! 20-byte account addresses.

use primitive_types::U256;
use std::fmt;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Fixed-size 20-byte address identifying an account.
///
/// This type is `Copy` for efficient passing in existence and balance
/// lookups during gas computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Creates a zero-valued address.
    pub const fn zero() -> Address {
        Address([0u8; ADDRESS_LEN])
    }

    /// Returns the address as a byte slice.
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Creates an address from the low 20 bytes of a 256-bit word.
    ///
    /// Stack items name accounts with the address in the word's low-order
    /// bytes; the high 12 bytes are ignored.
    pub fn from_word(word: &U256) -> Address {
        let mut buf = [0u8; 32];
        word.to_big_endian(&mut buf);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&buf[12..]);
        Address(out)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_word_takes_low_twenty_bytes() {
        let word = U256::from_big_endian(&[0xffu8; 32]);
        assert_eq!(Address::from_word(&word), Address([0xff; 20]));
    }

    #[test]
    fn from_word_ignores_high_bytes() {
        let a = U256::from(7u64);
        let mut high = [0u8; 32];
        high[0] = 0xaa; // byte 0 is outside the address range
        high[31] = 7;
        let b = U256::from_big_endian(&high);
        assert_eq!(Address::from_word(&a), Address::from_word(&b));
    }

    #[test]
    fn from_word_small_value() {
        let addr = Address::from_word(&U256::from(0x0102u64));
        let mut expected = [0u8; 20];
        expected[18] = 0x01;
        expected[19] = 0x02;
        assert_eq!(addr, Address(expected));
    }
}
