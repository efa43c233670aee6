use std::fmt;
use std::str::FromStr;

use bitvec::prelude::*;

use crate::engine::error::CodingError;

pub type Bits = BitSlice<u8, Msb0>;
pub type Codeword = BitVec<u8, Msb0>;

/// Packed, ordered bit sequence produced by the encoder.
///
/// Bits are stored MSB-first. The sequence carries no symbol boundaries; they
/// are recovered only by walking the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBits {
    bits: BitVec<u8, Msb0>,
}

impl EncodedBits {
    pub fn new() -> Self {
        Self { bits: BitVec::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(bits),
        }
    }

    /// Restores a sequence of `bit_len` bits from packed storage.
    pub fn from_raw_bytes(bytes: &[u8], bit_len: usize) -> Result<Self, CodingError> {
        let available = bytes.len() * 8;
        if bit_len > available {
            return Err(CodingError::BitLengthOverflow { bit_len, available });
        }
        let mut bits = BitVec::<u8, Msb0>::from_slice(bytes);
        bits.truncate(bit_len);
        Ok(Self { bits })
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn extend_from_bits(&mut self, bits: &Bits) {
        self.bits.extend_from_bitslice(bits);
    }

    /// Appends `other` after the bits already held.
    pub fn concat(&mut self, other: &EncodedBits) {
        self.bits.extend_from_bitslice(&other.bits);
    }

    pub fn truncate(&mut self, bit_len: usize) {
        self.bits.truncate(bit_len);
    }

    /// Exact length in bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_bits(&self) -> &Bits {
        &self.bits
    }

    /// Packed storage; the final byte is zero-padded.
    pub fn as_raw_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }
}

/// Renders a bit slice as a '0'/'1' string.
pub fn bit_string(bits: &Bits) -> String {
    bits.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
}

impl fmt::Display for EncodedBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bit_string(&self.bits))
    }
}

impl FromStr for EncodedBits {
    type Err = CodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = EncodedBits::with_capacity(s.len());
        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                found => return Err(CodingError::InvalidBitChar { position, found }),
            }
        }
        Ok(bits)
    }
}

impl From<BitVec<u8, Msb0>> for EncodedBits {
    fn from(bits: BitVec<u8, Msb0>) -> Self {
        Self { bits }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_bit_strings() {
        let bits: EncodedBits = "1011001".parse().unwrap();
        assert_eq!(bits.len(), 7);
        assert_eq!(bits.to_string(), "1011001");
        assert_eq!(bits.as_raw_bytes(), &[0b1011_0010]);
    }

    #[test]
    fn rejects_non_binary_characters() {
        let err = "10x1".parse::<EncodedBits>().unwrap_err();
        assert_eq!(err, CodingError::InvalidBitChar { position: 2, found: 'x' });
    }

    #[test]
    fn raw_bytes_respect_bit_length() {
        let bits = EncodedBits::from_raw_bytes(&[0b1100_0000, 0xff], 10).unwrap();
        assert_eq!(bits.to_string(), "1100000011");

        let err = EncodedBits::from_raw_bytes(&[0], 9).unwrap_err();
        assert_eq!(err, CodingError::BitLengthOverflow { bit_len: 9, available: 8 });
    }

    #[test]
    fn concat_and_truncate() {
        let mut a: EncodedBits = "101".parse().unwrap();
        let b: EncodedBits = "0011".parse().unwrap();
        a.concat(&b);
        assert_eq!(a.to_string(), "1010011");
        a.truncate(2);
        assert_eq!(a.to_string(), "10");
    }
}
