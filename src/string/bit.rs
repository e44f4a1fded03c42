//! Bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::{Bytes, BytesMut};
use crate::error::Error;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits. The bits are kept in a bytes
/// value with the first bit in the most significant bit of the first
/// octet. Unused bits in the last octet are always zero.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// When encoded in BER, bit strings can either be a primitive or
/// constructed value.
///
/// If encoded as a primitive value, the first octet of the
/// content contains the number of unused bits in the last octet and the
/// following octets contain the bits with the first bit in the most
/// significant bit of the octet.
///
/// In the constructed encoding, the bit string is represented as a sequence
/// of bit strings which in turn may either be constructed or primitive
/// encodings. The only limitation in this nesting is that only the last
/// primitively encoded bit string may have a non-zero number of unused bits.
/// DER only allows the primitive form.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of bits.
    bit_len: usize,

    /// The octets holding the bits.
    octets: Bytes,
}

impl BitString {
    /// Creates a new bit string from the number of bits and the octets.
    ///
    /// Fails if the number of octets doesn’t match the number of bits or
    /// if any of the unused bits is set.
    pub fn new(bit_len: usize, octets: Bytes) -> Result<Self, Error> {
        if octets.len() != (bit_len + 7) / 8 {
            return Err(Error::value_type(
                "bit length does not match number of octets"
            ))
        }
        let res = BitString { bit_len, octets };
        if let Some(last) = res.octets.last() {
            if last & res.unused_mask() != 0 {
                return Err(Error::value_type("unused bits are not zero"))
            }
        }
        Ok(res)
    }

    /// Creates a bit string from full octets.
    pub fn from_octets(octets: Bytes) -> Self {
        BitString { bit_len: octets.len() * 8, octets }
    }

    /// Creates a bit string from a string of ‘0’ and ‘1’ characters.
    pub fn from_bits(bits: &str) -> Result<Self, Error> {
        let mut octets = BytesMut::with_capacity((bits.len() + 7) / 8);
        for (i, ch) in bits.bytes().enumerate() {
            let set = match ch {
                b'0' => false,
                b'1' => true,
                _ => return Err(Error::value_type("non binary digit"))
            };
            if i % 8 == 0 {
                octets.extend_from_slice(&[0]);
            }
            if set {
                let last = octets.len() - 1;
                octets[last] |= 0x80 >> (i % 8);
            }
        }
        Ok(BitString { bit_len: bits.len(), octets: octets.freeze() })
    }

    /// Creates a bit string from hexadecimal digits.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let digits = hex.bytes().map(|ch| {
            (ch as char).to_digit(16).map(|d| d as u8).ok_or_else(|| {
                Error::value_type("non hexadecimal digit")
            })
        }).collect::<Result<Vec<_>, _>>()?;
        let mut octets = BytesMut::with_capacity((digits.len() + 1) / 2);
        for pair in digits.chunks(2) {
            let high = pair[0] << 4;
            octets.extend_from_slice(&[high | pair.get(1).copied().unwrap_or(0)]);
        }
        Ok(BitString { bit_len: digits.len() * 4, octets: octets.freeze() })
    }

    /// Parses an ASN.1 bit string literal.
    ///
    /// Both binary literals like `'0101'B` and hexadecimal ones like
    /// `'0A3B'H` are accepted.
    pub fn from_literal(literal: &str) -> Result<Self, Error> {
        let inner = literal.strip_prefix('\'');
        if let Some(bits) = inner.and_then(|s| s.strip_suffix("'B")) {
            Self::from_bits(bits)
        }
        else if let Some(hex) = inner.and_then(|s| s.strip_suffix("'H")) {
            Self::from_hex(hex)
        }
        else {
            Err(Error::value_type("invalid BIT STRING literal"))
        }
    }

    /// Creates a bit string with the given bits set.
    ///
    /// The bit string is just long enough to hold the largest bit.
    pub fn from_set_bits<I: IntoIterator<Item = usize>>(bits: I) -> Self {
        let bits: Vec<usize> = bits.into_iter().collect();
        let bit_len = bits.iter().max().map(|max| max + 1).unwrap_or(0);
        let mut octets = BytesMut::from(vec![0u8; (bit_len + 7) / 8].as_slice());
        for bit in bits {
            octets[bit >> 3] |= 0x80 >> (bit & 7);
        }
        BitString { bit_len, octets: octets.freeze() }
    }

    /// Returns a bit string with trailing zero bits removed.
    pub fn trimmed(&self) -> Self {
        let bit_len = (0..self.bit_len).rev().find(|&bit| self.bit(bit))
            .map(|bit| bit + 1).unwrap_or(0);
        let octets = self.octets.slice(..(bit_len + 7) / 8);
        BitString { bit_len, octets }
    }

    /// Returns the value of the given bit.
    ///
    /// Bits past the end of the bit string are `false`.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len {
            return false
        }
        self.octets[bit >> 3] & (0x80 >> (bit & 7)) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        ((8 - self.bit_len % 8) % 8) as u8
    }

    fn unused_mask(&self) -> u8 {
        ((1u16 << self.unused()) - 1) as u8
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.octets.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.octets.clone()
    }

    /// Appends the content octets to `target`.
    pub(crate) fn append_content(&self, target: &mut Vec<u8>) {
        target.push(self.unused());
        target.extend_from_slice(self.octets.as_ref());
    }

    /// Parses the content octets of a primitive bit string.
    pub(crate) fn from_content(content: &[u8]) -> Result<Self, Error> {
        let (unused, octets) = match content.split_first() {
            Some(some) => some,
            None => xerr!(return Err(Error::not_enough("zero length")))
        };
        if octets.is_empty() && *unused != 0 {
            xerr!(return Err(Error::decode("invalid empty value")))
        }
        if *unused > 7 {
            xerr!(return Err(Error::decode("too big pad")))
        }
        if let Some(last) = octets.last() {
            if last & (((1u16 << *unused) - 1) as u8) != 0 {
                xerr!(return Err(Error::decode("invalid pad")))
            }
        }
        Ok(BitString {
            bit_len: octets.len() * 8 - usize::from(*unused),
            octets: Bytes::copy_from_slice(octets),
        })
    }

    /// Concatenates the chunks of a constructed bit string.
    ///
    /// All chunks but the last one must have a multiple of eight bits.
    pub(crate) fn concat(chunks: &[&BitString]) -> Result<Self, Error> {
        let mut octets = BytesMut::new();
        let mut bit_len = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            if chunk.bit_len % 8 != 0 && i + 1 != chunks.len() {
                xerr!(return Err(Error::decode(
                    "BitString chunk is not multiple of 8 bits"
                )))
            }
            octets.extend_from_slice(chunk.octets.as_ref());
            bit_len += chunk.bit_len;
        }
        Ok(BitString { bit_len, octets: octets.freeze() })
    }
}


//--- Display and Debug

impl fmt::Display for BitString {
    /// Formats the bit string as an ASN.1 literal.
    ///
    /// Multiples of eight bits use the hexadecimal form.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("'")?;
        if self.bit_len % 8 == 0 {
            for octet in self.octets.iter() {
                write!(f, "{:02X}", octet)?;
            }
            f.write_str("'H")
        }
        else {
            for bit in 0..self.bit_len {
                f.write_str(if self.bit(bit) { "1" } else { "0" })?;
            }
            f.write_str("'B")
        }
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BitString({}, {})", self.bit_len, self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn content(bits: &BitString) -> Vec<u8> {
        let mut res = Vec::new();
        bits.append_content(&mut res);
        res
    }

    #[test]
    fn bits() {
        let bits = BitString::from_literal("'010110000000'B").unwrap();
        assert_eq!(bits.bit_len(), 12);
        assert_eq!(bits.unused(), 4);
        assert_eq!(bits.octet_slice(), b"\x58\x00");
        assert!(!bits.bit(0));
        assert!(bits.bit(1));
        assert!(bits.bit(3));
        assert!(!bits.bit(12));
        assert!(!bits.bit(1000));
        assert_eq!(content(&bits), b"\x04\x58\x00");
        assert_eq!(bits.to_string(), "'010110000000'B");
    }

    #[test]
    fn literals() {
        let bits = BitString::from_literal("'0A3B'H").unwrap();
        assert_eq!(bits.bit_len(), 16);
        assert_eq!(bits.octet_slice(), b"\x0A\x3B");
        assert_eq!(bits.to_string(), "'0A3B'H");
        let bits = BitString::from_literal("'ABC'H").unwrap();
        assert_eq!(bits.bit_len(), 12);
        assert_eq!(bits.octet_slice(), b"\xAB\xC0");
        assert!(BitString::from_literal("0101").is_err());
        assert!(BitString::from_literal("'0121'B").is_err());
        assert!(BitString::from_literal("'XY'H").is_err());
        assert_eq!(BitString::from_literal("''B").unwrap().bit_len(), 0);
    }

    #[test]
    fn new_and_named() {
        assert!(BitString::new(12, Bytes::from_static(b"\x58\x00")).is_ok());
        assert!(BitString::new(12, Bytes::from_static(b"\x58\x01")).is_err());
        assert!(BitString::new(7, Bytes::from_static(b"\x58\x00")).is_err());

        let bits = BitString::from_set_bits(vec![1, 5]);
        assert_eq!(bits.bit_len(), 6);
        assert_eq!(bits.octet_slice(), b"\x44");
        assert_eq!(BitString::from_set_bits(vec![]).bit_len(), 0);

        let bits = BitString::from_bits("0100100000").unwrap().trimmed();
        assert_eq!(bits.bit_len(), 5);
        assert_eq!(bits.octet_slice(), b"\x48");
    }

    #[test]
    fn from_content() {
        let bits = BitString::from_content(b"\x04\x58\x00").unwrap();
        assert_eq!(bits, BitString::from_bits("010110000000").unwrap());
        assert_eq!(BitString::from_content(b"\x00").unwrap().bit_len(), 0);
        assert_eq!(
            BitString::from_content(b"").unwrap_err().kind(),
            ErrorKind::NotEnoughData
        );
        assert_eq!(
            BitString::from_content(b"\x01").unwrap_err().message(),
            "invalid empty value"
        );
        assert_eq!(
            BitString::from_content(b"\x08\x00").unwrap_err().message(),
            "too big pad"
        );
        assert_eq!(
            BitString::from_content(b"\x04\x58\x01").unwrap_err().message(),
            "invalid pad"
        );
    }

    #[test]
    fn concat() {
        let a = BitString::from_octets(Bytes::from_static(b"\x01"));
        let b = BitString::from_bits("101").unwrap();
        let joined = BitString::concat(&[&a, &b]).unwrap();
        assert_eq!(joined.bit_len(), 11);
        assert_eq!(joined.octet_slice(), b"\x01\xA0");
        assert!(BitString::concat(&[&b, &a]).is_err());
    }
}
