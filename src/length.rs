//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::error::{Error, ErrorKind};


//------------ Constants -----------------------------------------------------

/// The end-of-contents marker terminating indefinite length values.
pub const EOC: &[u8] = b"\x00\x00";


//------------ Functions -----------------------------------------------------

/// Returns the encoded length octets for a definite length.
///
/// # BER Encoding
///
/// Lengths below 128 use the short form, a single octet with the length.
/// Larger lengths use the long form: the first octet has its top bit set
/// and gives the number of following octets which contain the big-endian
/// length without leading zeros.
pub fn encode_length(len: usize) -> Vec<u8> {
    let mut res = Vec::with_capacity(Definite(len).encoded_len());
    Definite(len).append_encoded(&mut res);
    res
}

/// Appends the encoded length octets to `target`.
pub fn append_length(len: usize, target: &mut Vec<u8>) {
    Definite(len).append_encoded(target)
}

/// Returns the number of octets needed to encode a definite length.
pub fn length_len(len: usize) -> usize {
    Definite(len).encoded_len()
}

/// Decodes the length octets at the beginning of `data`.
///
/// Returns the length, the number of length octets, and the remaining
/// data. Only the minimal encoding of a definite length is accepted. The
/// indefinite form fails with [`ErrorKind::LenIndefForm`] so callers that
/// accept it can pick it up.
pub fn decode_length(data: &[u8]) -> Result<(usize, usize, &[u8]), Error> {
    let first = match data.first() {
        Some(first) => *first,
        None => xerr!(return Err(Error::not_enough("no data at all")))
    };
    if first & 0x80 == 0 {
        return Ok((usize::from(first), 1, &data[1..]))
    }
    let octets = usize::from(first & 0x7f);
    if octets + 1 > data.len() {
        xerr!(return Err(
            Error::not_enough("encoded length is longer than data")
        ))
    }
    if octets == 0 {
        xerr!(return Err(
            Error::new(ErrorKind::LenIndefForm, "indefinite length form")
        ))
    }
    if data[1] == 0 {
        xerr!(return Err(Error::decode("leading zeros")))
    }
    if octets > Definite::LEN {
        xerr!(return Err(Error::decode("too big length")))
    }
    let len = data[1..=octets].iter().fold(0usize, |res, octet| {
        res << 8 | usize::from(*octet)
    });
    if len < 0x80 {
        xerr!(return Err(Error::decode("long form instead of short one")))
    }
    Ok((len, octets + 1, &data[octets + 1..]))
}


//------------ Definite ------------------------------------------------------

/// A definite length.
///
/// This is a newtype of `usize` which allows us to do all the encoding
/// things on it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
struct Definite(usize);

impl Definite {
    const LEN: usize = 0usize.to_ne_bytes().len();

    fn encoded_len(self) -> usize {
        if self.0 > 0x7F {
            Self::LEN - self.encoded_start_idx() + 1
        }
        else {
            1
        }
    }

    fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 > 0x7F {
            let idx = self.encoded_start_idx();
            debug_assert!(idx < Self::LEN);

            // LEN will never be greater than 126 bytes. Also, `idx` won’t be
            // greater than LEN, so the subtraction here is fine.
            target.push(((Self::LEN - idx) | 0x80) as u8);
            target.extend_from_slice(&self.0.to_be_bytes()[idx..])
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Returns the index of the first non-zero octet of `len`.
    fn encoded_start_idx(self) -> usize {
        (self.0.leading_zeros() / 8) as usize
    }
}


//============ Tests =========================================================
