//! Content octets of INTEGER and ENUMERATED values.
//!
//! This is a private module. The values themselves are kept as
//! `num_bigint::BigInt` inside a `Value`, this module only deals with
//! turning them into content octets and back as well as the named values a
//! schema may attach to them.
//!
//! # BER Encoding
//!
//! An INTEGER is encoded as a primitive value with the content octets
//! providing a variable-length, big-endian, two‘s complement byte sequence
//! of that integer. Thus, the most-significant bit of the first octet serves
//! as the sign bit. The encoding must use the smallest possible number of
//! octets, even in BER.

use num_bigint::BigInt;
use crate::error::Error;


//------------ Content -------------------------------------------------------

/// Appends the minimal two’s complement content octets of `value`.
pub(crate) fn append_content(value: &BigInt, target: &mut Vec<u8>) {
    target.extend_from_slice(&value.to_signed_bytes_be())
}

/// Parses content octets into an integer.
pub(crate) fn from_content(content: &[u8]) -> Result<BigInt, Error> {
    check_head(content)?;
    Ok(BigInt::from_signed_bytes_be(content))
}

/// Checks that an integer is started correctly.
///
/// Specifically, checks that there is at least one octet and that the
/// first nine bits of a multi-octet integer are not all the same.
fn check_head(content: &[u8]) -> Result<(), Error> {
    match (content.get(0), content.get(1).map(|x| x & 0x80 != 0)) {
        (None, _) => {
            xerr!(Err(Error::not_enough("zero length")))
        }
        (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
            xerr!(Err(Error::decode("non normalized integer")))
        }
        _ => Ok(())
    }
}


//------------ Named Values --------------------------------------------------

/// Returns the name of `value` if there is one.
pub(crate) fn name_of<'a>(
    named: &'a [(String, BigInt)], value: &BigInt
) -> Option<&'a str> {
    named.iter().find(|(_, item)| item == value).map(|(name, _)| {
        name.as_str()
    })
}

/// Returns the value with the given name.
pub(crate) fn value_of<'a>(
    named: &'a [(String, BigInt)], name: &str
) -> Option<&'a BigInt> {
    named.iter().find(|(item, _)| item == name).map(|(_, value)| value)
}


//============ Tests =========================================================
