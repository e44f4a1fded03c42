//! String types.
//!
//! There are two types of strings for binary data. Octet strings contain
//! an unrestricted sequence of octets and are kept as plain `Bytes` values
//! while [`BitString`]s contain a sequence of bits that does not need to be
//! of a length divisible by eight.
//!
//! In addition, there are a number of so-called restricted character strings
//! that each contain a sequence of characters according to a pre-defined
//! character set. They are all described by a [`StringKind`].
//!
//! [`BitString`]: struct.BitString.html
//! [`StringKind`]: enum.StringKind.html

//--- Re-exports

pub use self::bit::BitString;
pub use self::restricted::{CharSetError, StringKind};

//--- Private modules

mod bit;
mod restricted;
