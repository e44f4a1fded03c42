//! The identifier octets of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::error::Error;


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn mask(self) -> u8 {
        match self {
            Class::Universal => Tag::UNIVERSAL,
            Class::Application => Tag::APPLICATION,
            Class::Context => Tag::CONTEXT_SPECIFIC,
            Class::Private => Tag::PRIVATE,
        }
    }

    fn from_octet(octet: u8) -> Self {
        match octet & Tag::CLASS_MASK {
            Tag::UNIVERSAL => Class::Universal,
            Tag::APPLICATION => Class::Application,
            Tag::CONTEXT_SPECIFIC => Class::Context,
            _ => Class::Private,
        }
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of an encoded value.
///
/// Each encoded value starts with a sequence of one or more octets called
/// the _identifier octets._ They encode the class and number of the tag as
/// well as whether the value uses primitive or constructed encoding. Unlike
/// what one might expect, the `Tag` type keeps all three of them. This way,
/// an implicit tag given to a schema says exactly what the identifier octets
/// look like, which is how [`Tag::ctx_primitive`] and
/// [`Tag::ctx_constructed`] differ.
///
/// # BER Encoding
///
/// Tag numbers below 31 are encoded in the five lowest bits of a single
/// octet. Larger numbers set these five bits to one and follow up with
/// the number in base 128, most significant group first, with the top bit
/// set in all octets but the last one.
///
/// # Limitations
///
/// Tag numbers are limited to `u32`, so a tag is at most six octets long.
/// Longer tags are rejected when decoding.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag {
    buf: [u8; 6],
    len: u8,
}

/// # Constants for Often Used Tag Values
///
impl Tag {
    /// The mask for checking the class.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for the constructed bit.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the number in a single octet tag.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The mask for data in the following octets.
    const MULTIBYTE_DATA_MASK: u8 = 0x7f;

    /// The bit set in all but the last octet of a multibyte tag.
    const LAST_OCTET_MASK: u8 = 0x80;

    const UNIVERSAL: u8 = 0x00;
    const APPLICATION: u8 = 0x40;
    const CONTEXT_SPECIFIC: u8 = 0x80;
    const PRIVATE: u8 = 0xc0;

    /// The tag of the end-of-contents marker, UNIVERSAL 0.
    pub const END_OF_VALUE: Self = Tag::universal(0);

    //--- Universal Tags
    //
    // See clause 8.4 of X.690.

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Tag::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Tag::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Tag::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Tag::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Tag::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Tag::universal(6);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Tag::universal(10);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Tag::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    ///
    /// Always constructed.
    pub const SEQUENCE: Self = Tag::new(Class::Universal, true, 16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    ///
    /// Always constructed.
    pub const SET: Self = Tag::new(Class::Universal, true, 17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Tag::universal(18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Tag::universal(19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Tag::universal(20);

    /// The tag for the VideotexString type, UNIVERSAL 21.
    pub const VIDEOTEX_STRING: Self = Tag::universal(21);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Tag::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Tag::universal(23);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Tag::universal(24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Tag::universal(25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Tag::universal(26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Tag::universal(27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Tag::universal(28);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Tag::universal(30);
}

impl Tag {
    /// Creates a tag from its class, form and number.
    ///
    /// There are two forms:
    /// * low tag number (for tag numbers between 0 and 30):
    ///     One octet. Bits 8 and 7 specify the class, bit 6 indicates whether
    ///     the encoding is primitive (0), and bits 5-1 give the tag number.
    /// * high tag number (for tag numbers 31 and greater):
    ///     Two or more octets. First octet is as in low-tag-number form,
    ///     except that bits 5-1 all have value 1. Second and following octets
    ///     give the tag number, base 128, most significant digit first, with
    ///     as few digits as possible, and with the bit 8 of each octet except
    ///     the last set to 1.
    pub const fn new(class: Class, constructed: bool, number: u32) -> Self {
        let lead = class.mask() | if constructed {
            Tag::CONSTRUCTED_MASK
        } else {
            0
        };
        if number < 31 {
            return Tag { buf: [lead | number as u8, 0, 0, 0, 0, 0], len: 1 }
        }
        let mut buf = [lead | Tag::SINGLEBYTE_DATA_MASK, 0, 0, 0, 0, 0];
        let mut groups = 1;
        let mut rest = number >> 7;
        while rest != 0 {
            groups += 1;
            rest >>= 7;
        }
        let mut i = 0;
        while i < groups {
            let shift = 7 * (groups - 1 - i);
            let mut octet = ((number >> shift) as u8) & Tag::MULTIBYTE_DATA_MASK;
            if i + 1 < groups {
                octet |= Tag::LAST_OCTET_MASK
            }
            buf[i + 1] = octet;
            i += 1;
        }
        Tag { buf, len: groups as u8 + 1 }
    }

    /// Creates a primitive tag in the universal class.
    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, false, number)
    }

    /// Creates a primitive tag in the application class.
    pub const fn application(number: u32) -> Self {
        Tag::new(Class::Application, false, number)
    }

    /// Creates a primitive tag in the private class.
    pub const fn private(number: u32) -> Self {
        Tag::new(Class::Private, false, number)
    }

    /// Creates a primitive context specific tag.
    ///
    /// This is the implicit tag to use with primitive types.
    pub const fn ctx_primitive(number: u32) -> Self {
        Tag::new(Class::Context, false, number)
    }

    /// Creates a constructed context specific tag.
    ///
    /// This is the tag to use for explicit tagging or with implicitly
    /// tagged constructed types.
    pub const fn ctx_constructed(number: u32) -> Self {
        Tag::new(Class::Context, true, number)
    }

    /// Returns the same tag with the constructed bit set.
    pub const fn to_constructed(self) -> Self {
        let mut buf = self.buf;
        buf[0] |= Tag::CONSTRUCTED_MASK;
        Tag { buf, len: self.len }
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        Class::from_octet(self.buf[0])
    }

    /// Returns whether the tag signals constructed encoding.
    pub fn is_constructed(self) -> bool {
        self.buf[0] & Tag::CONSTRUCTED_MASK != 0
    }

    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        if self.len == 1 {
            return u32::from(self.buf[0] & Tag::SINGLEBYTE_DATA_MASK)
        }
        self.buf[1..usize::from(self.len)].iter().fold(0, |res, octet| {
            res << 7 | u32::from(octet & Tag::MULTIBYTE_DATA_MASK)
        })
    }

    /// Returns the identifier octets.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..usize::from(self.len)]
    }

    /// Returns the number of identifier octets.
    pub fn encoded_len(self) -> usize {
        usize::from(self.len)
    }

    /// Takes a tag from the beginning of `data`.
    ///
    /// Returns the tag and the remaining data.
    pub fn take_from(data: &[u8]) -> Result<(Self, &[u8]), Error> {
        let first = match data.first() {
            Some(first) => *first,
            None => xerr!(return Err(Error::not_enough("no data at all")))
        };
        let mut buf = [first, 0, 0, 0, 0, 0];
        if first & Tag::SINGLEBYTE_DATA_MASK != Tag::SINGLEBYTE_DATA_MASK {
            return Ok((Tag { buf, len: 1 }, &data[1..]))
        }
        let mut i = 1;
        loop {
            let octet = match data.get(i) {
                Some(octet) => *octet,
                None => xerr!(return Err(Error::decode("unfinished tag")))
            };
            if i == buf.len() {
                xerr!(return Err(Error::decode("too long tag")))
            }
            buf[i] = octet;
            i += 1;
            if octet & Tag::LAST_OCTET_MASK == 0 {
                break
            }
        }
        // Five groups of seven bits are more than fit into a u32.
        if i == buf.len() && buf[1] & Tag::MULTIBYTE_DATA_MASK > 0x0f {
            xerr!(return Err(Error::decode("too long tag")))
        }
        Ok((Tag { buf, len: i as u8 }, &data[i..]))
    }

    /// Returns the name of the universal type using this tag if any.
    fn universal_name(self) -> Option<&'static str> {
        if self.class() != Class::Universal {
            return None
        }
        Some(match self.number() {
            1 => "BOOLEAN",
            2 => "INTEGER",
            3 => "BIT STRING",
            4 => "OCTET STRING",
            5 => "NULL",
            6 => "OBJECT IDENTIFIER",
            10 => "ENUMERATED",
            12 => "UTF8String",
            16 => "SEQUENCE",
            17 => "SET",
            18 => "NumericString",
            19 => "PrintableString",
            20 => "TeletexString",
            21 => "VideotexString",
            22 => "IA5String",
            23 => "UTCTime",
            24 => "GeneralizedTime",
            25 => "GraphicString",
            26 => "VisibleString",
            27 => "GeneralString",
            28 => "UniversalString",
            30 => "BMPString",
            _ => return None
        })
    }
}


//--- Display and Debug

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.universal_name() {
            return f.write_str(name)
        }
        match self.class() {
            Class::Universal => write!(f, "[UNIVERSAL ")?,
            Class::Application => write!(f, "[APPLICATION ")?,
            Class::Context => write!(f, "[")?,
            Class::Private => write!(f, "[PRIVATE ")?,
        }
        write!(f, "{}]", self.number())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({}", self)?;
        if self.is_constructed() {
            f.write_str(" constructed")?;
        }
        f.write_str(")")
    }
}


//------------ Functions -----------------------------------------------------

/// Encodes a tag from its class, form and number.
pub fn encode_tag(class: Class, constructed: bool, number: u32) -> Tag {
    Tag::new(class, constructed, number)
}

/// Decodes a tag into its class, form and number.
pub fn decode_tag(tag: Tag) -> (Class, bool, u32) {
    (tag.class(), tag.is_constructed(), tag.number())
}

/// Splits a tag off the beginning of `data`.
///
/// Returns the tag, the number of its octets and the remaining data. Fails
/// with `NotEnoughData` on empty data and with a generic decode error if
/// the data ends in the middle of a multibyte tag.
pub fn strip_tag(data: &[u8]) -> Result<(Tag, usize, &[u8]), Error> {
    let (tag, rest) = Tag::take_from(data)?;
    Ok((tag, tag.encoded_len(), rest))
}


//============ Tests =========================================================
