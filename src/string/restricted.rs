//! Restricted character strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use crate::tag::Tag;


//------------ StringKind ----------------------------------------------------

/// The kind of a restricted character string.
///
/// ASN.1 defines a whole family of string types that only differ in the
/// octet encoding of their characters and in which characters are allowed
/// at all. This type lists all of them. Each kind has its own universal
/// tag. `T61` and `Iso646` are alternative names for `Teletex` and
/// `Visible`, respectively, and share their tags.
///
/// The character set assumed for the encoding of the legacy types is
/// a simplification: the Teletex, IA5, Visible, and ISO 646 types are
/// treated as ASCII while the Videotex, Graphic, and General types are
/// treated as ISO 8859-1.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StringKind {
    /// UTF8String, any Unicode text.
    Utf8,

    /// NumericString, digits and space.
    Numeric,

    /// PrintableString.
    ///
    /// Letters, digits, space, and the characters `'()+,-./:=?`. Some
    /// real-world data also uses the asterisk and the ampersand, so these
    /// can be allowed separately.
    Printable {
        allow_asterisk: bool,
        allow_ampersand: bool,
    },

    /// TeletexString.
    Teletex,

    /// T61String, an alias of TeletexString.
    T61,

    /// VideotexString.
    Videotex,

    /// IA5String, i.e., ASCII.
    Ia5,

    /// GraphicString.
    Graphic,

    /// VisibleString.
    Visible,

    /// ISO646String, an alias of VisibleString.
    Iso646,

    /// GeneralString.
    General,

    /// UniversalString, text in UTF-32.
    Universal,

    /// BMPString, text in UTF-16.
    Bmp,
}

impl StringKind {
    /// The plain PrintableString.
    pub const PRINTABLE: Self = StringKind::Printable {
        allow_asterisk: false, allow_ampersand: false
    };

    /// Returns the universal tag of the kind.
    pub fn tag(self) -> Tag {
        match self {
            StringKind::Utf8 => Tag::UTF8_STRING,
            StringKind::Numeric => Tag::NUMERIC_STRING,
            StringKind::Printable { .. } => Tag::PRINTABLE_STRING,
            StringKind::Teletex | StringKind::T61 => Tag::TELETEX_STRING,
            StringKind::Videotex => Tag::VIDEOTEX_STRING,
            StringKind::Ia5 => Tag::IA5_STRING,
            StringKind::Graphic => Tag::GRAPHIC_STRING,
            StringKind::Visible | StringKind::Iso646 => Tag::VISIBLE_STRING,
            StringKind::General => Tag::GENERAL_STRING,
            StringKind::Universal => Tag::UNIVERSAL_STRING,
            StringKind::Bmp => Tag::BMP_STRING,
        }
    }

    /// Returns the name of the type.
    pub fn name(self) -> &'static str {
        match self {
            StringKind::Utf8 => "UTF8String",
            StringKind::Numeric => "NumericString",
            StringKind::Printable { .. } => "PrintableString",
            StringKind::Teletex => "TeletexString",
            StringKind::T61 => "T61String",
            StringKind::Videotex => "VideotexString",
            StringKind::Ia5 => "IA5String",
            StringKind::Graphic => "GraphicString",
            StringKind::Visible => "VisibleString",
            StringKind::Iso646 => "ISO646String",
            StringKind::General => "GeneralString",
            StringKind::Universal => "UniversalString",
            StringKind::Bmp => "BMPString",
        }
    }

    fn encoding(self) -> Encoding {
        match self {
            StringKind::Utf8 => Encoding::Utf8,
            StringKind::Videotex | StringKind::Graphic
            | StringKind::General => Encoding::Latin1,
            StringKind::Universal => Encoding::Utf32Be,
            StringKind::Bmp => Encoding::Utf16Be,
            _ => Encoding::Ascii,
        }
    }

    /// Checks whether a character is allowed.
    fn check_char(self, ch: char) -> Result<(), CharSetError> {
        match self {
            StringKind::Numeric => {
                if ch.is_ascii_digit() || ch == ' ' {
                    Ok(())
                }
                else {
                    Err(CharSetError("non-numeric value"))
                }
            }
            StringKind::Printable { allow_asterisk, allow_ampersand } => {
                let ok = ch.is_ascii_alphanumeric()
                    || " '()+,-./:=?".contains(ch)
                    || (allow_asterisk && ch == '*')
                    || (allow_ampersand && ch == '&');
                if ok {
                    Ok(())
                }
                else {
                    Err(CharSetError("non-printable value"))
                }
            }
            _ => Ok(())
        }
    }

    /// Decodes the encoded octets into text.
    pub fn decode(self, octets: &[u8]) -> Result<String, CharSetError> {
        let text = self.encoding().decode(octets)?;
        for ch in text.chars() {
            self.check_char(ch)?;
        }
        Ok(text)
    }

    /// Encodes text into octets.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, CharSetError> {
        for ch in text.chars() {
            self.check_char(ch)?;
        }
        self.encoding().encode(text)
    }

    /// Checks encoded octets and returns the number of characters.
    pub fn char_len(self, octets: &[u8]) -> Result<usize, CharSetError> {
        self.decode(octets).map(|text| text.chars().count())
    }
}

impl fmt::Display for StringKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}


//------------ Encoding ------------------------------------------------------

/// The octet encoding of the characters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Encoding {
    Ascii,
    Latin1,
    Utf8,
    Utf16Be,
    Utf32Be,
}

impl Encoding {
    fn decode(self, octets: &[u8]) -> Result<String, CharSetError> {
        match self {
            Encoding::Ascii => {
                if !octets.is_ascii() {
                    return Err(CharSetError("non-ASCII value"))
                }
                Ok(octets.iter().map(|&ch| char::from(ch)).collect())
            }
            Encoding::Latin1 => {
                Ok(octets.iter().map(|&ch| char::from(ch)).collect())
            }
            Encoding::Utf8 => {
                String::from_utf8(octets.to_vec()).map_err(|_| {
                    CharSetError("invalid UTF-8")
                })
            }
            Encoding::Utf16Be => {
                if octets.len() % 2 != 0 {
                    return Err(CharSetError("invalid UTF-16"))
                }
                let units = octets.chunks(2).map(|pair| {
                    u16::from_be_bytes([pair[0], pair[1]])
                });
                std::char::decode_utf16(units).collect::<Result<_, _>>()
                    .map_err(|_| CharSetError("invalid UTF-16"))
            }
            Encoding::Utf32Be => {
                if octets.len() % 4 != 0 {
                    return Err(CharSetError("invalid UTF-32"))
                }
                octets.chunks(4).map(|quad| {
                    std::char::from_u32(u32::from_be_bytes(
                        [quad[0], quad[1], quad[2], quad[3]]
                    )).ok_or(CharSetError("invalid UTF-32"))
                }).collect()
            }
        }
    }

    fn encode(self, text: &str) -> Result<Vec<u8>, CharSetError> {
        match self {
            Encoding::Ascii => {
                if !text.is_ascii() {
                    return Err(CharSetError("non-ASCII value"))
                }
                Ok(text.as_bytes().to_vec())
            }
            Encoding::Latin1 => {
                text.chars().map(|ch| {
                    if u32::from(ch) < 0x100 {
                        Ok(u32::from(ch) as u8)
                    }
                    else {
                        Err(CharSetError("character outside ISO 8859-1"))
                    }
                }).collect()
            }
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Utf16Be => {
                Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect())
            }
            Encoding::Utf32Be => {
                Ok(text.chars().flat_map(|ch| {
                    u32::from(ch).to_be_bytes()
                }).collect())
            }
        }
    }
}


//------------ CharSetError --------------------------------------------------

/// Text contained characters not allowed by the string kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CharSetError(&'static str);

impl CharSetError {
    pub fn message(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl error::Error for CharSetError { }


//============ Tests =========================================================
