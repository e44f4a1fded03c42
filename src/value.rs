//! Values of ASN.1 types.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use crate::error::{Error, ErrorKind};
use crate::int;
use crate::length::{append_length, length_len};
use crate::oid::Oid;
use crate::schema::{Init, Kind, Schema};
use crate::string::{BitString, StringKind};
use crate::time::DateTime;


//------------ Value ---------------------------------------------------------

/// A value of an ASN.1 type.
///
/// Every value knows its [`Schema`]. Values are either created from a
/// schema via [`Schema::value`] or the shortcut functions for the universal
/// types such as [`Value::integer`], or they are the result of decoding.
///
/// Decoded values remember where they were found in the data. This
/// information is available through the [position
/// methods](#position). For values that have not been decoded, all
/// offsets and lengths apart from the tag lengths are zero.
///
/// Two values are equal if they have the same tags and the same content.
/// How a value was encoded plays no role.
#[derive(Clone, Debug)]
pub struct Value {
    pub(crate) schema: Schema,
    pub(crate) content: Content,
    pub(crate) decoded: Option<Decoded>,
    pub(crate) defined: Option<Box<(Oid, Value)>>,
}

/// The content of a value.
///
/// Which variant is used depends on the kind of the schema. INTEGER and
/// ENUMERATED both use `Integer`, the restricted character strings keep
/// their encoded octets in `String`, and SEQUENCE and SET keep one entry
/// per field of the schema in `Fields`.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Boolean(bool),
    Integer(BigInt),
    BitString(BitString),
    OctetString(Bytes),
    Null,
    Oid(Oid),
    String(Bytes),
    Time(DateTime),
    Choice(Option<(usize, Box<Value>)>),
    Any(Bytes),
    Fields(Vec<Option<Value>>),
    Items(Vec<Value>),
}

/// Where and how a value was found in decoded data.
#[derive(Clone, Debug, Default)]
pub(crate) struct Decoded {
    pub offset: usize,
    pub tlen: usize,
    pub llen: usize,
    pub vlen: usize,
    pub lenindef: bool,
    pub ber_encoded: bool,
    pub expl: Option<Explicit>,

    /// The original text of a time in BER form.
    pub ber_raw: Option<Bytes>,
}

/// The explicit tag of a decoded value.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Explicit {
    pub tlen: usize,
    pub llen: usize,
    pub vlen: usize,
    pub lenindef: bool,
}

/// # Creation
///
impl Value {
    pub(crate) fn new(schema: Schema, content: Content) -> Self {
        Value { schema, content, decoded: None, defined: None }
    }

    pub(crate) fn from_decoded(
        schema: Schema, content: Content, decoded: Decoded
    ) -> Self {
        Value { schema, content, decoded: Some(decoded), defined: None }
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(Schema::boolean(), Content::Boolean(value))
    }

    pub fn integer(value: impl Into<BigInt>) -> Self {
        Self::new(Schema::integer(), Content::Integer(value.into()))
    }

    pub fn null() -> Self {
        Self::new(Schema::null(), Content::Null)
    }

    pub fn octet_string(value: impl Into<Bytes>) -> Self {
        Self::new(Schema::octet_string(), Content::OctetString(value.into()))
    }

    pub fn oid(value: Oid) -> Self {
        Self::new(Schema::oid(), Content::Oid(value))
    }

    pub fn bit_string(value: BitString) -> Self {
        Self::new(Schema::bit_string(), Content::BitString(value))
    }

    /// Creates a restricted character string.
    pub fn string(kind: StringKind, text: &str) -> Result<Self, Error> {
        Schema::string(kind).value(text)
    }

    /// Creates an ANY value from a complete encoded value.
    pub fn any(encoded: impl Into<Bytes>) -> Self {
        Self::new(Schema::any(), Content::Any(encoded.into()))
    }

    pub fn utc_time(time: DateTime) -> Result<Self, Error> {
        Schema::utc_time().value(time)
    }

    pub fn generalized_time(time: DateTime) -> Result<Self, Error> {
        Schema::generalized_time().value(time)
    }
}

/// # Content
///
impl Value {
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Returns the value decoded through a DEFINED BY rule.
    ///
    /// The object identifier is the value of the defining field.
    pub fn defined(&self) -> Option<(&Oid, &Value)> {
        self.defined.as_ref().map(|defined| (&defined.0, &defined.1))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.content {
            Content::Boolean(value) => Some(value),
            _ => None
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self.content {
            Content::Integer(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns an integer if it fits into an `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_bigint().and_then(ToPrimitive::to_i64)
    }

    /// Returns an integer if it fits into a `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        self.as_bigint().and_then(ToPrimitive::to_u64)
    }

    /// Returns the name of an INTEGER or ENUMERATED value.
    pub fn named(&self) -> Option<&str> {
        match (self.schema.kind(), &self.content) {
            (Kind::Integer { named, .. }, Content::Integer(value))
            | (Kind::Enumerated { named }, Content::Integer(value)) => {
                int::name_of(named, value)
            }
            _ => None
        }
    }

    /// Returns the names of the set bits of a BIT STRING.
    pub fn named_bits(&self) -> Vec<&str> {
        match (self.schema.kind(), &self.content) {
            (Kind::BitString { named }, Content::BitString(bits)) => {
                named.iter().filter(|(_, bit)| bits.bit(*bit)).map(|item| {
                    item.0.as_str()
                }).collect()
            }
            _ => Vec::new()
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitString> {
        match self.content {
            Content::BitString(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns a bit of a BIT STRING.
    ///
    /// Bits past the end and bits of other types are `false`.
    pub fn bit(&self, bit: usize) -> bool {
        self.as_bit_string().map_or(false, |bits| bits.bit(bit))
    }

    /// Returns the octets of a value.
    ///
    /// These are the content of an OCTET STRING, the encoded characters of
    /// a restricted character string, or the complete encoding held by an
    /// ANY.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self.content {
            Content::OctetString(ref value)
            | Content::String(ref value)
            | Content::Any(ref value) => Some(value),
            _ => None
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match self.content {
            Content::Oid(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the text of a restricted character string.
    pub fn text(&self) -> Option<String> {
        match (self.schema.kind(), &self.content) {
            (Kind::String { kind, .. }, Content::String(raw)) => {
                kind.decode(raw).ok()
            }
            _ => None
        }
    }

    pub fn as_time(&self) -> Option<DateTime> {
        match self.content {
            Content::Time(value) => Some(value),
            _ => None
        }
    }

    /// Returns the original text of a time decoded from its BER form.
    pub fn ber_raw(&self) -> Option<&Bytes> {
        self.decoded.as_ref().and_then(|decoded| decoded.ber_raw.as_ref())
    }
}

/// # SEQUENCE, SET, and CHOICE
///
impl Value {
    /// Returns a field of a SEQUENCE or SET.
    ///
    /// If the field is missing, returns its default value if there is one.
    /// For a CHOICE, returns the chosen value if it has the given name.
    pub fn get(&self, name: &str) -> Result<Option<&Value>, Error> {
        let idx = self.schema.field_index(name)?;
        match self.content {
            Content::Fields(ref values) => {
                Ok(values[idx].as_ref().or_else(|| {
                    self.schema.fields()[idx].schema().default()
                }))
            }
            Content::Choice(Some((chosen, ref value))) if chosen == idx => {
                Ok(Some(value.as_ref()))
            }
            _ => Ok(None)
        }
    }

    /// Returns whether a field is present.
    pub fn contains(&self, name: &str) -> bool {
        let idx = match self.schema.field_index(name) {
            Ok(idx) => idx,
            Err(_) => return false
        };
        match self.content {
            Content::Fields(ref values) => values[idx].is_some(),
            Content::Choice(Some((chosen, _))) => chosen == idx,
            _ => false
        }
    }

    /// Sets a field of a SEQUENCE or SET or selects a CHOICE.
    ///
    /// Setting a field to its default value removes it.
    pub fn set(&mut self, name: &str, init: impl Into<Init>) -> Result<(), Error> {
        if let Content::Choice(_) = self.content {
            return self.select(name, init)
        }
        let idx = self.schema.field_index(name)?;
        let field = self.schema.fields()[idx].schema().clone();
        let value = field.value(init)?;
        match self.content {
            Content::Fields(ref mut values) => {
                values[idx] = if field.is_default(&value) {
                    None
                }
                else {
                    Some(value)
                };
                Ok(())
            }
            _ => Err(self.wrong_type("SEQUENCE or SET"))
        }
    }

    /// Removes a field of a SEQUENCE or SET.
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>, Error> {
        let idx = self.schema.field_index(name)?;
        match self.content {
            Content::Fields(ref mut values) => Ok(values[idx].take()),
            _ => Err(self.wrong_type("SEQUENCE or SET"))
        }
    }

    /// Returns the present fields of a SEQUENCE or SET in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        let values = match self.content {
            Content::Fields(ref values) => values.as_slice(),
            _ => &[]
        };
        self.schema.fields().iter().zip(values).filter_map(|(field, value)| {
            value.as_ref().map(|value| (field.name(), value))
        })
    }

    /// Selects the alternative of a CHOICE.
    ///
    /// Any previously chosen alternative is replaced.
    pub fn select(
        &mut self, name: &str, init: impl Into<Init>
    ) -> Result<(), Error> {
        let idx = self.schema.field_index(name)?;
        let value = self.schema.fields()[idx].schema().value(init)?;
        match self.content {
            Content::Choice(ref mut chosen) => {
                *chosen = Some((idx, Box::new(value)));
                Ok(())
            }
            _ => Err(self.wrong_type("CHOICE"))
        }
    }

    /// Returns the name of the chosen alternative of a CHOICE.
    pub fn choice(&self) -> Option<&str> {
        match self.content {
            Content::Choice(Some((idx, _))) => {
                Some(self.schema.fields()[idx].name())
            }
            _ => None
        }
    }

    /// Returns the chosen value of a CHOICE.
    pub fn chosen(&self) -> Option<&Value> {
        match self.content {
            Content::Choice(Some((_, ref value))) => Some(value.as_ref()),
            _ => None
        }
    }

    fn wrong_type(&self, expected: &str) -> Error {
        Error::value_type(
            format!("{} is not a {}", self.schema.type_name(), expected)
        )
    }
}

/// # SEQUENCE OF and SET OF
///
impl Value {
    /// Appends an element.
    pub fn push(&mut self, init: impl Into<Init>) -> Result<(), Error> {
        let (element, bounds) = match self.schema.kind() {
            Kind::SequenceOf { element, bounds }
            | Kind::SetOf { element, bounds } => (element, bounds),
            _ => return Err(self.wrong_type("SEQUENCE OF or SET OF"))
        };
        let value = element.value(init)?;
        if let Content::Items(ref mut items) = self.content {
            let len = items.len() + 1;
            if bounds.exceeds_max(&len) {
                return Err(Error::bounds(
                    &bounds.min.unwrap_or(0), &len,
                    &bounds.max.unwrap_or(usize::MAX)
                ))
            }
            items.push(value);
        }
        Ok(())
    }

    /// Returns the elements of a SEQUENCE OF or SET OF.
    pub fn items(&self) -> &[Value] {
        match self.content {
            Content::Items(ref items) => items,
            _ => &[]
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// # State
///
impl Value {
    /// Returns whether the value is complete and can be encoded.
    ///
    /// A CHOICE must have a chosen alternative, a SEQUENCE or SET must have
    /// all fields that aren’t optional. All contained values must be ready
    /// as well.
    pub fn ready(&self) -> bool {
        match self.content {
            Content::Choice(None) => false,
            Content::Choice(Some((_, ref value))) => value.ready(),
            Content::Fields(ref values) => {
                self.schema.fields().iter().zip(values).all(
                    |(field, value)| match value {
                        Some(value) => value.ready(),
                        None => field.schema().is_optional()
                    }
                )
            }
            Content::Items(ref items) => items.iter().all(Value::ready),
            _ => true
        }
    }

    /// Returns whether the value or anything within used BER.
    pub fn bered(&self) -> bool {
        if self.lenindef() || self.expl_lenindef() || self.ber_encoded() {
            return true
        }
        if let Some((_, defined)) = self.defined() {
            if defined.bered() {
                return true
            }
        }
        self.children().any(Value::bered)
    }

    /// Returns the values directly contained in this value.
    pub(crate) fn children(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self.content {
            Content::Choice(Some((_, ref value))) => {
                Box::new(std::iter::once(value.as_ref()))
            }
            Content::Fields(ref values) => {
                Box::new(values.iter().filter_map(Option::as_ref))
            }
            Content::Items(ref items) => Box::new(items.iter()),
            _ => Box::new(std::iter::empty())
        }
    }
}

/// # Position
///
/// These describe where a decoded value was found. The offset is that of
/// the tag of the value itself. If there is an explicit tag, it is found
/// before that at the explicit offset. A CHOICE and an ANY have zero
/// lengths for tag and length and the whole encoding as the value length.
impl Value {
    pub fn offset(&self) -> usize {
        self.decoded.as_ref().map_or(0, |decoded| decoded.offset)
    }

    pub fn tlen(&self) -> usize {
        match self.decoded {
            Some(ref decoded) => decoded.tlen,
            None => self.schema.tag().map_or(0, |tag| tag.encoded_len()),
        }
    }

    pub fn llen(&self) -> usize {
        self.decoded.as_ref().map_or(0, |decoded| decoded.llen)
    }

    pub fn vlen(&self) -> usize {
        self.decoded.as_ref().map_or(0, |decoded| decoded.vlen)
    }

    pub fn tlvlen(&self) -> usize {
        self.tlen() + self.llen() + self.vlen()
    }

    pub fn lenindef(&self) -> bool {
        self.decoded.as_ref().map_or(false, |decoded| decoded.lenindef)
    }

    /// Returns whether the value used a non-canonical encoding.
    ///
    /// This does not include indefinite lengths.
    pub fn ber_encoded(&self) -> bool {
        self.decoded.as_ref().map_or(false, |decoded| decoded.ber_encoded)
    }

    fn explicit(&self) -> Option<Explicit> {
        self.decoded.as_ref().and_then(|decoded| decoded.expl)
    }

    /// Returns whether the value has an explicit tag.
    pub fn expled(&self) -> bool {
        self.schema.expl().is_some()
    }

    pub fn expl_tlen(&self) -> usize {
        match self.explicit() {
            Some(expl) => expl.tlen,
            None => self.schema.expl().map_or(0, |tag| tag.encoded_len())
        }
    }

    pub fn expl_llen(&self) -> usize {
        match self.explicit() {
            Some(expl) => expl.llen,
            None if self.expled() => length_len(self.tlvlen()),
            None => 0
        }
    }

    pub fn expl_vlen(&self) -> usize {
        match self.explicit() {
            Some(expl) => expl.vlen,
            None => self.tlvlen()
        }
    }

    pub fn expl_lenindef(&self) -> bool {
        self.explicit().map_or(false, |expl| expl.lenindef)
    }

    pub fn expl_offset(&self) -> usize {
        self.offset().saturating_sub(self.expl_tlen() + self.expl_llen())
    }

    /// Returns the offset of the value including any explicit tag.
    pub fn fulloffset(&self) -> usize {
        if self.expled() { self.expl_offset() } else { self.offset() }
    }

    /// Returns the length of the value including any explicit tag.
    pub fn fulllen(&self) -> usize {
        if self.expled() {
            self.expl_tlen() + self.expl_llen() + self.expl_vlen()
        }
        else {
            self.tlvlen()
        }
    }
}

/// # Encoding
///
impl Value {
    /// Returns the DER encoding of the value.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut target = Vec::new();
        self.append_encoded(&mut target)?;
        Ok(target)
    }

    /// Appends the DER encoding including any explicit tag.
    pub(crate) fn append_encoded(&self, target: &mut Vec<u8>) -> Result<(), Error> {
        match self.schema.expl() {
            Some(expl) => {
                let mut inner = Vec::new();
                self.append_tlv(&mut inner)?;
                target.extend_from_slice(expl.as_slice());
                append_length(inner.len(), target);
                target.extend_from_slice(&inner);
                Ok(())
            }
            None => self.append_tlv(target)
        }
    }

    fn append_tlv(&self, target: &mut Vec<u8>) -> Result<(), Error> {
        match (&self.content, self.schema.tag()) {
            (Content::Choice(Some((_, value))), _) => {
                value.append_encoded(target)
            }
            (Content::Choice(None), _) => {
                Err(Error::new(
                    ErrorKind::ObjNotReady,
                    format!("{} has no chosen value", self.schema.type_name())
                ))
            }
            (Content::Any(octets), _) => {
                target.extend_from_slice(octets);
                Ok(())
            }
            (_, Some(tag)) => {
                let mut content = Vec::new();
                self.append_content(&mut content)?;
                target.extend_from_slice(tag.as_slice());
                append_length(content.len(), target);
                target.extend_from_slice(&content);
                Ok(())
            }
            (_, None) => {
                Err(self.wrong_type("tagged type"))
            }
        }
    }

    fn append_content(&self, target: &mut Vec<u8>) -> Result<(), Error> {
        match self.content {
            Content::Boolean(value) => {
                target.push(if value { 0xFF } else { 0 })
            }
            Content::Integer(ref value) => int::append_content(value, target),
            Content::BitString(ref value) => value.append_content(target),
            Content::OctetString(ref value) | Content::String(ref value) => {
                target.extend_from_slice(value)
            }
            Content::Null => { }
            Content::Oid(ref value) => value.append_content(target),
            Content::Time(ref value) => {
                if let Some(time_type) = self.schema.kind().time_type() {
                    target.extend_from_slice(&time_type.encode(value))
                }
            }
            Content::Fields(ref values) => {
                let mut encoded = Vec::new();
                for (field, value) in self.schema.fields().iter().zip(values) {
                    match value {
                        Some(value) => {
                            if field.schema().is_default(value) {
                                continue
                            }
                            let mut item = Vec::new();
                            value.append_encoded(&mut item)?;
                            encoded.push(item);
                        }
                        None if field.schema().is_optional() => { }
                        None => {
                            return Err(Error::new(
                                ErrorKind::ObjNotReady, field.name().to_string()
                            ))
                        }
                    }
                }
                if let Kind::Set { .. } = self.schema.kind() {
                    encoded.sort();
                }
                encoded.iter().for_each(|item| target.extend_from_slice(item));
            }
            Content::Items(ref items) => {
                let mut encoded = items.iter().map(Value::encode)
                    .collect::<Result<Vec<_>, _>>()?;
                if let Kind::SetOf { .. } = self.schema.kind() {
                    encoded.sort();
                }
                encoded.iter().for_each(|item| target.extend_from_slice(item));
            }
            Content::Choice(_) | Content::Any(_) => { }
        }
        Ok(())
    }
}


//--- PartialEq

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.schema.tag() == other.schema.tag()
            && self.schema.expl() == other.schema.expl()
            && self.content == other.content
    }
}


//--- Display

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.content {
            Content::Boolean(value) => {
                f.write_str(if value { "TRUE" } else { "FALSE" })
            }
            Content::Integer(ref value) => match self.named() {
                Some(name) => write!(f, "{} ({})", name, value),
                None => fmt::Display::fmt(value, f)
            }
            Content::BitString(ref value) => {
                fmt::Display::fmt(value, f)?;
                let names = self.named_bits();
                if !names.is_empty() {
                    write!(f, " [{}]", names.join(", "))?;
                }
                Ok(())
            }
            Content::OctetString(ref value) | Content::Any(ref value) => {
                for octet in value.iter() {
                    write!(f, "{:02X}", octet)?;
                }
                Ok(())
            }
            Content::Null => f.write_str("NULL"),
            Content::Oid(ref value) => fmt::Display::fmt(value, f),
            Content::String(_) => match self.text() {
                Some(text) => f.write_str(&text),
                None => Ok(())
            }
            Content::Time(ref value) => fmt::Display::fmt(value, f),
            Content::Choice(None) => f.write_str("<no choice>"),
            Content::Choice(Some(..)) => {
                match (self.choice(), self.chosen()) {
                    (Some(name), Some(value)) => {
                        write!(f, "{}: {}", name, value)
                    }
                    _ => Ok(())
                }
            }
            Content::Fields(_) => {
                f.write_str("{")?;
                for (i, (name, value)) in self.fields().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str("}")
            }
            Content::Items(ref items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::tag::Tag;

    #[test]
    fn encode_primitives() {
        assert_eq!(Value::integer(-123).encode().unwrap(), b"\x02\x01\x85");
        assert_eq!(Value::boolean(true).encode().unwrap(), b"\x01\x01\xFF");
        assert_eq!(Value::null().encode().unwrap(), b"\x05\x00");
        assert_eq!(
            Value::oid(Oid::new(&[1, 2, 3]).unwrap()).encode().unwrap(),
            b"\x06\x02\x2A\x03"
        );
        assert_eq!(
            Value::octet_string(&b"ab"[..]).encode().unwrap(),
            b"\x04\x02ab"
        );
        let bits = BitString::from_bits("010110000000").unwrap();
        assert_eq!(
            Value::bit_string(bits).encode().unwrap(), b"\x03\x03\x04\x58\x00"
        );
        assert_eq!(
            Value::string(StringKind::Ia5, "hi").unwrap().encode().unwrap(),
            b"\x16\x02hi"
        );
        let time = DateTime::new(2019, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            Value::utc_time(time).unwrap().encode().unwrap(),
            b"\x17\x0D191231235959Z"
        );
    }

    #[test]
    fn explicit_tags() {
        let schema = Schema::integer().explicit(Tag::ctx_constructed(1));
        let value = schema.value(5).unwrap();
        assert_eq!(value.encode().unwrap(), b"\xA1\x03\x02\x01\x05");
        assert!(value.expled());
        assert_eq!(value.expl_tlen(), 1);
        assert_eq!(value.expl_llen(), 1);
        assert_ne!(value, Value::integer(5));

        let schema = Schema::boolean().implicit(Tag::ctx_primitive(2));
        assert_eq!(schema.value(false).unwrap().encode().unwrap(), b"\x82\x01\x00");
    }

    #[test]
    fn sequence_fields() {
        let schema = Schema::sequence(vec![
            ("a", Schema::integer()),
            ("b", Schema::boolean().with_default(false).unwrap()),
            ("c", Schema::null().optional()),
        ]);
        let mut value = schema.empty().unwrap();
        assert!(!value.ready());
        let err = value.encode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ObjNotReady);
        assert_eq!(err.message(), "a");

        value.set("a", 7).unwrap();
        assert!(value.ready());
        assert_eq!(value.get("b").unwrap(), Some(&Value::boolean(false)));
        assert!(!value.contains("b"));
        value.set("b", true).unwrap();
        assert!(value.contains("b"));
        value.set("b", false).unwrap();
        assert!(!value.contains("b"));
        assert_eq!(value.get("c").unwrap(), None);
        assert_eq!(value.get("x").unwrap_err().kind(), ErrorKind::ObjUnknown);
        assert_eq!(
            value.set("a", "x").unwrap_err().kind(), ErrorKind::ObjUnknown
        );
        assert_eq!(value.encode().unwrap(), b"\x30\x03\x02\x01\x07");
        value.set("c", ()).unwrap();
        assert_eq!(value.encode().unwrap(), b"\x30\x05\x02\x01\x07\x05\x00");
        assert_eq!(value.remove("c").unwrap(), Some(Value::null()));
        assert_eq!(value.to_string(), "{a: 7}");
    }

    #[test]
    fn set_ordering() {
        let schema = Schema::set(vec![
            ("num", Schema::integer()),
            ("flag", Schema::boolean()),
        ]);
        let value = schema.value(Init::fields(vec![
            ("num", Value::integer(1)), ("flag", Value::boolean(true)),
        ])).unwrap();
        assert_eq!(
            value.encode().unwrap(), b"\x31\x06\x01\x01\xFF\x02\x01\x01"
        );

        let mut items = Schema::set_of(Schema::integer()).empty().unwrap();
        items.push(300).unwrap();
        items.push(2).unwrap();
        assert_eq!(
            items.encode().unwrap(), b"\x31\x07\x02\x01\x02\x02\x02\x01\x2C"
        );
    }

    #[test]
    fn sequence_of_bounds() {
        let schema = Schema::sequence_of(Schema::boolean())
            .with_size_bounds(1, Some(2));
        let mut value = schema.empty().unwrap();
        value.push(true).unwrap();
        value.push(false).unwrap();
        assert_eq!(value.push(true).unwrap_err().kind(), ErrorKind::Bounds);
        assert_eq!(value.len(), 2);
        assert_eq!(
            schema.value(Vec::<Value>::new()).unwrap_err().kind(),
            ErrorKind::Bounds
        );
        assert_eq!(value.to_string(), "[TRUE, FALSE]");
    }

    #[test]
    fn choice() {
        let schema = Schema::choice(vec![
            ("num", Schema::integer()),
            ("text", Schema::string(StringKind::Utf8)),
        ]);
        let mut value = schema.empty().unwrap();
        assert_eq!(value.choice(), None);
        assert_eq!(value.encode().unwrap_err().kind(), ErrorKind::ObjNotReady);
        value.select("num", 5).unwrap();
        assert_eq!(value.encode().unwrap(), b"\x02\x01\x05");
        value.set("text", "é").unwrap();
        assert_eq!(value.choice(), Some("text"));
        assert_eq!(value.chosen().unwrap().text().unwrap(), "é");
        assert_eq!(value.get("num").unwrap(), None);
        assert_eq!(
            value.select("x", 1).unwrap_err().kind(), ErrorKind::ObjUnknown
        );
        assert_eq!(value.to_string(), "text: é");
    }

    #[test]
    fn equality() {
        assert_eq!(Value::integer(3), Schema::integer().value(3).unwrap());
        assert_ne!(
            Value::integer(3),
            Schema::integer().implicit(Tag::ctx_primitive(0)).value(3).unwrap()
        );
        assert_ne!(Value::integer(3), Value::integer(4));
    }

    #[test]
    fn any_values() {
        let any = Value::any(&b"\x05\x00"[..]);
        assert_eq!(any.encode().unwrap(), b"\x05\x00");
        let schema = Schema::sequence(vec![("x", Schema::any())]);
        let value = schema.value(Init::fields(vec![("x", Value::null())]))
            .unwrap();
        assert_eq!(value.encode().unwrap(), b"\x30\x02\x05\x00");
    }

    #[test]
    fn accessors() {
        let schema = Schema::integer().with_named_values(vec![("ten", 10)]);
        let value = schema.value(10).unwrap();
        assert_eq!(value.named(), Some("ten"));
        assert_eq!(value.to_u64(), Some(10));
        assert_eq!(value.to_string(), "ten (10)");
        assert!(!value.bered());
        assert_eq!(value.tlen(), 1);
        assert_eq!(value.offset(), 0);

        let bits = Schema::bit_string().with_named_bits(vec![("x", 1)])
            .value("'01'B").unwrap();
        assert_eq!(bits.named_bits(), vec!["x"]);
        assert!(bits.bit(1));
        assert!(!bits.bit(100));
    }
}
