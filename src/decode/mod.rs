//! Decoding values.
//!
//! This module contains the machinery that turns encoded data into a
//! [`Value`] under the guidance of a [`Schema`]. The entry points are the
//! decode methods of the schema. They create a session for the decode
//! call and hand over to [`decode_tlv`] which is then called recursively
//! for every nested value.
//!
//! Every step of the way knows the offset of the value it is decoding
//! within the complete data and its decode path. An error raised by the
//! step is located using these and the name of the type. Errors raised
//! further down keep their own location.

use std::borrow::Cow;
use crate::context::Session;
use crate::error::{DecodePath, Error, ErrorKind};
use crate::length::{decode_length, EOC};
use crate::schema::{Kind, Schema};
use crate::tag::Tag;
use crate::value::{Explicit, Value};

mod constructed;
mod primitive;
mod test;


//------------ decode_tlv ----------------------------------------------------

/// Decodes a value including its explicit tag.
///
/// Returns the value and the remaining data.
pub(crate) fn decode_tlv<'a>(
    schema: &Schema,
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    match schema.expl() {
        Some(expl) => decode_explicit(schema, expl, data, offset, path, sess),
        None => decode_value(schema, data, offset, path, sess),
    }
}

fn decode_explicit<'a>(
    schema: &Schema,
    expl: Tag,
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    let (tag, rest) = Tag::take_from(data).map_err(&at)?;
    if tag != expl {
        return xerr!(Err(at(Error::tag_mismatch())))
    }
    let tlen = tag.encoded_len();
    let length = Length::take_from(rest, sess.ctx.bered).map_err(&at)?;
    let inner_offset = offset + tlen + length.llen;
    let (mut value, tail) = if length.indefinite {
        let (value, rest) = decode_value(
            schema, length.content, inner_offset, path, sess
        )?;
        if !rest.starts_with(EOC) {
            return xerr!(Err(at(Error::decode("no EOC"))))
        }
        log::debug!("indefinite length explicit tag at {}", offset);
        (value, &rest[EOC.len()..])
    }
    else {
        let (value, rest) = decode_value(
            schema, length.content, inner_offset, path, sess
        )?;
        if !rest.is_empty() {
            if !sess.ctx.allow_expl_oob {
                return xerr!(Err(at(Error::decode(
                    "explicit tag out-of-bound, longer than data"
                ))))
            }
            log::debug!(
                "skipping {} octets at the end of explicit tag at {}",
                rest.len(), offset
            );
        }
        (value, length.tail)
    };
    let vlen = if length.indefinite {
        value.tlvlen() + EOC.len()
    }
    else {
        length.content.len()
    };
    value.decoded.get_or_insert_with(Default::default).expl = Some(
        Explicit {
            tlen, llen: length.llen, vlen, lenindef: length.indefinite
        }
    );
    Ok((value, tail))
}

/// Decodes a value without its explicit tag.
fn decode_value<'a>(
    schema: &Schema,
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    match schema.kind() {
        Kind::Choice { fields } => {
            constructed::decode_choice(schema, fields, data, offset, path, sess)
        }
        Kind::Any => constructed::decode_any(schema, data, offset, path, sess),
        Kind::Sequence { fields } => {
            constructed::decode_sequence(
                schema, fields, data, offset, path, sess
            )
        }
        Kind::Set { fields } => {
            constructed::decode_set(schema, fields, data, offset, path, sess)
        }
        Kind::SequenceOf { element, bounds } => {
            constructed::decode_sequence_of(
                schema, element, bounds, false, data, offset, path, sess
            )
        }
        Kind::SetOf { element, bounds } => {
            constructed::decode_sequence_of(
                schema, element, bounds, true, data, offset, path, sess
            )
        }
        _ => primitive::decode_primitive(schema, data, offset, path, sess)
    }
}


//------------ probe ---------------------------------------------------------

/// Checks whether the data starts with a value of the given type.
///
/// Only the tag is looked at.
pub(crate) fn probe(schema: &Schema, data: &[u8]) -> bool {
    let tag = match Tag::take_from(data) {
        Ok((tag, _)) => tag,
        Err(_) => return false
    };
    let res = if let Some(expl) = schema.expl() {
        tag == expl
    }
    else {
        match schema.kind() {
            Kind::Choice { fields } => {
                fields.iter().any(|field| probe(field.schema(), data))
            }
            Kind::Any => true,
            Kind::OctetString { .. } | Kind::String { .. }
            | Kind::UtcTime | Kind::GeneralizedTime
            | Kind::BitString { .. } => {
                schema.tag().map_or(false, |own| {
                    tag == own || tag == own.to_constructed()
                })
            }
            _ => schema.tag() == Some(tag)
        }
    };
    log::trace!(
        "probing {} against tag {}: {}", schema.type_name(), tag, res
    );
    res
}


//------------ Length --------------------------------------------------------

/// The length octets of a value and the data they describe.
pub(crate) struct Length<'a> {
    /// The number of length octets.
    pub llen: usize,

    /// Whether the indefinite form was used.
    pub indefinite: bool,

    /// The content.
    ///
    /// For the indefinite form, this is all the data following the length
    /// octets.
    pub content: &'a [u8],

    /// The data following the content. Empty for the indefinite form.
    pub tail: &'a [u8],
}

impl<'a> Length<'a> {
    /// Takes the length octets from the beginning of `data`.
    ///
    /// The indefinite form is only accepted if `bered` is true. The
    /// content of the definite form has to be present in full.
    pub fn take_from(data: &'a [u8], bered: bool) -> Result<Self, Error> {
        match decode_length(data) {
            Ok((len, llen, rest)) => {
                if len > rest.len() {
                    return xerr!(Err(Error::not_enough(
                        "encoded length is longer than data"
                    )))
                }
                let (content, tail) = rest.split_at(len);
                Ok(Length { llen, indefinite: false, content, tail })
            }
            Err(err) if err.kind() == ErrorKind::LenIndefForm && bered => {
                Ok(Length {
                    llen: 1, indefinite: true, content: &data[1..], tail: &[]
                })
            }
            Err(err) => Err(err)
        }
    }
}


//------------ Helpers -------------------------------------------------------

/// Returns a closure locating an error at the given value.
pub(crate) fn locate<'s>(
    schema: &'s Schema, path: &'s DecodePath, offset: usize
) -> impl Fn(Error) -> Error + 's {
    move |err| err.at(schema.type_name(), path, offset)
}

/// Returns whether there is no more content.
///
/// For the indefinite form, this is the case at an end-of-contents marker
/// or if the data has run out.
pub(crate) fn at_end(data: &[u8], indefinite: bool) -> bool {
    data.is_empty() || (indefinite && data.starts_with(EOC))
}

/// Finishes the content of a constructed value.
///
/// Checks that all content was used or that there is an end-of-contents
/// marker for the indefinite form. Returns the length of the marker and
/// the data following the value.
pub(crate) fn finish_content<'a>(
    length: &Length<'a>, rest: &'a [u8], type_name: Cow<'static, str>,
    path: &DecodePath, offset: usize,
) -> Result<(usize, &'a [u8]), Error> {
    if length.indefinite {
        if !rest.starts_with(EOC) {
            return xerr!(Err(Error::decode("no EOC").at(type_name, path, offset)))
        }
        Ok((EOC.len(), &rest[EOC.len()..]))
    }
    else {
        if !rest.is_empty() {
            return xerr!(Err(
                Error::decode("remaining data").at(type_name, path, offset)
            ))
        }
        Ok((0, length.tail))
    }
}
