//! Decoding of the primitive types.
//!
//! The string types and the time types may also use the constructed form
//! in BER. Because the content is always reassembled into a single octet
//! sequence, they are decoded here, too.

use bytes::{Bytes, BytesMut};
use crate::context::Session;
use crate::error::{DecodePath, Error, ErrorKind};
use crate::int;
use crate::oid::Oid;
use crate::schema::{Kind, Schema};
use crate::string::BitString;
use crate::tag::Tag;
use crate::value::{Content, Decoded, Value};
use super::{at_end, decode_tlv, finish_content, locate, Length};


//------------ decode_primitive ----------------------------------------------

pub(super) fn decode_primitive<'a>(
    schema: &Schema,
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    let own = match schema.tag() {
        Some(tag) => tag,
        None => return xerr!(Err(at(Error::decode("untagged type"))))
    };
    let (tag, rest) = Tag::take_from(data).map_err(&at)?;
    let tlen = tag.encoded_len();
    if tag != own {
        if tag == own.to_constructed() && has_constructed_form(schema.kind()) {
            return decode_constructed(schema, tlen, rest, offset, path, sess)
        }
        return xerr!(Err(at(Error::tag_mismatch())))
    }
    let Length { llen, content, tail, .. } = Length::take_from(
        rest, false
    ).map_err(&at)?;
    let bered = sess.ctx.bered;
    let mut decoded = Decoded {
        offset, tlen, llen, vlen: content.len(), ..Default::default()
    };
    let content = match schema.kind() {
        Kind::Boolean => {
            if content.len() != 1 {
                return xerr!(Err(at(Error::new(
                    ErrorKind::InvalidLength,
                    "Boolean's length must be equal to 1"
                ))))
            }
            match content[0] {
                0 => Content::Boolean(false),
                0xFF => Content::Boolean(true),
                _ if bered => {
                    log::debug!("non-canonical BOOLEAN at {}", offset);
                    decoded.ber_encoded = true;
                    Content::Boolean(true)
                }
                _ => {
                    return xerr!(Err(at(Error::decode(
                        "unacceptable Boolean value"
                    ))))
                }
            }
        }
        Kind::Integer { bounds, .. } => {
            let value = int::from_content(content).map_err(&at)?;
            bounds.check(&value).map_err(&at)?;
            Content::Integer(value)
        }
        Kind::Enumerated { named } => {
            let value = int::from_content(content).map_err(&at)?;
            if int::name_of(named, &value).is_none() {
                return xerr!(Err(at(Error::decode(
                    format!("unknown integer value: {}", value)
                ))))
            }
            Content::Integer(value)
        }
        Kind::BitString { .. } => {
            Content::BitString(BitString::from_content(content).map_err(&at)?)
        }
        Kind::Null => {
            if !content.is_empty() {
                return xerr!(Err(at(Error::new(
                    ErrorKind::InvalidLength, "Null must have zero length"
                ))))
            }
            Content::Null
        }
        Kind::Oid => {
            let (oid, ber) = Oid::from_content(content, bered).map_err(&at)?;
            if ber {
                log::debug!("non-minimal OID arc at {}", offset);
                decoded.ber_encoded = true;
            }
            Content::Oid(oid)
        }
        _ => {
            octets_content(
                schema, Bytes::copy_from_slice(content), bered, &mut decoded
            ).map_err(&at)?
        }
    };
    Ok((Value::from_decoded(schema.clone(), content, decoded), tail))
}

/// Returns whether BER allows the constructed form for the kind.
fn has_constructed_form(kind: &Kind) -> bool {
    matches!(
        kind,
        Kind::OctetString { .. } | Kind::BitString { .. } | Kind::String { .. }
        | Kind::UtcTime | Kind::GeneralizedTime
    )
}

/// Converts the octets of an octet string based type into content.
fn octets_content(
    schema: &Schema, octets: Bytes, bered: bool, decoded: &mut Decoded,
) -> Result<Content, Error> {
    match schema.kind() {
        Kind::OctetString { bounds } => {
            bounds.check(&octets.len())?;
            Ok(Content::OctetString(octets))
        }
        Kind::String { kind, bounds } => {
            let len = kind.char_len(&octets).map_err(|err| {
                Error::decode(err.message())
            })?;
            bounds.check(&len)?;
            Ok(Content::String(octets))
        }
        Kind::UtcTime | Kind::GeneralizedTime => {
            let time_type = match schema.kind().time_type() {
                Some(time_type) => time_type,
                None => return Err(Error::decode("not a time type"))
            };
            let (time, ber) = time_type.parse(&octets, bered)?;
            if ber {
                log::debug!("BER form of {}", time_type.name());
                decoded.ber_encoded = true;
                decoded.ber_raw = Some(octets);
            }
            Ok(Content::Time(time))
        }
        _ => {
            xerr!(Err(Error::decode(
                format!("{} is not a string type", schema.type_name())
            )))
        }
    }
}


//------------ decode_constructed --------------------------------------------

/// Decodes the constructed form of a string.
///
/// The content consists of chunks that are OCTET STRING values or, for a
/// BIT STRING, BIT STRING values. The chunks may be constructed
/// themselves.
fn decode_constructed<'a>(
    schema: &Schema,
    tlen: usize,
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    if !sess.ctx.bered {
        return xerr!(Err(at(Error::decode(
            "unallowed BER constructed encoding"
        ))))
    }
    let length = Length::take_from(data, true).map_err(&at)?;
    let is_bits = matches!(schema.kind(), Kind::BitString { .. });
    if is_bits && !length.indefinite && length.content.is_empty() {
        return xerr!(Err(at(Error::not_enough("zero length"))))
    }
    let chunk_schema = if is_bits {
        Schema::bit_string()
    }
    else {
        Schema::octet_string()
    };
    let start = offset + tlen + length.llen;
    let mut sub_offset = start;
    let mut chunks = Vec::new();
    let mut v = length.content;
    while !at_end(v, length.indefinite) {
        let sub_path = path.join(chunks.len());
        let (chunk, rest) = decode_tlv(
            &chunk_schema, v, sub_offset, &sub_path, sess
        ).map_err(|err| {
            if err.kind() == ErrorKind::TagMismatch {
                Error::decode(format!(
                    "expected {} encoded chunk", chunk_schema.type_name()
                )).at(schema.type_name(), &sub_path, sub_offset)
            }
            else {
                err
            }
        })?;
        sub_offset += chunk.tlvlen();
        chunks.push(chunk);
        v = rest;
    }
    if is_bits && chunks.is_empty() {
        return xerr!(Err(at(Error::decode("no chunks"))))
    }
    let (eoc, tail) = finish_content(
        &length, v, schema.type_name(), path, offset
    )?;
    log::debug!(
        "constructed {} with {} chunks at {}",
        schema.type_name(), chunks.len(), offset
    );
    let mut decoded = Decoded {
        offset,
        tlen,
        llen: length.llen,
        vlen: sub_offset - start + eoc,
        lenindef: length.indefinite,
        ber_encoded: true,
        ..Default::default()
    };
    let content = if is_bits {
        let bits: Vec<_> = chunks.iter().filter_map(Value::as_bit_string)
            .collect();
        Content::BitString(BitString::concat(&bits).map_err(&at)?)
    }
    else {
        let mut octets = BytesMut::new();
        for chunk in &chunks {
            if let Some(bytes) = chunk.as_bytes() {
                octets.extend_from_slice(bytes)
            }
        }
        octets_content(schema, octets.freeze(), true, &mut decoded)
            .map_err(&at)?
    };
    Ok((Value::from_decoded(schema.clone(), content, decoded), tail))
}
