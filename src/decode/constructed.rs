//! Decoding of the constructed types.
//!
//! This also contains the handling of DEFINED BY rules. When a field of a
//! SEQUENCE or SET has been decoded, the rules of its schema or the
//! context are consulted and any field they point to is registered with
//! the session. Once a field is decoded, the session is asked whether
//! there is a registration for its path and if so, its content is decoded
//! once more with the registered schema.

use bytes::Bytes;
use crate::context::{abs_decode_path, get_def_by_path, Session};
use crate::error::{DecodePath, Error, ErrorKind};
use crate::length::{decode_length, EOC};
use crate::schema::{Bounds, Field, Kind, Schema};
use crate::tag::Tag;
use crate::value::{Content, Decoded, Value};
use super::{at_end, decode_tlv, finish_content, locate, probe, Length};


//------------ CHOICE --------------------------------------------------------

pub(super) fn decode_choice<'a>(
    schema: &Schema,
    fields: &[Field],
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    if data.is_empty() {
        return xerr!(Err(at(Error::not_enough("no data at all"))))
    }
    let idx = match fields.iter().position(|field| {
        probe(field.schema(), data)
    }) {
        Some(idx) => idx,
        None => return xerr!(Err(at(Error::tag_mismatch())))
    };
    let field = &fields[idx];
    let sub_path = path.join(field.name());
    let (value, rest) = decode_tlv(
        field.schema(), data, offset, &sub_path, sess
    )?;
    let decoded = Decoded {
        offset, vlen: value.fulllen(), ..Default::default()
    };
    Ok((
        Value::from_decoded(
            schema.clone(),
            Content::Choice(Some((idx, Box::new(value)))),
            decoded
        ),
        rest
    ))
}


//------------ ANY -----------------------------------------------------------

/// Decodes an ANY value.
///
/// The complete encoding is kept. For the indefinite form, the nested
/// values are skipped up to the end-of-contents marker.
pub(super) fn decode_any<'a>(
    schema: &Schema,
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    let (tag, rest) = Tag::take_from(data).map_err(&at)?;
    let tlen = tag.encoded_len();
    let (tlvlen, lenindef) = match decode_length(rest) {
        Ok((len, llen, content)) => {
            if len > content.len() {
                return xerr!(Err(at(Error::not_enough(
                    "encoded length is longer than data"
                ))))
            }
            (tlen + llen + len, false)
        }
        Err(err) if err.kind() == ErrorKind::LenIndefForm => {
            if !sess.ctx.bered {
                return xerr!(Err(at(err)))
            }
            let mut v = &rest[1..];
            let mut sub_offset = offset + tlen + 1;
            while !v.starts_with(EOC) {
                if v.is_empty() {
                    return xerr!(Err(at(Error::decode("no EOC"))))
                }
                let (item, tail) = decode_any(schema, v, sub_offset, path, sess)?;
                sub_offset += item.tlvlen();
                v = tail;
            }
            log::debug!("indefinite length ANY at {}", offset);
            (data.len() - v.len() + EOC.len(), true)
        }
        Err(err) => return Err(at(err))
    };
    let decoded = Decoded {
        offset, vlen: tlvlen, lenindef, ..Default::default()
    };
    Ok((
        Value::from_decoded(
            schema.clone(),
            Content::Any(Bytes::copy_from_slice(&data[..tlvlen])),
            decoded
        ),
        &data[tlvlen..]
    ))
}


//------------ SEQUENCE ------------------------------------------------------

pub(super) fn decode_sequence<'a>(
    schema: &Schema,
    fields: &[Field],
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    let (tlen, length) = take_header(schema, data, sess).map_err(&at)?;
    let start = offset + tlen + length.llen;
    let mut v = length.content;
    let mut vlen = 0;
    let mut ber_encoded = false;
    let mut values: Vec<Option<Value>> = vec![None; fields.len()];
    for (idx, field) in fields.iter().enumerate() {
        let field_schema = field.schema();
        if field_schema.is_optional() && at_end(v, length.indefinite) {
            continue
        }
        let sub_path = path.join(field.name());
        let sub_offset = start + vlen;
        let (value, rest) = match decode_tlv(
            field_schema, v, sub_offset, &sub_path, sess
        ) {
            Ok(res) => res,
            Err(err) => {
                if err.kind() == ErrorKind::TagMismatch
                    && err.decode_path().len() == sub_path.len()
                    && field_schema.is_optional()
                {
                    log::trace!("skipping optional field {}", sub_path);
                    continue
                }
                return Err(err)
            }
        };
        let value = apply_defined(value, &sub_path, sess)?;
        vlen += value.fulllen();
        v = rest;
        if field_schema.is_default(&value) {
            ber_encoded |= check_default_met(&sub_path, sub_offset, sess)
                .map_err(|err| {
                    err.at(schema.type_name(), &sub_path, sub_offset)
                })?;
        }
        register_defines(field_schema, &value, &sub_path, sess);
        values[idx] = Some(value);
    }
    let (eoc, tail) = finish_content(
        &length, v, schema.type_name(), path, offset
    )?;
    let decoded = Decoded {
        offset,
        tlen,
        llen: length.llen,
        vlen: vlen + eoc,
        lenindef: length.indefinite,
        ber_encoded,
        ..Default::default()
    };
    Ok((
        Value::from_decoded(schema.clone(), Content::Fields(values), decoded),
        tail
    ))
}


//------------ SET -----------------------------------------------------------

pub(super) fn decode_set<'a>(
    schema: &Schema,
    fields: &[Field],
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    let (tlen, length) = take_header(schema, data, sess).map_err(&at)?;
    let start = offset + tlen + length.llen;
    let mut v = length.content;
    let mut vlen = 0;
    let mut ber_encoded = false;
    let mut values: Vec<Option<Value>> = vec![None; fields.len()];
    let mut prev: Option<&[u8]> = None;
    let mut pending = Vec::new();
    while !at_end(v, length.indefinite) {
        let sub_offset = start + vlen;
        let idx = match fields.iter().position(|field| {
            probe(field.schema(), v)
        }) {
            Some(idx) => idx,
            None => {
                return xerr!(Err(
                    Error::tag_mismatch().at(schema.type_name(), path, sub_offset)
                ))
            }
        };
        let field = &fields[idx];
        let sub_path = path.join(field.name());
        let sub_at = locate(schema, &sub_path, sub_offset);
        let (value, rest) = decode_tlv(
            field.schema(), v, sub_offset, &sub_path, sess
        )?;
        if sess.lookup(&sub_path).is_none() {
            pending.push(idx);
        }
        let value = apply_defined(value, &sub_path, sess)?;
        let raw = &v[..v.len() - rest.len()];
        if let Some(prev) = prev {
            if raw < prev {
                ber_encoded |= check_unordered("SET", sess).map_err(&sub_at)?;
            }
        }
        if values[idx].is_some() {
            return xerr!(Err(sub_at(Error::decode("repeated SET field"))))
        }
        if field.schema().is_default(&value) {
            ber_encoded |= check_default_met(&sub_path, sub_offset, sess)
                .map_err(&sub_at)?;
        }
        register_defines(field.schema(), &value, &sub_path, sess);
        vlen += value.fulllen();
        values[idx] = Some(value);
        prev = Some(raw);
        v = rest;
    }
    // Members are in tag order, so a field may precede the one defining it.
    for idx in pending {
        if let Some(value) = values[idx].take() {
            let sub_path = path.join(fields[idx].name());
            values[idx] = Some(apply_defined(value, &sub_path, sess)?);
        }
    }
    let (eoc, tail) = finish_content(
        &length, v, schema.type_name(), path, offset
    )?;
    let missing = fields.iter().zip(&values).any(|(field, value)| {
        value.is_none() && !field.schema().is_optional()
    });
    if missing {
        return xerr!(Err(at(Error::decode("not all values are ready"))))
    }
    let decoded = Decoded {
        offset,
        tlen,
        llen: length.llen,
        vlen: vlen + eoc,
        lenindef: length.indefinite,
        ber_encoded,
        ..Default::default()
    };
    Ok((
        Value::from_decoded(schema.clone(), Content::Fields(values), decoded),
        tail
    ))
}


//------------ SEQUENCE OF and SET OF ----------------------------------------

#[allow(clippy::too_many_arguments)]
pub(super) fn decode_sequence_of<'a>(
    schema: &Schema,
    element: &Schema,
    bounds: &Bounds<usize>,
    is_set: bool,
    data: &'a [u8],
    offset: usize,
    path: &DecodePath,
    sess: &mut Session,
) -> Result<(Value, &'a [u8]), Error> {
    let at = locate(schema, path, offset);
    let (tlen, length) = take_header(schema, data, sess).map_err(&at)?;
    let start = offset + tlen + length.llen;
    let mut v = length.content;
    let mut vlen = 0;
    let mut ber_encoded = false;
    let mut items = Vec::new();
    let mut prev: Option<&[u8]> = None;
    while !at_end(v, length.indefinite) {
        let sub_offset = start + vlen;
        let sub_path = path.join(items.len());
        let (value, rest) = decode_tlv(
            element, v, sub_offset, &sub_path, sess
        )?;
        let raw = &v[..v.len() - rest.len()];
        if is_set {
            if let Some(prev) = prev {
                if raw < prev {
                    ber_encoded |= check_unordered("SET OF", sess).map_err(
                        |err| err.at(schema.type_name(), &sub_path, sub_offset)
                    )?;
                }
            }
            prev = Some(raw);
        }
        vlen += value.fulllen();
        items.push(value);
        v = rest;
    }
    let (eoc, tail) = finish_content(
        &length, v, schema.type_name(), path, offset
    )?;
    bounds.check(&items.len()).map_err(&at)?;
    let decoded = Decoded {
        offset,
        tlen,
        llen: length.llen,
        vlen: vlen + eoc,
        lenindef: length.indefinite,
        ber_encoded,
        ..Default::default()
    };
    Ok((
        Value::from_decoded(schema.clone(), Content::Items(items), decoded),
        tail
    ))
}


//------------ Helpers -------------------------------------------------------

/// Takes tag and length of a constructed value.
///
/// Returns the tag length and the length.
fn take_header<'a>(
    schema: &Schema, data: &'a [u8], sess: &Session,
) -> Result<(usize, Length<'a>), Error> {
    let (tag, rest) = Tag::take_from(data)?;
    if Some(tag) != schema.tag() {
        return xerr!(Err(Error::tag_mismatch()))
    }
    let length = Length::take_from(rest, sess.ctx.bered)?;
    if length.indefinite {
        log::debug!("indefinite length {}", schema.type_name());
    }
    Ok((tag.encoded_len(), length))
}

/// Checks whether a field with its default value is acceptable.
///
/// Returns whether the value is BER encoded because of it.
fn check_default_met(
    path: &DecodePath, offset: usize, sess: &Session
) -> Result<bool, Error> {
    if sess.ctx.bered || sess.ctx.allow_default_values {
        log::debug!("DEFAULT value met at {} ({})", offset, path);
        Ok(true)
    }
    else {
        xerr!(Err(Error::decode("DEFAULT value met")))
    }
}

/// Checks whether out of order members are acceptable.
fn check_unordered(type_name: &str, sess: &Session) -> Result<bool, Error> {
    if sess.ctx.bered || sess.ctx.allow_unordered_set {
        log::debug!("unordered {}", type_name);
        Ok(true)
    }
    else {
        xerr!(Err(Error::decode(format!("unordered {}", type_name))))
    }
}


//------------ DEFINED BY ----------------------------------------------------

/// Registers the targets of DEFINED BY rules of a decoded field.
///
/// The rules of the field’s schema are used if there are any. Otherwise,
/// the first rule set of the context whose pattern matches the field’s
/// path is used. Only OBJECT IDENTIFIER values can define anything.
fn register_defines(
    schema: &Schema, value: &Value, path: &DecodePath, sess: &mut Session,
) {
    let ctx = sess.ctx;
    let rules = if !schema.defines().is_empty() {
        schema.defines()
    }
    else {
        match get_def_by_path(&ctx.defines_by_path, path) {
            Some(rules) => rules.as_slice(),
            None => return
        }
    };
    let oid = match value.content() {
        Content::Oid(oid) => oid,
        _ => return
    };
    for rule in rules {
        if let Some(target) = rule.schema_for(oid) {
            sess.register(
                abs_decode_path(&path.parent(), rule.path()),
                oid.clone(), target.clone()
            );
        }
    }
}

/// Decodes a value once more if a DEFINED BY rule points to it.
///
/// For SEQUENCE OF and SET OF values, every element is decoded.
fn apply_defined(
    mut value: Value, path: &DecodePath, sess: &mut Session,
) -> Result<Value, Error> {
    let (oid, schema) = match sess.lookup(path) {
        Some(found) => found,
        None => return Ok(value)
    };
    let is_list = matches!(
        value.schema().kind(), Kind::SequenceOf { .. } | Kind::SetOf { .. }
    );
    if is_list {
        if let Content::Items(ref mut items) = value.content {
            for (i, item) in items.iter_mut().enumerate() {
                let item_path = path.join(i).join(oid.clone());
                let defined = decode_defined(item, &schema, &item_path, sess)?;
                item.defined = Some(Box::new((oid.clone(), defined)));
            }
        }
    }
    else {
        let defined_path = path.join(oid.clone());
        let defined = decode_defined(&value, &schema, &defined_path, sess)?;
        value.defined = Some(Box::new((oid, defined)));
    }
    Ok(value)
}

fn decode_defined(
    value: &Value, schema: &Schema, path: &DecodePath, sess: &mut Session,
) -> Result<Value, Error> {
    let content_offset = value.offset() + value.tlen() + value.llen();
    let (data, offset) = match value.content() {
        Content::Any(octets) => (octets.clone(), value.offset()),
        Content::OctetString(octets) => (octets.clone(), content_offset),
        Content::BitString(bits) => (bits.octet_bytes(), content_offset + 1),
        _ => {
            return xerr!(Err(Error::decode(
                "DEFINED BY only applies to ANY, OCTET STRING, or BIT STRING"
            ).at(value.schema().type_name(), path, value.offset())))
        }
    };
    log::debug!("decoding {} as {}", path, schema.type_name());
    let (defined, rest) = decode_tlv(schema, &data, offset, path, sess)?;
    if !rest.is_empty() {
        return xerr!(Err(Error::decode("remaining data").at(
            schema.type_name(), path, offset + data.len() - rest.len()
        )))
    }
    Ok(defined)
}

