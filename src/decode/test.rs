//! Tests for decoding.
#![cfg(test)]

use super::*;
use crate::context::{Context, Defines, PathPattern};
use crate::oid::Oid;
use crate::string::BitString;
use crate::time::DateTime;


fn oid(s: &str) -> Oid {
    s.parse().unwrap()
}

fn der() -> Context {
    Context::default()
}


//------------ Primitive Values ----------------------------------------------

#[test]
fn negative_integer() {
    let value = Value::integer(-123);
    assert_eq!(value.encode().unwrap(), b"\x02\x01\x85");
    let decoded = Schema::integer().decode_exact(
        b"\x02\x01\x85", &der()
    ).unwrap();
    assert_eq!(decoded.to_i64(), Some(-123));
    assert_eq!(decoded, value);
    assert_eq!(decoded.tlen(), 1);
    assert_eq!(decoded.llen(), 1);
    assert_eq!(decoded.vlen(), 1);
}

#[test]
fn bit_string_with_unused_bits() {
    let bits = BitString::from_bits("010110000000").unwrap();
    let value = Value::bit_string(bits);
    assert_eq!(value.encode().unwrap(), b"\x03\x03\x04\x58\x00");
    let decoded = Schema::bit_string().decode_exact(
        b"\x03\x03\x04\x58\x00", &der()
    ).unwrap();
    let bits = decoded.as_bit_string().unwrap();
    assert_eq!(bits.bit_len(), 12);
    assert!(decoded.bit(1));
    assert!(!decoded.bit(0));
    assert!(decoded.bit(3));
    assert!(!decoded.bit(11));
}

#[test]
fn object_identifier() {
    let value = Value::oid(oid("1.2.3"));
    assert_eq!(value.encode().unwrap(), b"\x06\x02\x2A\x03");
    let decoded = Schema::oid().decode_exact(
        b"\x06\x02\x2A\x03", &der()
    ).unwrap();
    assert_eq!(decoded.to_string(), "1.2.3");
    assert_eq!(
        Oid::new(&[3, 1]).unwrap_err().kind(),
        ErrorKind::InvalidOid
    );
}

#[test]
fn non_minimal_oid_arc() {
    let data = b"\x06\x03\x2A\x80\x03";
    assert_eq!(
        Schema::oid().decode_exact(data, &der()).unwrap_err().kind(),
        ErrorKind::InvalidOid
    );
    let value = Schema::oid().decode_exact(data, &Context::ber()).unwrap();
    assert_eq!(value.as_oid(), Some(&oid("1.2.3")));
    assert!(value.ber_encoded());
}

#[test]
fn non_canonical_integer() {
    let err = Schema::integer().decode_exact(
        b"\x02\x02\x00\x01", &der()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    let err = Schema::integer().decode_exact(
        b"\x02\x02\xFF\x80", &der()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    let err = Schema::integer().decode_exact(
        b"\x02\x02\x00\x01", &Context::ber()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    let err = Schema::integer().decode_exact(b"\x02\x00", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnoughData);
}

#[test]
fn long_form_length() {
    let err = Schema::integer().decode_exact(
        b"\x02\x81\x01\x05", &Context::ber()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.message(), "long form instead of short one");
}

#[test]
fn boolean_values() {
    let schema = Schema::boolean();
    assert_eq!(
        schema.decode_exact(b"\x01\x01\xFF", &der()).unwrap().as_bool(),
        Some(true)
    );
    assert_eq!(
        schema.decode_exact(b"\x01\x02\xFF\xFF", &der()).unwrap_err().kind(),
        ErrorKind::InvalidLength
    );
    assert_eq!(
        schema.decode_exact(b"\x01\x01\x01", &der()).unwrap_err().kind(),
        ErrorKind::Decode
    );
    let value = schema.decode_exact(b"\x01\x01\x01", &Context::ber()).unwrap();
    assert_eq!(value.as_bool(), Some(true));
    assert!(value.ber_encoded());
}

#[test]
fn null_length() {
    assert!(Schema::null().decode_exact(b"\x05\x00", &der()).is_ok());
    assert_eq!(
        Schema::null().decode_exact(b"\x05\x01\x00", &der()).unwrap_err()
            .kind(),
        ErrorKind::InvalidLength
    );
}

#[test]
fn enumerated_values() {
    let schema = Schema::enumerated(vec![("one", 1), ("two", 2)]);
    let value = schema.decode_exact(b"\x0A\x01\x02", &der()).unwrap();
    assert_eq!(value.named(), Some("two"));
    let err = schema.decode_exact(b"\x0A\x01\x03", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.message(), "unknown integer value: 3");
}

#[test]
fn value_bounds() {
    let schema = Schema::integer().with_value_bounds(
        Some(0.into()), Some(10.into())
    );
    assert!(schema.decode_exact(b"\x02\x01\x0A", &der()).is_ok());
    let err = schema.decode_exact(b"\x02\x01\x0B", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bounds);
}

#[test]
fn size_bounds() {
    let schema = Schema::octet_string().with_size_bounds(2, Some(3));
    assert!(schema.decode_exact(b"\x04\x02\xAA\xBB", &der()).is_ok());
    assert_eq!(
        schema.decode_exact(b"\x04\x01\xAA", &der()).unwrap_err().kind(),
        ErrorKind::Bounds
    );
    let schema = Schema::sequence_of(Schema::integer())
        .with_size_bounds(0, Some(1));
    assert_eq!(
        schema.decode_exact(
            b"\x30\x06\x02\x01\x01\x02\x01\x02", &der()
        ).unwrap_err().kind(),
        ErrorKind::Bounds
    );
}

#[test]
fn string_charset() {
    use crate::string::StringKind;

    let schema = Schema::string(StringKind::PRINTABLE);
    let value = schema.decode_exact(b"\x13\x02hi", &der()).unwrap();
    assert_eq!(value.text().as_deref(), Some("hi"));
    let err = schema.decode_exact(b"\x13\x02h@", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn tag_mismatch() {
    let err = Schema::integer().decode(b"\x01\x01\xFF", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagMismatch);
    assert_eq!(err.offset(), Some(0));
}

#[test]
fn truncated_data() {
    let err = Schema::integer().decode(b"\x02\x05\x01", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnoughData);
    let err = Schema::integer().decode(b"", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnoughData);
}

#[test]
fn decode_exact_trailing_data() {
    let err = Schema::integer().decode_exact(
        b"\x02\x01\x05\x00", &der()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExceedingData);
    let (value, rest) = Schema::integer().decode(
        b"\x02\x01\x05\x00", &der()
    ).unwrap();
    assert_eq!(value.to_i64(), Some(5));
    assert_eq!(rest, b"\x00");
}


//------------ Constructed Strings and Times ---------------------------------

#[test]
fn constructed_octet_string() {
    let indef = b"\x24\x80\x04\x01\xAA\x04\x01\xBB\x00\x00";
    let def = b"\x24\x06\x04\x01\xAA\x04\x01\xBB";
    let schema = Schema::octet_string();
    assert_eq!(
        schema.decode_exact(def, &der()).unwrap_err().message(),
        "unallowed BER constructed encoding"
    );
    for data in [&indef[..], &def[..]] {
        let value = schema.decode_exact(data, &Context::ber()).unwrap();
        assert_eq!(value.as_bytes().unwrap().as_ref(), b"\xAA\xBB");
        assert!(value.ber_encoded());
        assert_eq!(value.tlvlen(), data.len());
        assert_eq!(value.encode().unwrap(), b"\x04\x02\xAA\xBB");
    }
    assert!(schema.decode_exact(indef, &Context::ber()).unwrap().lenindef());
}

#[test]
fn constructed_octet_string_bad_chunk() {
    let err = Schema::octet_string().decode_exact(
        b"\x24\x03\x02\x01\x01", &Context::ber()
    ).unwrap_err();
    assert_eq!(err.message(), "expected OctetString encoded chunk");
}

#[test]
fn constructed_bit_string() {
    let data = b"\x23\x08\x03\x02\x00\xAA\x03\x02\x04\xB0";
    let value = Schema::bit_string().decode_exact(
        data, &Context::ber()
    ).unwrap();
    let bits = value.as_bit_string().unwrap();
    assert_eq!(bits.bit_len(), 12);
    assert_eq!(bits.octet_slice(), b"\xAA\xB0");
    assert!(value.ber_encoded());
    assert_eq!(
        Schema::bit_string().decode_exact(
            b"\x23\x00", &Context::ber()
        ).unwrap_err().kind(),
        ErrorKind::NotEnoughData
    );
}

#[test]
fn ber_utc_time() {
    let data = b"\x17\x0B9912312359Z";
    assert_eq!(
        Schema::utc_time().decode_exact(data, &der()).unwrap_err().kind(),
        ErrorKind::Decode
    );
    let value = Schema::utc_time().decode_exact(data, &Context::ber()).unwrap();
    assert_eq!(
        value.as_time(),
        Some(DateTime::new(1999, 12, 31, 23, 59, 0).unwrap())
    );
    assert!(value.ber_encoded());
    assert_eq!(value.ber_raw().unwrap().as_ref(), b"9912312359Z");
    assert_eq!(value.encode().unwrap(), b"\x17\x0D991231235900Z");
}

#[test]
fn der_generalized_time() {
    let data = b"\x18\x1120000101120000.5Z";
    let value = Schema::generalized_time().decode_exact(data, &der()).unwrap();
    let time = value.as_time().unwrap();
    assert_eq!(time.microsecond(), 500_000);
    assert!(!value.ber_encoded());
    assert_eq!(value.encode().unwrap(), data);
}


//------------ Sequences -----------------------------------------------------

#[test]
fn indefinite_sequence() {
    let schema = Schema::sequence(vec![("a", Schema::integer())]);
    let data = b"\x30\x80\x02\x01\x01\x00\x00";
    assert_eq!(
        schema.decode_exact(data, &der()).unwrap_err().kind(),
        ErrorKind::LenIndefForm
    );
    let value = schema.decode_exact(data, &Context::ber()).unwrap();
    assert_eq!(value.fields().count(), 1);
    assert!(value.lenindef());
    assert!(value.bered());
    assert_eq!(value.tlvlen(), 7);
    assert_eq!(value.get("a").unwrap().unwrap().offset(), 2);
    assert_eq!(value.encode().unwrap(), b"\x30\x03\x02\x01\x01");
}

#[test]
fn indefinite_sequence_without_eoc() {
    let schema = Schema::sequence(vec![("a", Schema::integer())]);
    let err = schema.decode_exact(
        b"\x30\x80\x02\x01\x01", &Context::ber()
    ).unwrap_err();
    assert_eq!(err.message(), "no EOC");
}

#[test]
fn default_value_present() {
    let schema = Schema::sequence(vec![
        ("b", Schema::boolean().with_default(false).unwrap()),
    ]);
    let data = b"\x30\x03\x01\x01\x00";
    let err = schema.decode_exact(data, &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.message(), "DEFAULT value met");
    assert_eq!(err.offset(), Some(2));

    let ctx = Context::default().with_allow_default_values(true);
    let value = schema.decode_exact(data, &ctx).unwrap();
    assert!(value.ber_encoded());
    assert_eq!(value.get("b").unwrap().unwrap().as_bool(), Some(false));
    assert_eq!(value.encode().unwrap(), b"\x30\x00");

    let value = schema.decode_exact(b"\x30\x00", &der()).unwrap();
    assert!(!value.contains("b"));
    assert_eq!(value.get("b").unwrap().unwrap().as_bool(), Some(false));
}

#[test]
fn optional_fields() {
    let schema = Schema::sequence(vec![
        ("a", Schema::integer().optional()),
        ("b", Schema::boolean()),
        ("c", Schema::integer().implicit(Tag::ctx_primitive(0)).optional()),
    ]);
    let value = schema.decode_exact(b"\x30\x03\x01\x01\xFF", &der()).unwrap();
    assert!(!value.contains("a"));
    assert!(!value.contains("c"));
    let value = schema.decode_exact(
        b"\x30\x06\x01\x01\xFF\x80\x01\x07", &der()
    ).unwrap();
    assert_eq!(value.get("c").unwrap().unwrap().to_i64(), Some(7));
    assert_eq!(value.get("c").unwrap().unwrap().offset(), 5);
    let err = schema.decode_exact(b"\x30\x03\x02\x01\x01", &der()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnoughData);
    assert_eq!(err.decode_path().to_string(), "b");
}

#[test]
fn sequence_remaining_data() {
    let schema = Schema::sequence(vec![("a", Schema::integer())]);
    let err = schema.decode_exact(
        b"\x30\x06\x02\x01\x01\x02\x01\x02", &der()
    ).unwrap_err();
    assert_eq!(err.message(), "remaining data");
}

#[test]
fn error_location() {
    let schema = Schema::sequence(vec![("a", Schema::integer())]);
    let err = schema.decode_exact(
        b"\x30\x04\x02\x02\x00\x01", &der()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(err.type_name(), Some("Integer"));
    assert_eq!(err.decode_path().to_string(), "a");
    assert_eq!(err.offset(), Some(2));
    assert_eq!(
        err.to_string(),
        "DecodeError Integer (a) (at 2): non normalized integer"
    );
}


//------------ Sets ----------------------------------------------------------

fn two_field_set() -> Schema {
    Schema::set(vec![
        ("a", Schema::integer().implicit(Tag::ctx_primitive(1))),
        ("b", Schema::boolean().implicit(Tag::ctx_primitive(0))),
    ])
}

#[test]
fn set_ordering() {
    let schema = two_field_set();
    let ordered = b"\x31\x06\x80\x01\xFF\x81\x01\x05";
    let unordered = b"\x31\x06\x81\x01\x05\x80\x01\xFF";
    let value = schema.decode_exact(ordered, &der()).unwrap();
    assert!(!value.ber_encoded());
    assert_eq!(value.get("a").unwrap().unwrap().to_i64(), Some(5));

    let err = schema.decode_exact(unordered, &der()).unwrap_err();
    assert_eq!(err.message(), "unordered SET");

    let ctx = Context::default().with_allow_unordered_set(true);
    let value = schema.decode_exact(unordered, &ctx).unwrap();
    assert!(value.ber_encoded());
    assert_eq!(value.encode().unwrap(), ordered);
}

#[test]
fn set_repeated_and_missing() {
    let schema = two_field_set();
    let err = schema.decode_exact(
        b"\x31\x06\x80\x01\x00\x80\x01\xFF", &der()
    ).unwrap_err();
    assert_eq!(err.message(), "repeated SET field");
    let err = schema.decode_exact(b"\x31\x03\x80\x01\xFF", &der()).unwrap_err();
    assert_eq!(err.message(), "not all values are ready");
}

#[test]
fn set_of_ordering() {
    let schema = Schema::set_of(Schema::integer());
    let unordered = b"\x31\x06\x02\x01\x02\x02\x01\x01";
    let err = schema.decode_exact(unordered, &der()).unwrap_err();
    assert_eq!(err.message(), "unordered SET OF");
    assert_eq!(err.decode_path().to_string(), "1");

    let value = schema.decode_exact(unordered, &Context::ber()).unwrap();
    assert_eq!(value.len(), 2);
    assert!(value.ber_encoded());
    assert_eq!(
        value.encode().unwrap(), b"\x31\x06\x02\x01\x01\x02\x01\x02"
    );
}


//------------ Explicit Tags -------------------------------------------------

#[test]
fn explicit_tag() {
    let schema = Schema::integer().explicit(Tag::ctx_primitive(0));
    let data = b"\xA0\x03\x02\x01\x05";
    let value = schema.decode_exact(data, &der()).unwrap();
    assert_eq!(value.to_i64(), Some(5));
    assert!(value.expled());
    assert_eq!(value.expl_offset(), 0);
    assert_eq!(value.offset(), 2);
    assert_eq!(value.expl_vlen(), 3);
    assert_eq!(value.fulllen(), 5);
    assert_eq!(value.encode().unwrap(), data);
}

#[test]
fn explicit_indefinite() {
    let schema = Schema::integer().explicit(Tag::ctx_primitive(0));
    let data = b"\xA0\x80\x02\x01\x05\x00\x00";
    assert_eq!(
        schema.decode_exact(data, &der()).unwrap_err().kind(),
        ErrorKind::LenIndefForm
    );
    let value = schema.decode_exact(data, &Context::ber()).unwrap();
    assert!(value.expl_lenindef());
    assert_eq!(value.expl_vlen(), 5);
    assert_eq!(value.fulllen(), 7);
    assert!(value.bered());
}

#[test]
fn explicit_out_of_bound() {
    let schema = Schema::integer().explicit(Tag::ctx_primitive(0));
    let data = b"\xA0\x04\x02\x01\x05\xFF";
    let err = schema.decode_exact(data, &der()).unwrap_err();
    assert_eq!(err.message(), "explicit tag out-of-bound, longer than data");
    let ctx = Context::default().with_allow_expl_oob(true);
    let value = schema.decode_exact(data, &ctx).unwrap();
    assert_eq!(value.to_i64(), Some(5));
    assert_eq!(value.fulllen(), 6);
}


//------------ CHOICE and ANY ------------------------------------------------

#[test]
fn choice() {
    let schema = Schema::choice(vec![
        ("int", Schema::integer()),
        ("bool", Schema::boolean()),
    ]);
    let value = schema.decode_exact(b"\x01\x01\xFF", &der()).unwrap();
    assert_eq!(value.choice(), Some("bool"));
    assert_eq!(value.chosen().unwrap().as_bool(), Some(true));
    assert_eq!(value.tlen(), 0);
    assert_eq!(value.llen(), 0);
    assert_eq!(value.tlvlen(), 3);
    assert_eq!(
        schema.decode_exact(b"\x05\x00", &der()).unwrap_err().kind(),
        ErrorKind::TagMismatch
    );
}

#[test]
fn any_indefinite() {
    let data = b"\x30\x80\x02\x01\x01\x00\x00";
    assert_eq!(
        Schema::any().decode_exact(data, &der()).unwrap_err().kind(),
        ErrorKind::LenIndefForm
    );
    let value = Schema::any().decode_exact(data, &Context::ber()).unwrap();
    assert_eq!(value.tlvlen(), 7);
    assert!(value.lenindef());
    assert_eq!(value.as_bytes().unwrap().as_ref(), &data[..]);
}

#[test]
fn any_nested_indefinite() {
    let data = b"\x30\x80\x30\x80\x05\x00\x00\x00\x00\x00\x02\x01\x01";
    let (value, rest) = Schema::any().decode(data, &Context::ber()).unwrap();
    assert_eq!(value.tlvlen(), 10);
    assert_eq!(rest, b"\x02\x01\x01");
}


//------------ DEFINED BY ----------------------------------------------------

fn algorithm_identifier(defines: bool) -> Schema {
    let mut algorithm = Schema::oid();
    if defines {
        algorithm = algorithm.with_defines(vec![Defines::new(
            ["parameters"], vec![(oid("1.2.3"), Schema::integer())]
        )]);
    }
    Schema::sequence(vec![
        ("algorithm", algorithm),
        ("parameters", Schema::any().optional()),
    ])
}

const ALGORITHM: &[u8] = b"\x30\x07\x06\x02\x2A\x03\x02\x01\x05";

#[test]
fn defined_by_schema() {
    let value = algorithm_identifier(true).decode_exact(
        ALGORITHM, &der()
    ).unwrap();
    let params = value.get("parameters").unwrap().unwrap();
    let (by, defined) = params.defined().unwrap();
    assert_eq!(by, &oid("1.2.3"));
    assert_eq!(defined.to_i64(), Some(5));
    assert_eq!(defined.offset(), 6);
}

#[test]
fn defined_by_context() {
    let schema = algorithm_identifier(false);
    let value = schema.decode_exact(ALGORITHM, &der()).unwrap();
    assert!(value.get("parameters").unwrap().unwrap().defined().is_none());

    let ctx = Context::default().with_defines_by_path(
        PathPattern::new().name("algorithm"),
        vec![Defines::new(
            ["parameters"], vec![(oid("1.2.3"), Schema::integer())]
        )]
    );
    let value = schema.decode_exact(ALGORITHM, &ctx).unwrap();
    let (_, defined) = value.get("parameters").unwrap().unwrap()
        .defined().unwrap();
    assert_eq!(defined.to_i64(), Some(5));
}

#[test]
fn defined_by_unknown_oid() {
    let value = algorithm_identifier(true).decode_exact(
        b"\x30\x07\x06\x02\x2A\x04\x02\x01\x05", &der()
    ).unwrap();
    assert!(value.get("parameters").unwrap().unwrap().defined().is_none());
}

#[test]
fn defined_by_failure() {
    let err = algorithm_identifier(true).decode_exact(
        b"\x30\x07\x06\x02\x2A\x03\x01\x01\xFF", &der()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagMismatch);
    assert_eq!(
        err.decode_path().to_string(), "parameters:DEFINED BY 1.2.3"
    );
    assert_eq!(err.offset(), Some(6));
}

#[test]
fn defined_by_octet_string() {
    let schema = Schema::sequence(vec![
        ("type", Schema::oid().with_defines(vec![Defines::new(
            ["value"], vec![(oid("1.2.3"), Schema::integer())]
        )])),
        ("value", Schema::octet_string()),
    ]);
    let value = schema.decode_exact(
        b"\x30\x09\x06\x02\x2A\x03\x04\x03\x02\x01\x07", &der()
    ).unwrap();
    let (_, defined) = value.get("value").unwrap().unwrap().defined().unwrap();
    assert_eq!(defined.to_i64(), Some(7));
    assert_eq!(defined.offset(), 8);
}

#[test]
fn defined_by_set_of() {
    let schema = Schema::sequence(vec![
        ("type", Schema::oid().with_defines(vec![Defines::new(
            ["values"], vec![(oid("1.2.3"), Schema::integer())]
        )])),
        ("values", Schema::set_of(Schema::any())),
    ]);
    let value = schema.decode_exact(
        b"\x30\x0C\x06\x02\x2A\x03\x31\x06\x02\x01\x01\x02\x01\x02", &der()
    ).unwrap();
    let values = value.get("values").unwrap().unwrap();
    assert!(values.defined().is_none());
    let defined: Vec<_> = values.items().iter().map(|item| {
        item.defined().unwrap().1.to_i64().unwrap()
    }).collect();
    assert_eq!(defined, vec![1, 2]);
    assert_eq!(values.items()[1].defined().unwrap().1.offset(), 11);
}

fn algorithm_set(defined: Schema) -> Schema {
    Schema::set(vec![
        ("algorithm", Schema::oid().with_defines(vec![Defines::new(
            ["parameters"], vec![(oid("1.2.3"), defined)]
        )])),
        ("parameters", Schema::any()),
    ])
}

#[test]
fn defined_by_set_parameters_first() {
    let value = algorithm_set(Schema::integer()).decode_exact(
        b"\x31\x07\x02\x01\x05\x06\x02\x2A\x03", &der()
    ).unwrap();
    let params = value.get("parameters").unwrap().unwrap();
    let (by, defined) = params.defined().unwrap();
    assert_eq!(by, &oid("1.2.3"));
    assert_eq!(defined.to_i64(), Some(5));
    assert_eq!(defined.offset(), 2);
}

#[test]
fn defined_by_set_algorithm_first() {
    let schema = algorithm_set(
        Schema::sequence(vec![("n", Schema::integer())])
    );
    let value = schema.decode_exact(
        b"\x31\x09\x06\x02\x2A\x03\x30\x03\x02\x01\x05", &der()
    ).unwrap();
    let (_, defined) = value.get("parameters").unwrap().unwrap()
        .defined().unwrap();
    assert_eq!(defined.offset(), 6);
    assert_eq!(defined.get("n").unwrap().unwrap().to_i64(), Some(5));
}

#[test]
fn defined_by_set_failure() {
    let err = algorithm_set(Schema::integer()).decode_exact(
        b"\x31\x07\x01\x01\xFF\x06\x02\x2A\x03", &der()
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TagMismatch);
    assert_eq!(
        err.decode_path().to_string(), "parameters:DEFINED BY 1.2.3"
    );
    assert_eq!(err.offset(), Some(2));
}
