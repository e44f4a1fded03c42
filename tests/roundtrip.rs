//! Property tests for encoding and decoding.

use asnder::{BitString, Context, Oid, Schema, Value};
use num_bigint::BigInt;
use proptest::prelude::*;

fn oid_arcs() -> impl Strategy<Value = Vec<u128>> {
    (0u128..=2, any::<u64>(), prop::collection::vec(any::<u64>(), 0..6))
        .prop_map(|(first, second, rest)| {
            let second = if first < 2 {
                u128::from(second % 40)
            }
            else {
                u128::from(second)
            };
            let mut arcs = vec![first, second];
            arcs.extend(rest.into_iter().map(u128::from));
            arcs
        })
}

proptest! {
    #[test]
    fn integer_roundtrip(value in any::<i128>()) {
        let encoded = Value::integer(value).encode().unwrap();
        let decoded = Schema::integer().decode_exact(
            &encoded, &Context::default()
        ).unwrap();
        prop_assert_eq!(decoded.as_bigint(), Some(&BigInt::from(value)));
        prop_assert_eq!(decoded.tlvlen(), encoded.len());
    }

    #[test]
    fn oid_roundtrip(arcs in oid_arcs()) {
        let oid = Oid::new(&arcs).unwrap();
        let encoded = Value::oid(oid.clone()).encode().unwrap();
        let decoded = Schema::oid().decode_exact(
            &encoded, &Context::default()
        ).unwrap();
        prop_assert_eq!(decoded.as_oid(), Some(&oid));
        let parsed: Oid = oid.to_string().parse().unwrap();
        prop_assert_eq!(parsed, oid);
    }

    #[test]
    fn octet_string_roundtrip(
        octets in prop::collection::vec(any::<u8>(), 0..300)
    ) {
        let value = Value::octet_string(octets.clone());
        let encoded = value.encode().unwrap();
        let decoded = Schema::octet_string().decode_exact(
            &encoded, &Context::default()
        ).unwrap();
        prop_assert_eq!(decoded.as_bytes().unwrap().as_ref(), &octets[..]);
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn bit_string_roundtrip(bits in "[01]{0,70}") {
        let value = Value::bit_string(BitString::from_bits(&bits).unwrap());
        let encoded = value.encode().unwrap();
        let decoded = Schema::bit_string().decode_exact(
            &encoded, &Context::default()
        ).unwrap();
        let decoded_bits = decoded.as_bit_string().unwrap();
        prop_assert_eq!(decoded_bits.bit_len(), bits.len());
        for (i, ch) in bits.chars().enumerate() {
            prop_assert_eq!(decoded.bit(i), ch == '1');
        }
    }

    #[test]
    fn chunked_octet_string(
        octets in prop::collection::vec(any::<u8>(), 0..100),
        split in any::<prop::sample::Index>(),
    ) {
        let (head, tail) = octets.split_at(split.index(octets.len() + 1));
        let mut encoded = vec![0x24, 0x80];
        for chunk in [head, tail] {
            encoded.push(0x04);
            encoded.push(chunk.len() as u8);
            encoded.extend_from_slice(chunk);
        }
        encoded.extend_from_slice(&[0, 0]);

        prop_assert!(
            Schema::octet_string().decode_exact(
                &encoded, &Context::default()
            ).is_err()
        );
        let decoded = Schema::octet_string().decode_exact(
            &encoded, &Context::ber()
        ).unwrap();
        prop_assert!(decoded.ber_encoded());
        prop_assert_eq!(decoded, Value::octet_string(octets.clone()));
    }

    #[test]
    fn sequence_roundtrip(
        version in any::<i64>(),
        name in prop::option::of(prop::collection::vec(any::<u8>(), 0..20)),
    ) {
        let schema = Schema::sequence(vec![
            ("version", Schema::integer()),
            ("name", Schema::octet_string().optional()),
        ]);
        let mut value = schema.empty().unwrap();
        value.set("version", version).unwrap();
        if let Some(name) = name {
            value.set("name", name).unwrap();
        }
        let encoded = value.encode().unwrap();
        let decoded = schema.decode_exact(
            &encoded, &Context::default()
        ).unwrap();
        prop_assert_eq!(&decoded, &value);
        prop_assert_eq!(decoded.encode().unwrap(), encoded);
    }
}
