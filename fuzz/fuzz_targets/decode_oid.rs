#![no_main]

use libfuzzer_sys::fuzz_target;
use asnder::{Context, Oid, Schema};

fuzz_target!(|data: &[u8]| {
    let der = Schema::oid().decode(data, &Context::default());
    let ber = Schema::oid().decode(data, &Context::ber());
    if der.is_ok() {
        assert!(ber.is_ok());
    }

    if let Ok((value, _)) = ber.as_ref() {
        let oid = value.as_oid().unwrap();
        let parsed: Oid = oid.to_string().parse().unwrap();
        assert_eq!(&parsed, oid);
        if let Ok((strict, _)) = der.as_ref() {
            assert_eq!(strict, value);
        }
    }
});
