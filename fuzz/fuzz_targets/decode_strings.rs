#![no_main]

use libfuzzer_sys::fuzz_target;
use asnder::{Context, Schema, StringKind};

macro_rules! decode_strings {
    ( $data:expr, [ $( $ctx:expr ),* ] ) => {{
        $(
            let ctx = $ctx;
            if let Ok((value, _)) = Schema::bit_string().decode($data, &ctx) {
                let bits = value.as_bit_string().unwrap();
                assert!(bits.unused() < 8);
                assert!(bits.octet_len() > 0 || bits.unused() == 0);
            }
            if let Ok((value, _)) = Schema::octet_string().decode($data, &ctx) {
                let encoded = value.encode().unwrap();
                assert!(encoded.len() <= value.tlvlen() || value.lenindef());
            }
            for kind in [
                StringKind::Ia5, StringKind::Numeric, StringKind::PRINTABLE,
                StringKind::Utf8, StringKind::Bmp, StringKind::Universal,
            ] {
                if let Ok((value, _)) = Schema::string(kind).decode($data, &ctx) {
                    assert!(value.text().is_some());
                }
            }
            let _ = Schema::utc_time().decode($data, &ctx);
            let _ = Schema::generalized_time().decode($data, &ctx);
        )*
    }}

}

fuzz_target!(|data: &[u8]| {
    decode_strings!(data, [Context::ber(), Context::default()]);
});
