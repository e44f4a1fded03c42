#![no_main]

use libfuzzer_sys::fuzz_target;
use asnder::{Context, Schema};

fuzz_target!(|data: &[u8]| {
    for ctx in [Context::default(), Context::ber()] {
        let res = Schema::integer().decode(data, &ctx);
        if let Ok((value, rest)) = res {
            assert_eq!(value.tlvlen() + rest.len(), data.len());
            let encoded = value.encode().unwrap();
            assert_eq!(encoded, &data[..value.tlvlen()]);
            let _ = value.to_i64();
            let _ = value.to_u64();
        }
        let _ = Schema::enumerated(vec![("zero", 0), ("one", 1)])
            .decode(data, &ctx);
    }
});
