//! Generates an encoded object identifier.
//!
//! Provide a sequence of object identifiers in ‘dot integer’ notation and
//! you will receive the DER encoding for each of them as a byte array.

use std::env;
use asnder::{Oid, Value};

fn process_one(arg: &str) -> Result<(), String> {
    let oid: Oid = arg.parse().map_err(|err: asnder::Error| {
        err.message().to_string()
    })?;
    let encoded = Value::oid(oid).encode().map_err(|err| err.to_string())?;

    let mut first = true;
    print!("[");
    for item in encoded {
        if !first { print!(", "); }
        else { first = false }
        print!("0x{:02X}", item);
    }
    println!("]");

    Ok(())
}

fn main() {
    for arg in env::args().skip(1) {
        if let Err(err) = process_one(arg.as_ref()) {
            println!("{}: {}.", arg, err)
        }
    }
}
