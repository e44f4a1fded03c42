//! Schema driven encoding and decoding of ASN.1 values.
//!
//! This crate encodes values in the Distinguished Encoding Rules (DER) and
//! decodes data in DER and, if asked to, in the Basic Encoding Rules
//! (BER). Rather than mapping each ASN.1 type to a Rust type, types are
//! described at runtime by a [`Schema`]. Decoding data with a schema
//! produces a [`Value`] which keeps its schema and, if it was decoded,
//! where exactly in the data it was found.
//!
//! # Schemas and Values
//!
//! A schema is created through one of the type constructors of
//! [`Schema`] and then refined with builder methods for tagging, bounds,
//! named values, defaults, and DEFINED BY rules. Schemas are cheap to
//! clone and can be shared freely.
//!
//! Values are created either by decoding or from a schema through
//! [`Schema::value`]. Constructed values are then filled in via
//! [`Value::set`] and [`Value::push`]. Encoding happens via
//! [`Value::encode`] and always produces DER.
//!
//! ```
//! use asnder::{Context, Schema, Value};
//!
//! let schema = Schema::sequence(vec![
//!     ("version", Schema::integer()),
//!     ("name", Schema::octet_string().optional()),
//! ]);
//!
//! let mut value = schema.empty().unwrap();
//! value.set("version", 3).unwrap();
//! let der = value.encode().unwrap();
//! assert_eq!(der, b"\x30\x03\x02\x01\x03");
//!
//! let decoded = schema.decode_exact(&der, &Context::default()).unwrap();
//! assert_eq!(decoded, value);
//! assert_eq!(decoded.get("version").unwrap().unwrap().to_i64(), Some(3));
//! assert_eq!(decoded.get("version").unwrap().unwrap().offset(), 2);
//! ```
//!
//! # Decoding
//!
//! How strict decoding is gets decided by a [`Context`]. By default, only
//! DER is accepted. With [`Context::ber`] the BER forms such as the
//! indefinite length form, constructed strings, and non-canonical values
//! are accepted, too, and marked in the decoded values. The context also
//! carries DEFINED BY rules for paths of the decoded data.
//!
//! Decoding errors are of type [`Error`]. Apart from the [`ErrorKind`],
//! they tell the type, the [`DecodePath`], and the offset of the value
//! that failed.
//!
//! # Walking
//!
//! The structure of a value can be walked via [`Value::nodes`] which
//! produces a [`Node`] with position information for every value in
//! pre-order.

//--- Re-exports

pub use self::context::{
    abs_decode_path, get_def_by_path, Context, Defines, PathPattern,
    PatternElem,
};
pub use self::error::{DecodePath, Error, ErrorKind, PathElem};
pub use self::length::{decode_length, encode_length, EOC};
pub use self::oid::Oid;
pub use self::schema::{Bounds, Field, Init, Kind, Schema};
pub use self::string::{BitString, CharSetError, StringKind};
pub use self::tag::{decode_tag, encode_tag, strip_tag, Class, Tag};
pub use self::time::DateTime;
pub use self::value::{Content, Value};
pub use self::walk::{Node, Nodes};


//--- Private modules

#[macro_use] mod debug;

mod context;
mod decode;
mod error;
mod int;
mod length;
mod oid;
mod schema;
mod string;
mod tag;
mod time;
mod value;
mod walk;
