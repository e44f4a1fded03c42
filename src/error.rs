//! Errors and decode paths.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use std::borrow::Cow;
use crate::oid::Oid;


//------------ ErrorKind -----------------------------------------------------

/// The class of an error.
///
/// Most kinds describe a problem with encoded data. A few of them are
/// raised while building values: [`ObjUnknown`], [`ObjNotReady`], and
/// [`InvalidValueType`]. [`Bounds`] and [`InvalidOid`] can happen in both
/// situations.
///
/// [`ObjUnknown`]: #variant.ObjUnknown
/// [`ObjNotReady`]: #variant.ObjNotReady
/// [`InvalidValueType`]: #variant.InvalidValueType
/// [`Bounds`]: #variant.Bounds
/// [`InvalidOid`]: #variant.InvalidOid
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// A generic violation of the encoding rules.
    Decode,

    /// The data ended before the encoded structure did.
    NotEnoughData,

    /// There is data left after a value that should have used it all.
    ExceedingData,

    /// An indefinite length was found where it isn’t allowed.
    LenIndefForm,

    /// The tag does not match any of the expected ones.
    TagMismatch,

    /// A value that requires a fixed length has a different one.
    InvalidLength,

    /// An object identifier violates the rules for its arcs.
    InvalidOid,

    /// A field, choice, or named value is not part of the schema.
    ObjUnknown,

    /// A value that is still missing data was to be encoded.
    ObjNotReady,

    /// A value of the wrong type was used.
    InvalidValueType,

    /// A size, cardinality, or integer bound was violated.
    Bounds,
}

impl ErrorKind {
    /// Returns a short name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Decode => "DecodeError",
            ErrorKind::NotEnoughData => "NotEnoughData",
            ErrorKind::ExceedingData => "ExceedingData",
            ErrorKind::LenIndefForm => "LenIndefForm",
            ErrorKind::TagMismatch => "TagMismatch",
            ErrorKind::InvalidLength => "InvalidLength",
            ErrorKind::InvalidOid => "InvalidOID",
            ErrorKind::ObjUnknown => "ObjUnknown",
            ErrorKind::ObjNotReady => "ObjNotReady",
            ErrorKind::InvalidValueType => "InvalidValueType",
            ErrorKind::Bounds => "BoundsError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Error ---------------------------------------------------------

/// An error happened while building, encoding, or decoding a value.
///
/// Apart from its [kind][ErrorKind] and a message, an error raised while
/// decoding carries the name of the type that failed, the decode path
/// leading to the failing value, and the offset into the data where the
/// failing value started.
///
/// Errors are located exactly once at the place where they happen. When
/// propagated upwards through nested values, they keep their location.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind}{}: {message}", location(.type_name, .decode_path, .offset))]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    type_name: Option<Cow<'static, str>>,
    decode_path: DecodePath,
    offset: Option<usize>,
}

impl Error {
    /// Creates a new error without location.
    pub fn new(
        kind: ErrorKind, message: impl Into<Cow<'static, str>>
    ) -> Self {
        Error {
            kind,
            message: message.into(),
            type_name: None,
            decode_path: DecodePath::new(),
            offset: None,
        }
    }

    pub(crate) fn decode(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub(crate) fn not_enough(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotEnoughData, message)
    }

    pub(crate) fn tag_mismatch() -> Self {
        Self::new(ErrorKind::TagMismatch, "unexpected tag")
    }

    pub(crate) fn value_type(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidValueType, message)
    }

    pub(crate) fn unknown(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ObjUnknown, message)
    }

    /// Creates a bounds error for a value outside of `min..=max`.
    pub(crate) fn bounds(
        min: &dyn fmt::Display, value: &dyn fmt::Display,
        max: &dyn fmt::Display,
    ) -> Self {
        Self::new(
            ErrorKind::Bounds,
            format!("unsatisfied bounds: {} <= {} <= {}", min, value, max)
        )
    }

    /// Attaches a location unless the error already has one.
    pub(crate) fn at(
        mut self,
        type_name: Cow<'static, str>,
        decode_path: &DecodePath,
        offset: usize,
    ) -> Self {
        if self.offset.is_none() {
            self.type_name = Some(type_name);
            self.decode_path = decode_path.clone();
            self.offset = Some(offset);
        }
        self
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of the error.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the name of the type that failed if known.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns the decode path to the failed value.
    ///
    /// The path is empty for errors that were not raised while decoding.
    pub fn decode_path(&self) -> &DecodePath {
        &self.decode_path
    }

    /// Returns the offset of the failed value if the error was located.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }
}

fn location(
    type_name: &Option<Cow<'static, str>>,
    decode_path: &DecodePath,
    offset: &Option<usize>,
) -> String {
    let mut res = String::new();
    if let Some(name) = type_name {
        res.push(' ');
        res.push_str(name);
    }
    if !decode_path.is_empty() {
        res.push_str(&format!(" ({})", decode_path));
    }
    if let Some(offset) = offset {
        res.push_str(&format!(" (at {})", offset));
    }
    res
}


//------------ PathElem ------------------------------------------------------

/// A single step of a decode path.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PathElem {
    /// A field or choice name, or the index of an element as a string.
    Name(String),

    /// The step into a value re-decoded through DEFINED BY.
    DefinedBy(Oid),
}

impl From<&str> for PathElem {
    fn from(name: &str) -> Self {
        PathElem::Name(name.into())
    }
}

impl From<String> for PathElem {
    fn from(name: String) -> Self {
        PathElem::Name(name)
    }
}

impl From<usize> for PathElem {
    fn from(index: usize) -> Self {
        PathElem::Name(index.to_string())
    }
}

impl From<Oid> for PathElem {
    fn from(oid: Oid) -> Self {
        PathElem::DefinedBy(oid)
    }
}

impl fmt::Display for PathElem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathElem::Name(name) => f.write_str(name),
            PathElem::DefinedBy(oid) => write!(f, "DEFINED BY {}", oid),
        }
    }
}


//------------ DecodePath ----------------------------------------------------

/// The route from the decoded root value to a nested value.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DecodePath(Vec<PathElem>);

impl DecodePath {
    /// Creates a new, empty path.
    pub fn new() -> Self {
        DecodePath(Vec::new())
    }

    /// Returns a new path with `elem` appended.
    pub fn join(&self, elem: impl Into<PathElem>) -> Self {
        let mut res = self.clone();
        res.push(elem);
        res
    }

    /// Appends an element.
    pub fn push(&mut self, elem: impl Into<PathElem>) {
        self.0.push(elem.into())
    }

    /// Returns the path without its last element.
    ///
    /// The parent of an empty path is empty.
    pub fn parent(&self) -> Self {
        let mut res = self.clone();
        res.0.pop();
        res
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[PathElem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElem> {
        self.0.iter()
    }
}

impl From<Vec<PathElem>> for DecodePath {
    fn from(elems: Vec<PathElem>) -> Self {
        DecodePath(elems)
    }
}

impl<T: Into<PathElem>> std::iter::FromIterator<T> for DecodePath {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        DecodePath(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for DecodePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for elem in &self.0 {
            if first {
                first = false
            }
            else {
                f.write_str(":")?;
            }
            fmt::Display::fmt(elem, f)?;
        }
        Ok(())
    }
}


//============ Tests =========================================================
