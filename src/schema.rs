//! Schemas describing ASN.1 types.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, mem};
use std::borrow::Cow;
use std::sync::Arc;
use bytes::Bytes;
use num_bigint::BigInt;
use crate::context::{Context, Defines, Session};
use crate::decode;
use crate::error::{DecodePath, Error, ErrorKind};
use crate::int;
use crate::oid::Oid;
use crate::string::{BitString, CharSetError, StringKind};
use crate::tag::Tag;
use crate::time::{DateTime, TimeType};
use crate::value::{Content, Value};


//------------ Schema --------------------------------------------------------

/// The description of an ASN.1 type.
///
/// A schema determines how values are encoded and decoded. It consists of
/// the [kind][Kind] of the type, which includes its constraints and, for
/// constructed types, its components, plus the tagging and the properties
/// of the type when used as a component of a SEQUENCE or SET: whether it is
/// optional, its default value, and DEFINED BY rules.
///
/// Schemas are built from one of the type functions such as
/// [`integer`][Self::integer] or [`sequence`][Self::sequence] and then
/// refined with the builder methods. They are immutable once built and
/// cheap to clone.
///
/// ```
/// use asnder::{Schema, Tag};
///
/// let schema = Schema::sequence(vec![
///     ("version", Schema::integer().explicit(Tag::ctx_constructed(0))
///         .with_default(0).unwrap()),
///     ("serial", Schema::integer()),
///     ("name", Schema::octet_string().with_size_bounds(1, Some(64))
///         .optional()),
/// ]);
/// assert_eq!(schema.fields().len(), 3);
/// ```
///
/// Mistakes in building a schema, such as asking for both an implicit and
/// an explicit tag or declaring an ENUMERATED without values, are
/// programming errors and cause a panic.
#[derive(Clone, Debug)]
pub struct Schema(Arc<Spec>);

#[derive(Clone, Debug)]
struct Spec {
    kind: Kind,

    /// The tag of the type. Only CHOICE and ANY have none.
    tag: Option<Tag>,

    /// Whether the tag was set implicitly.
    implicit: bool,

    /// The explicit tag wrapped around the value.
    expl: Option<Tag>,

    optional: bool,
    default: Option<Value>,
    defines: Vec<Defines>,

    /// A name overriding the name of the kind.
    name: Option<Cow<'static, str>>,
}

/// # Types
///
impl Schema {
    fn with_kind(kind: Kind, tag: Option<Tag>) -> Self {
        Schema(Arc::new(Spec {
            kind,
            tag,
            implicit: false,
            expl: None,
            optional: false,
            default: None,
            defines: Vec::new(),
            name: None,
        }))
    }

    pub fn boolean() -> Self {
        Self::with_kind(Kind::Boolean, Some(Tag::BOOLEAN))
    }

    pub fn integer() -> Self {
        Self::with_kind(
            Kind::Integer {
                named: Vec::new(), bounds: Bounds::default()
            },
            Some(Tag::INTEGER)
        )
    }

    /// Returns an ENUMERATED type with the given named values.
    ///
    /// # Panics
    ///
    /// The function panics if `named` is empty.
    pub fn enumerated<I, S, N>(named: I) -> Self
    where I: IntoIterator<Item = (S, N)>, S: Into<String>, N: Into<BigInt> {
        let named = named_values(named);
        if named.is_empty() {
            panic!("ENUMERATED without values")
        }
        Self::with_kind(Kind::Enumerated { named }, Some(Tag::ENUMERATED))
    }

    pub fn bit_string() -> Self {
        Self::with_kind(
            Kind::BitString { named: Vec::new() }, Some(Tag::BIT_STRING)
        )
    }

    pub fn octet_string() -> Self {
        Self::with_kind(
            Kind::OctetString { bounds: Bounds::default() },
            Some(Tag::OCTET_STRING)
        )
    }

    pub fn null() -> Self {
        Self::with_kind(Kind::Null, Some(Tag::NULL))
    }

    pub fn oid() -> Self {
        Self::with_kind(Kind::Oid, Some(Tag::OID))
    }

    /// Returns a restricted character string type.
    pub fn string(kind: StringKind) -> Self {
        Self::with_kind(
            Kind::String { kind, bounds: Bounds::default() },
            Some(kind.tag())
        )
    }

    pub fn utc_time() -> Self {
        Self::with_kind(Kind::UtcTime, Some(Tag::UTC_TIME))
    }

    pub fn generalized_time() -> Self {
        Self::with_kind(Kind::GeneralizedTime, Some(Tag::GENERALIZED_TIME))
    }

    /// Returns a CHOICE between the given alternatives.
    ///
    /// # Panics
    ///
    /// The function panics if there are no alternatives or if two of them
    /// share a name.
    pub fn choice<I, S>(fields: I) -> Self
    where I: IntoIterator<Item = (S, Schema)>, S: Into<String> {
        let fields = make_fields(fields);
        if fields.is_empty() {
            panic!("CHOICE without alternatives")
        }
        Self::with_kind(Kind::Choice { fields }, None)
    }

    /// Returns the ANY type which accepts every encoded value.
    pub fn any() -> Self {
        Self::with_kind(Kind::Any, None)
    }

    /// Returns a SEQUENCE with the given fields.
    ///
    /// # Panics
    ///
    /// The function panics if two fields share a name.
    pub fn sequence<I, S>(fields: I) -> Self
    where I: IntoIterator<Item = (S, Schema)>, S: Into<String> {
        Self::with_kind(
            Kind::Sequence { fields: make_fields(fields) },
            Some(Tag::SEQUENCE)
        )
    }

    /// Returns a SET with the given fields.
    ///
    /// # Panics
    ///
    /// The function panics if two fields share a name.
    pub fn set<I, S>(fields: I) -> Self
    where I: IntoIterator<Item = (S, Schema)>, S: Into<String> {
        Self::with_kind(
            Kind::Set { fields: make_fields(fields) }, Some(Tag::SET)
        )
    }

    pub fn sequence_of(element: Schema) -> Self {
        Self::with_kind(
            Kind::SequenceOf { element, bounds: Bounds::default() },
            Some(Tag::SEQUENCE)
        )
    }

    pub fn set_of(element: Schema) -> Self {
        Self::with_kind(
            Kind::SetOf { element, bounds: Bounds::default() },
            Some(Tag::SET)
        )
    }
}

/// # Building
///
impl Schema {
    fn spec_mut(&mut self) -> &mut Spec {
        Arc::make_mut(&mut self.0)
    }

    /// Replaces the tag of the type.
    ///
    /// For the constructed types, the tag is turned into its constructed
    /// form.
    ///
    /// # Panics
    ///
    /// The method panics if an explicit tag was set already or if the type
    /// is a CHOICE or ANY which can’t be tagged implicitly.
    pub fn implicit(mut self, tag: Tag) -> Self {
        if self.0.expl.is_some() {
            panic!("implicit and explicit tags are mutually exclusive")
        }
        let tag = match self.0.kind {
            Kind::Choice { .. } | Kind::Any => {
                panic!("{} can not be implicitly tagged", self.type_name())
            }
            Kind::Sequence { .. } | Kind::Set { .. }
            | Kind::SequenceOf { .. } | Kind::SetOf { .. } => {
                tag.to_constructed()
            }
            _ => tag
        };
        let spec = self.spec_mut();
        spec.tag = Some(tag);
        spec.implicit = true;
        self
    }

    /// Wraps the type into an explicit tag.
    ///
    /// The tag is always used in its constructed form.
    ///
    /// # Panics
    ///
    /// The method panics if an implicit tag was set already.
    pub fn explicit(mut self, tag: Tag) -> Self {
        if self.0.implicit {
            panic!("implicit and explicit tags are mutually exclusive")
        }
        self.spec_mut().expl = Some(tag.to_constructed());
        self
    }

    /// Marks the type as optional when used as a field.
    pub fn optional(mut self) -> Self {
        self.spec_mut().optional = true;
        self
    }

    /// Sets the default value of the type when used as a field.
    ///
    /// A field with a default value is optional. When encoding, the field
    /// is left out if it has the default value.
    pub fn with_default(self, init: impl Into<Init>) -> Result<Self, Error> {
        let value = self.value(init)?;
        if !value.ready() {
            return Err(Error::new(
                ErrorKind::ObjNotReady, "default value is not ready"
            ))
        }
        let mut res = self;
        res.spec_mut().default = Some(value);
        Ok(res)
    }

    /// Adds named values to an INTEGER or ENUMERATED.
    ///
    /// # Panics
    ///
    /// The method panics for all other types.
    pub fn with_named_values<I, S, N>(mut self, values: I) -> Self
    where I: IntoIterator<Item = (S, N)>, S: Into<String>, N: Into<BigInt> {
        let values = named_values(values);
        match self.spec_mut().kind {
            Kind::Integer { ref mut named, .. }
            | Kind::Enumerated { ref mut named } => named.extend(values),
            _ => panic!("named values on a non-integer type")
        }
        self
    }

    /// Restricts the values of an INTEGER.
    ///
    /// # Panics
    ///
    /// The method panics for all other types.
    pub fn with_value_bounds(
        mut self, min: Option<BigInt>, max: Option<BigInt>
    ) -> Self {
        match self.spec_mut().kind {
            Kind::Integer { ref mut bounds, .. } => {
                *bounds = Bounds::new(min, max)
            }
            _ => panic!("value bounds on a non-INTEGER type")
        }
        self
    }

    /// Restricts the size of a string or the number of elements.
    ///
    /// The size of a character string is the number of characters.
    ///
    /// # Panics
    ///
    /// The method panics for types other than OCTET STRING, the restricted
    /// character strings, SEQUENCE OF, and SET OF.
    pub fn with_size_bounds(mut self, min: usize, max: Option<usize>) -> Self {
        let new = Bounds::new(Some(min), max);
        match self.spec_mut().kind {
            Kind::OctetString { ref mut bounds }
            | Kind::String { ref mut bounds, .. }
            | Kind::SequenceOf { ref mut bounds, .. }
            | Kind::SetOf { ref mut bounds, .. } => *bounds = new,
            _ => panic!("size bounds on an unsized type")
        }
        self
    }

    /// Adds names for the bits of a BIT STRING.
    ///
    /// # Panics
    ///
    /// The method panics for all other types.
    pub fn with_named_bits<I, S>(mut self, bits: I) -> Self
    where I: IntoIterator<Item = (S, usize)>, S: Into<String> {
        match self.spec_mut().kind {
            Kind::BitString { ref mut named } => {
                named.extend(bits.into_iter().map(|(name, bit)| {
                    (name.into(), bit)
                }))
            }
            _ => panic!("named bits on a non-BIT STRING type")
        }
        self
    }

    /// Adds DEFINED BY rules applied when the type is used as a field.
    pub fn with_defines(mut self, defines: Vec<Defines>) -> Self {
        self.spec_mut().defines.extend(defines);
        self
    }

    /// Sets the name of the type used in errors and introspection.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.spec_mut().name = Some(name.into());
        self
    }
}

/// # Access
///
impl Schema {
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// Returns the tag of the type.
    ///
    /// This is `None` for CHOICE and ANY.
    pub fn tag(&self) -> Option<Tag> {
        self.0.tag
    }

    pub fn is_implicit(&self) -> bool {
        self.0.implicit
    }

    pub fn expl(&self) -> Option<Tag> {
        self.0.expl
    }

    /// Returns whether a field of this type may be missing.
    ///
    /// This is true for optional fields and those with a default value.
    pub fn is_optional(&self) -> bool {
        self.0.optional || self.0.default.is_some()
    }

    pub fn default(&self) -> Option<&Value> {
        self.0.default.as_ref()
    }

    pub fn defines(&self) -> &[Defines] {
        &self.0.defines
    }

    /// Returns the name of the type.
    pub fn type_name(&self) -> Cow<'static, str> {
        match self.0.name {
            Some(ref name) => name.clone(),
            None => Cow::Borrowed(self.0.kind.type_name()),
        }
    }

    /// Returns the components of a CHOICE, SEQUENCE, or SET.
    ///
    /// All other types have no components.
    pub fn fields(&self) -> &[Field] {
        match self.0.kind {
            Kind::Choice { ref fields }
            | Kind::Sequence { ref fields }
            | Kind::Set { ref fields } => fields,
            _ => &[]
        }
    }

    /// Returns the component with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|field| field.name == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Result<usize, Error> {
        self.fields().iter().position(|field| field.name == name).ok_or_else(
            || Error::unknown(format!("unknown field {}", name))
        )
    }

    /// Returns whether the default value of the type equals `value`.
    pub(crate) fn is_default(&self, value: &Value) -> bool {
        match self.0.default {
            Some(ref default) => default.content == value.content,
            None => false
        }
    }
}

/// # Values
///
impl Schema {
    /// Creates a value of this type.
    ///
    /// What kind of input is acceptable depends on the kind of the type,
    /// see [`Init`] for the details. All constraints of the type are
    /// checked.
    pub fn value(&self, init: impl Into<Init>) -> Result<Value, Error> {
        Ok(Value::new(self.clone(), self.content_from(init.into())?))
    }

    /// Creates an empty value of a constructed type.
    ///
    /// The value is a CHOICE without a chosen alternative, a SEQUENCE or
    /// SET without any fields, or an empty SEQUENCE OF or SET OF. NULL
    /// values are returned, too.
    pub fn empty(&self) -> Result<Value, Error> {
        let content = match self.0.kind {
            Kind::Null => Content::Null,
            Kind::Choice { .. } => Content::Choice(None),
            Kind::Sequence { ref fields } | Kind::Set { ref fields } => {
                Content::Fields(vec![None; fields.len()])
            }
            Kind::SequenceOf { .. } | Kind::SetOf { .. } => {
                Content::Items(Vec::new())
            }
            _ => {
                return Err(Error::value_type(
                    format!("{} has no empty value", self.type_name())
                ))
            }
        };
        Ok(Value::new(self.clone(), content))
    }

    fn content_from(&self, init: Init) -> Result<Content, Error> {
        if let Init::Value(value) = init {
            return self.conform(value)
        }
        match (&self.0.kind, init) {
            (Kind::Boolean, Init::Bool(value)) => Ok(Content::Boolean(value)),
            (Kind::Integer { bounds, .. }, Init::Int(value)) => {
                bounds.check(&value)?;
                Ok(Content::Integer(value))
            }
            (Kind::Integer { named, bounds }, Init::Text(name)) => {
                let value = int::value_of(named, &name).cloned().ok_or_else(
                    || Error::unknown(format!("unknown integer name {}", name))
                )?;
                bounds.check(&value)?;
                Ok(Content::Integer(value))
            }
            (Kind::Enumerated { named }, Init::Int(value)) => {
                if int::name_of(named, &value).is_none() {
                    return Err(Error::decode(
                        format!("unknown integer value: {}", value)
                    ))
                }
                Ok(Content::Integer(value))
            }
            (Kind::Enumerated { named }, Init::Text(name)) => {
                int::value_of(named, &name).cloned().map(Content::Integer)
                    .ok_or_else(|| {
                        Error::unknown(format!("unknown integer name {}", name))
                    })
            }
            (Kind::BitString { named }, Init::Bits(bits)) => {
                Ok(Content::BitString(
                    if named.is_empty() { bits } else { bits.trimmed() }
                ))
            }
            (Kind::BitString { named }, Init::Text(literal)) => {
                let bits = BitString::from_literal(&literal)?;
                Ok(Content::BitString(
                    if named.is_empty() { bits } else { bits.trimmed() }
                ))
            }
            (Kind::BitString { .. }, Init::Bytes(octets)) => {
                Ok(Content::BitString(BitString::from_octets(octets)))
            }
            (Kind::BitString { named }, Init::Names(names)) => {
                let bits = names.iter().map(|name| {
                    named.iter().find(|(item, _)| item == name)
                        .map(|(_, bit)| *bit)
                        .ok_or_else(|| {
                            Error::unknown(format!("unknown bit name {}", name))
                        })
                }).collect::<Result<Vec<_>, _>>()?;
                Ok(Content::BitString(BitString::from_set_bits(bits).trimmed()))
            }
            (Kind::OctetString { bounds }, Init::Bytes(octets)) => {
                bounds.check(&octets.len())?;
                Ok(Content::OctetString(octets))
            }
            (Kind::Null, Init::Null) => Ok(Content::Null),
            (Kind::Oid, Init::Oid(oid)) => Ok(Content::Oid(oid)),
            (Kind::Oid, Init::Text(text)) => Ok(Content::Oid(text.parse()?)),
            (Kind::String { kind, bounds }, Init::Text(text)) => {
                let raw = kind.encode(&text).map_err(charset_error)?;
                bounds.check(&text.chars().count())?;
                Ok(Content::String(raw.into()))
            }
            (Kind::String { kind, bounds }, Init::Bytes(raw)) => {
                bounds.check(&kind.char_len(&raw).map_err(charset_error)?)?;
                Ok(Content::String(raw))
            }
            (Kind::UtcTime, Init::Time(time)) => {
                Ok(Content::Time(TimeType::Utc.sanitize(time)?))
            }
            (Kind::GeneralizedTime, Init::Time(time)) => {
                Ok(Content::Time(TimeType::Generalized.sanitize(time)?))
            }
            (Kind::UtcTime, Init::Text(text)) => {
                Ok(Content::Time(TimeType::Utc.parse(text.as_bytes(), false)?.0))
            }
            (Kind::GeneralizedTime, Init::Text(text)) => {
                Ok(Content::Time(
                    TimeType::Generalized.parse(text.as_bytes(), false)?.0
                ))
            }
            (Kind::Choice { fields }, Init::Choice(name, value)) => {
                let idx = self.field_index(&name)?;
                let value = fields[idx].schema.value(value)?;
                Ok(Content::Choice(Some((idx, Box::new(value)))))
            }
            (Kind::Any, Init::Bytes(octets)) => Ok(Content::Any(octets)),
            (Kind::Sequence { fields }, Init::Fields(values))
            | (Kind::Set { fields }, Init::Fields(values)) => {
                let mut res = vec![None; fields.len()];
                for (name, value) in values {
                    let idx = self.field_index(&name)?;
                    let field = &fields[idx].schema;
                    let value = field.value(value)?;
                    res[idx] = if field.is_default(&value) {
                        None
                    }
                    else {
                        Some(value)
                    };
                }
                Ok(Content::Fields(res))
            }
            (Kind::SequenceOf { element, bounds }, Init::Items(items))
            | (Kind::SetOf { element, bounds }, Init::Items(items)) => {
                let items = items.into_iter().map(|item| {
                    element.value(item)
                }).collect::<Result<Vec<_>, _>>()?;
                bounds.check(&items.len())?;
                Ok(Content::Items(items))
            }
            (_, init) => {
                Err(Error::value_type(format!(
                    "{} can not be made from {}", self.type_name(), init.name()
                )))
            }
        }
    }

    /// Converts a value of a compatible type into a value of this type.
    ///
    /// The constraints of this type are checked again. An ANY accepts
    /// every value and keeps its encoding.
    fn conform(&self, value: Value) -> Result<Content, Error> {
        if let Kind::Any = self.0.kind {
            if !matches!(value.schema().kind(), Kind::Any) {
                return Ok(Content::Any(value.encode()?.into()))
            }
        }
        if !self.0.kind.same_type(value.schema().kind()) {
            return Err(Error::value_type(format!(
                "{} expected, got {}",
                self.type_name(), value.schema().type_name()
            )))
        }
        let Value { schema, content, .. } = value;
        let init = match content {
            Content::Boolean(value) => Init::Bool(value),
            Content::Integer(value) => Init::Int(value),
            Content::BitString(value) => Init::Bits(value),
            Content::OctetString(value) => Init::Bytes(value),
            Content::Null => Init::Null,
            Content::Oid(value) => Init::Oid(value),
            Content::String(value) => Init::Bytes(value),
            Content::Time(value) => Init::Time(value),
            Content::Any(value) => Init::Bytes(value),
            Content::Choice(None) => return Ok(Content::Choice(None)),
            Content::Choice(Some((idx, value))) => {
                Init::Choice(schema.fields()[idx].name.clone(), *value)
            }
            Content::Fields(values) => {
                Init::Fields(
                    schema.fields().iter().zip(values).filter_map(
                        |(field, value)| {
                            value.map(|value| (field.name.clone(), value))
                        }
                    ).collect()
                )
            }
            Content::Items(items) => Init::Items(items),
        };
        self.content_from(init)
    }
}

/// # Decoding
///
impl Schema {
    /// Decodes a value from the beginning of `data`.
    ///
    /// Returns the value and the data following it.
    pub fn decode<'a>(
        &self, data: &'a [u8], ctx: &Context
    ) -> Result<(Value, &'a [u8]), Error> {
        self.decode_at(data, 0, &DecodePath::new(), ctx)
    }

    /// Decodes a value found at `offset` and `path` within outer data.
    ///
    /// The offset and path are only used for the position information of
    /// the value and in errors.
    pub fn decode_at<'a>(
        &self,
        data: &'a [u8],
        offset: usize,
        path: &DecodePath,
        ctx: &Context,
    ) -> Result<(Value, &'a [u8]), Error> {
        let mut sess = Session::new(ctx);
        decode::decode_tlv(self, data, offset, path, &mut sess)
    }

    /// Decodes a value that has to use all of `data`.
    pub fn decode_exact(
        &self, data: &[u8], ctx: &Context
    ) -> Result<Value, Error> {
        let (value, rest) = self.decode(data, ctx)?;
        if !rest.is_empty() {
            return xerr!(Err(Error::new(
                ErrorKind::ExceedingData,
                format!("{} trailing bytes", rest.len())
            )))
        }
        Ok(value)
    }
}

fn charset_error(err: CharSetError) -> Error {
    Error::decode(err.message())
}

fn named_values<I, S, N>(values: I) -> Vec<(String, BigInt)>
where I: IntoIterator<Item = (S, N)>, S: Into<String>, N: Into<BigInt> {
    values.into_iter().map(|(name, value)| (name.into(), value.into()))
        .collect()
}

fn make_fields<I, S>(fields: I) -> Vec<Field>
where I: IntoIterator<Item = (S, Schema)>, S: Into<String> {
    let mut res: Vec<Field> = Vec::new();
    for (name, schema) in fields {
        let name = name.into();
        if res.iter().any(|field| field.name == name) {
            panic!("duplicate field name {}", name)
        }
        res.push(Field { name, schema })
    }
    res
}


//------------ Kind ----------------------------------------------------------

/// The kind of an ASN.1 type together with its constraints.
#[derive(Clone, Debug)]
pub enum Kind {
    Boolean,
    Integer {
        named: Vec<(String, BigInt)>,
        bounds: Bounds<BigInt>,
    },
    Enumerated {
        named: Vec<(String, BigInt)>,
    },
    BitString {
        named: Vec<(String, usize)>,
    },
    OctetString {
        bounds: Bounds<usize>,
    },
    Null,
    Oid,
    String {
        kind: StringKind,
        bounds: Bounds<usize>,
    },
    UtcTime,
    GeneralizedTime,
    Choice {
        fields: Vec<Field>,
    },
    Any,
    Sequence {
        fields: Vec<Field>,
    },
    Set {
        fields: Vec<Field>,
    },
    SequenceOf {
        element: Schema,
        bounds: Bounds<usize>,
    },
    SetOf {
        element: Schema,
        bounds: Bounds<usize>,
    },
}

impl Kind {
    /// Returns the name of the kind used in errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Kind::Boolean => "Boolean",
            Kind::Integer { .. } => "Integer",
            Kind::Enumerated { .. } => "Enumerated",
            Kind::BitString { .. } => "BitString",
            Kind::OctetString { .. } => "OctetString",
            Kind::Null => "Null",
            Kind::Oid => "ObjectIdentifier",
            Kind::String { kind, .. } => kind.name(),
            Kind::UtcTime => "UTCTime",
            Kind::GeneralizedTime => "GeneralizedTime",
            Kind::Choice { .. } => "Choice",
            Kind::Any => "Any",
            Kind::Sequence { .. } => "Sequence",
            Kind::Set { .. } => "Set",
            Kind::SequenceOf { .. } => "SequenceOf",
            Kind::SetOf { .. } => "SetOf",
        }
    }

    /// Returns the name of the kind in ASN.1 notation.
    pub fn asn1_name(&self) -> &'static str {
        match self {
            Kind::Boolean => "BOOLEAN",
            Kind::Integer { .. } => "INTEGER",
            Kind::Enumerated { .. } => "ENUMERATED",
            Kind::BitString { .. } => "BIT STRING",
            Kind::OctetString { .. } => "OCTET STRING",
            Kind::Null => "NULL",
            Kind::Oid => "OBJECT IDENTIFIER",
            Kind::String { kind, .. } => kind.name(),
            Kind::UtcTime => "UTCTime",
            Kind::GeneralizedTime => "GeneralizedTime",
            Kind::Choice { .. } => "CHOICE",
            Kind::Any => "ANY",
            Kind::Sequence { .. } => "SEQUENCE",
            Kind::Set { .. } => "SET",
            Kind::SequenceOf { .. } => "SEQUENCE OF",
            Kind::SetOf { .. } => "SET OF",
        }
    }

    pub(crate) fn time_type(&self) -> Option<TimeType> {
        match self {
            Kind::UtcTime => Some(TimeType::Utc),
            Kind::GeneralizedTime => Some(TimeType::Generalized),
            _ => None
        }
    }

    /// Returns whether values of `other` can be used for this kind.
    fn same_type(&self, other: &Kind) -> bool {
        match (self, other) {
            (Kind::String { kind: left, .. }, Kind::String { kind: right, .. }) => {
                left.tag() == right.tag()
            }
            _ => mem::discriminant(self) == mem::discriminant(other)
        }
    }
}


//------------ Field ---------------------------------------------------------

/// A named component of a CHOICE, SEQUENCE, or SET.
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    schema: Schema,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}


//------------ Bounds --------------------------------------------------------

/// Inclusive bounds of a value or size.
///
/// A missing bound means that the value is unrestricted in that direction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Bounds { min: None, max: None }
    }
}

impl<T: PartialOrd + fmt::Display> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Bounds { min, max }
    }

    /// Checks that `value` is within the bounds.
    pub fn check(&self, value: &T) -> Result<(), Error> {
        let low = self.min.as_ref().map_or(false, |min| value < min);
        let high = self.max.as_ref().map_or(false, |max| value > max);
        if low || high {
            xerr!(return Err(Error::bounds(
                &Bound(self.min.as_ref(), "-inf"), value,
                &Bound(self.max.as_ref(), "+inf"),
            )))
        }
        Ok(())
    }

    /// Returns whether `value` would exceed the upper bound.
    pub fn exceeds_max(&self, value: &T) -> bool {
        self.max.as_ref().map_or(false, |max| value > max)
    }
}

struct Bound<'a, T>(Option<&'a T>, &'static str);

impl<'a, T: fmt::Display> fmt::Display for Bound<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str(self.1),
        }
    }
}


//------------ Init ----------------------------------------------------------

/// The input for creating a value from a schema.
///
/// Which variants are accepted depends on the kind of the schema:
///
/// * BOOLEAN: `Bool`,
/// * INTEGER: `Int` or a named value as `Text`,
/// * ENUMERATED: `Int` or `Text`, both have to be one of the named values,
/// * BIT STRING: `Bits`, a `'0101'B` or `'0A'H` literal as `Text`, full
///   octets as `Bytes`, or the names of the set bits as `Names`,
/// * OCTET STRING and ANY: `Bytes`,
/// * NULL: `Null`,
/// * OBJECT IDENTIFIER: `Oid` or the dotted form as `Text`,
/// * restricted character strings: `Text` or the encoded octets as `Bytes`,
/// * UTCTime and GeneralizedTime: `Time` or the DER encoded form as `Text`,
/// * CHOICE: `Choice`,
/// * SEQUENCE and SET: `Fields`,
/// * SEQUENCE OF and SET OF: `Items`.
///
/// In addition, every schema accepts an existing value of the same kind
/// through `Value`. The value is checked against the constraints of the
/// schema and takes on its tagging. ANY accepts values of any kind and
/// keeps their encoding.
#[derive(Clone, Debug)]
pub enum Init {
    Bool(bool),
    Int(BigInt),
    Text(String),
    Bytes(Bytes),
    Bits(BitString),
    Names(Vec<String>),
    Null,
    Oid(Oid),
    Time(DateTime),
    Items(Vec<Value>),
    Fields(Vec<(String, Value)>),
    Choice(String, Value),
    Value(Value),
}

impl Init {
    /// Creates SEQUENCE or SET input from name and value pairs.
    pub fn fields<I, S>(fields: I) -> Self
    where I: IntoIterator<Item = (S, Value)>, S: Into<String> {
        Init::Fields(
            fields.into_iter().map(|(name, value)| (name.into(), value))
                .collect()
        )
    }

    /// Creates CHOICE input.
    pub fn choice(name: impl Into<String>, value: Value) -> Self {
        Init::Choice(name.into(), value)
    }

    /// Creates BIT STRING input from bit names.
    pub fn names<I, S>(names: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<String> {
        Init::Names(names.into_iter().map(Into::into).collect())
    }

    fn name(&self) -> &'static str {
        match self {
            Init::Bool(_) => "a boolean",
            Init::Int(_) => "an integer",
            Init::Text(_) => "text",
            Init::Bytes(_) => "octets",
            Init::Bits(_) => "bits",
            Init::Names(_) => "bit names",
            Init::Null => "null",
            Init::Oid(_) => "an object identifier",
            Init::Time(_) => "a time",
            Init::Items(_) => "items",
            Init::Fields(_) => "fields",
            Init::Choice(..) => "a choice",
            Init::Value(_) => "a value",
        }
    }
}

macro_rules! init_from_int {
    ( $( $type:ty ),* ) => {
        $(
            impl From<$type> for Init {
                fn from(value: $type) -> Self {
                    Init::Int(BigInt::from(value))
                }
            }
        )*
    }
}

init_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Init {
    fn from(value: BigInt) -> Self {
        Init::Int(value)
    }
}

impl From<bool> for Init {
    fn from(value: bool) -> Self {
        Init::Bool(value)
    }
}

impl From<()> for Init {
    fn from(_: ()) -> Self {
        Init::Null
    }
}

impl From<&str> for Init {
    fn from(value: &str) -> Self {
        Init::Text(value.into())
    }
}

impl From<String> for Init {
    fn from(value: String) -> Self {
        Init::Text(value)
    }
}

impl From<Bytes> for Init {
    fn from(value: Bytes) -> Self {
        Init::Bytes(value)
    }
}

impl From<&[u8]> for Init {
    fn from(value: &[u8]) -> Self {
        Init::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Init {
    fn from(value: Vec<u8>) -> Self {
        Init::Bytes(value.into())
    }
}

impl From<BitString> for Init {
    fn from(value: BitString) -> Self {
        Init::Bits(value)
    }
}

impl From<Oid> for Init {
    fn from(value: Oid) -> Self {
        Init::Oid(value)
    }
}

impl From<DateTime> for Init {
    fn from(value: DateTime) -> Self {
        Init::Time(value)
    }
}

impl From<Vec<Value>> for Init {
    fn from(value: Vec<Value>) -> Self {
        Init::Items(value)
    }
}

impl From<Value> for Init {
    fn from(value: Value) -> Self {
        Init::Value(value)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integer_values() {
        let schema = Schema::integer()
            .with_named_values(vec![("one", 1), ("two", 2)])
            .with_value_bounds(Some(0.into()), Some(10.into()));
        assert_eq!(schema.value(5).unwrap().to_i64(), Some(5));
        assert_eq!(schema.value("two").unwrap().to_i64(), Some(2));
        assert_eq!(
            schema.value("three").unwrap_err().kind(), ErrorKind::ObjUnknown
        );
        let err = schema.value(11).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
        assert_eq!(err.message(), "unsatisfied bounds: 0 <= 11 <= 10");
        assert_eq!(
            schema.value(true).unwrap_err().kind(),
            ErrorKind::InvalidValueType
        );
    }

    #[test]
    fn enumerated_values() {
        let schema = Schema::enumerated(vec![("a", 1), ("b", 5)]);
        assert!(schema.value(5).is_ok());
        assert_eq!(schema.value(2).unwrap_err().kind(), ErrorKind::Decode);
        assert_eq!(schema.value("c").unwrap_err().kind(), ErrorKind::ObjUnknown);
        assert_eq!(schema.value("a").unwrap().named(), Some("a"));
    }

    #[test]
    #[should_panic]
    fn empty_enumerated() {
        let _ = Schema::enumerated(Vec::<(&str, i32)>::new());
    }

    #[test]
    #[should_panic]
    fn implicit_and_explicit() {
        let _ = Schema::integer().explicit(Tag::ctx_constructed(0))
            .implicit(Tag::ctx_primitive(1));
    }

    #[test]
    #[should_panic]
    fn implicit_choice() {
        let _ = Schema::choice(vec![("a", Schema::null())])
            .implicit(Tag::ctx_primitive(1));
    }

    #[test]
    fn tagging() {
        let schema = Schema::sequence(Vec::<(&str, Schema)>::new())
            .implicit(Tag::ctx_primitive(3));
        assert_eq!(schema.tag(), Some(Tag::ctx_constructed(3)));
        assert!(schema.is_implicit());
        let schema = Schema::boolean().explicit(Tag::ctx_primitive(0));
        assert_eq!(schema.expl(), Some(Tag::ctx_constructed(0)));
        assert_eq!(schema.tag(), Some(Tag::BOOLEAN));
        assert_eq!(Schema::any().tag(), None);
    }

    #[test]
    fn strings_and_sizes() {
        let schema = Schema::string(StringKind::PRINTABLE)
            .with_size_bounds(2, Some(4));
        assert!(schema.value("abc").is_ok());
        assert_eq!(schema.value("a").unwrap_err().kind(), ErrorKind::Bounds);
        assert_eq!(schema.value("a@b").unwrap_err().kind(), ErrorKind::Decode);
        let octets = Schema::octet_string().with_size_bounds(0, Some(1));
        assert_eq!(
            octets.value(&b"ab"[..]).unwrap_err().kind(), ErrorKind::Bounds
        );
    }

    #[test]
    fn bit_names() {
        let schema = Schema::bit_string()
            .with_named_bits(vec![("a", 0), ("b", 1), ("c", 9)]);
        let value = schema.value(Init::names(vec!["a", "c"])).unwrap();
        let bits = value.as_bit_string().unwrap();
        assert_eq!(bits.bit_len(), 10);
        assert!(bits.bit(9) && bits.bit(0) && !bits.bit(1));
        let value = schema.value("'0100'B").unwrap();
        assert_eq!(value.as_bit_string().unwrap().bit_len(), 2);
        assert_eq!(
            schema.value(Init::names(vec!["x"])).unwrap_err().kind(),
            ErrorKind::ObjUnknown
        );
    }

    #[test]
    fn defaults() {
        let schema = Schema::boolean().with_default(false).unwrap();
        assert!(schema.is_optional());
        assert!(schema.is_default(&Value::boolean(false)));
        assert!(!schema.is_default(&Value::boolean(true)));
        let schema = Schema::sequence(vec![("a", Schema::integer())]);
        assert_eq!(
            schema.clone().with_default(Init::fields(Vec::<(&str, Value)>::new()))
                .unwrap_err().kind(),
            ErrorKind::ObjNotReady
        );
    }

    #[test]
    fn conform() {
        let field = Schema::integer().implicit(Tag::ctx_primitive(1))
            .with_value_bounds(None, Some(5.into()));
        let value = field.value(Value::integer(3)).unwrap();
        assert_eq!(value.schema().tag(), Some(Tag::ctx_primitive(1)));
        assert_eq!(
            field.value(Value::integer(6)).unwrap_err().kind(),
            ErrorKind::Bounds
        );
        assert_eq!(
            field.value(Value::null()).unwrap_err().kind(),
            ErrorKind::InvalidValueType
        );

        let any = Schema::any().value(Value::integer(3)).unwrap();
        assert_eq!(any.as_bytes().unwrap().as_ref(), b"\x02\x01\x03");

        let t61 = Schema::string(StringKind::T61);
        assert!(t61.value(
            Schema::string(StringKind::Teletex).value("x").unwrap()
        ).is_ok());
    }

    #[test]
    fn empty_values() {
        assert!(!Schema::choice(vec![("a", Schema::null())]).empty().unwrap()
            .ready());
        assert!(Schema::sequence_of(Schema::null()).empty().unwrap().ready());
        assert_eq!(
            Schema::integer().empty().unwrap_err().kind(),
            ErrorKind::InvalidValueType
        );
    }

    #[test]
    #[should_panic]
    fn duplicate_fields() {
        let _ = Schema::sequence(vec![
            ("a", Schema::null()), ("a", Schema::boolean())
        ]);
    }
}
