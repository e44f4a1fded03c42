//! Decoding options and DEFINED BY rules.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::error::{DecodePath, PathElem};
use crate::oid::Oid;
use crate::schema::Schema;


//------------ Context -------------------------------------------------------

/// The options for decoding a value.
///
/// By default, a context only accepts DER. Each field relaxes the rules in
/// one particular way. [`Context::ber`] returns a context that accepts BER
/// in all the ways supported.
///
/// The context is only ever borrowed by the decoder, so a single context
/// can be shared by any number of decode calls.
///
/// [`Context::ber`]: #method.ber
#[derive(Clone, Debug, Default)]
pub struct Context {
    /// Accept BER.
    ///
    /// This allows indefinite lengths, the constructed form of string
    /// types, non-canonical booleans and object identifier arcs, the
    /// relaxed time formats, unordered SET and SET OF values, and fields
    /// encoded with their default value.
    pub bered: bool,

    /// Accept fields encoded with their default value.
    pub allow_default_values: bool,

    /// Accept SET and SET OF values with out-of-order members.
    pub allow_unordered_set: bool,

    /// Accept explicit tags whose length exceeds the inner value.
    ///
    /// The superfluous octets inside the explicit tag are skipped. This is
    /// only useful for inspecting broken data.
    pub allow_expl_oob: bool,

    /// DEFINED BY rules keyed by the decode path of the defining field.
    ///
    /// The first rule whose pattern matches the path of a decoded field is
    /// used if the field's schema carries no rules of its own.
    pub defines_by_path: Vec<(PathPattern, Vec<Defines>)>,
}

impl Context {
    /// Creates a new context that only accepts DER.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new context that accepts BER.
    pub fn ber() -> Self {
        Context { bered: true, ..Default::default() }
    }

    pub fn with_bered(mut self, bered: bool) -> Self {
        self.bered = bered;
        self
    }

    pub fn with_allow_default_values(mut self, allow: bool) -> Self {
        self.allow_default_values = allow;
        self
    }

    pub fn with_allow_unordered_set(mut self, allow: bool) -> Self {
        self.allow_unordered_set = allow;
        self
    }

    pub fn with_allow_expl_oob(mut self, allow: bool) -> Self {
        self.allow_expl_oob = allow;
        self
    }

    /// Adds a DEFINED BY rule for fields matching `pattern`.
    pub fn with_defines_by_path(
        mut self, pattern: PathPattern, defines: Vec<Defines>
    ) -> Self {
        self.defines_by_path.push((pattern, defines));
        self
    }
}


//------------ Defines -------------------------------------------------------

/// A DEFINED BY rule.
///
/// When a field with this rule decodes to one of the object identifiers
/// listed in the rule, the field found at `path` is decoded once more with
/// the schema registered for that identifier. The result becomes the
/// [defined value][crate::Value::defined] of that field.
///
/// The path is relative to the value containing the defining field, so a
/// sibling is just its name. An element `".."` steps up one level while a
/// leading `"/"` makes the path absolute.
///
/// Only object identifiers can select a schema. A defining field whose
/// value is of any other type never triggers the rule.
#[derive(Clone, Debug)]
pub struct Defines {
    path: Vec<String>,
    schemas: Vec<(Oid, Schema)>,
}

impl Defines {
    pub fn new<I, S>(path: I, schemas: Vec<(Oid, Schema)>) -> Self
    where I: IntoIterator<Item = S>, S: Into<String> {
        Defines {
            path: path.into_iter().map(Into::into).collect(),
            schemas
        }
    }

    /// Returns the relative path of the defined field.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the schema registered for `oid`.
    pub fn schema_for(&self, oid: &Oid) -> Option<&Schema> {
        self.schemas.iter().find(|(item, _)| item == oid).map(|(_, schema)| {
            schema
        })
    }
}


//------------ PathPattern ---------------------------------------------------

/// A pattern matching decode paths.
///
/// A pattern matches a path of the same length if every element matches.
/// The [`Any`] element matches any single path element, which is handy
/// for the indexes of SEQUENCE OF elements.
///
/// [`Any`]: enum.PatternElem.html#variant.Any
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathPattern(Vec<PatternElem>);

/// One element of a path pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatternElem {
    Any,
    Name(String),
    DefinedBy(Oid),
}

impl PathPattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a name element.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.push(PatternElem::Name(name.into()));
        self
    }

    /// Appends an index element.
    pub fn index(self, index: usize) -> Self {
        self.name(index.to_string())
    }

    /// Appends a wildcard element.
    pub fn any(mut self) -> Self {
        self.0.push(PatternElem::Any);
        self
    }

    /// Appends the step into a defined value.
    pub fn defined_by(mut self, oid: Oid) -> Self {
        self.0.push(PatternElem::DefinedBy(oid));
        self
    }

    pub fn elems(&self) -> &[PatternElem] {
        &self.0
    }

    /// Returns whether `path` matches the pattern.
    pub fn matches(&self, path: &DecodePath) -> bool {
        self.0.len() == path.len()
        && self.0.iter().zip(path.iter()).all(|pair| match pair {
            (PatternElem::Any, _) => true,
            (PatternElem::Name(left), PathElem::Name(right)) => left == right,
            (PatternElem::DefinedBy(left), PathElem::DefinedBy(right)) => {
                left == right
            }
            _ => false
        })
    }
}

impl From<&DecodePath> for PathPattern {
    fn from(path: &DecodePath) -> Self {
        PathPattern(path.iter().map(|elem| match elem {
            PathElem::Name(name) => PatternElem::Name(name.clone()),
            PathElem::DefinedBy(oid) => PatternElem::DefinedBy(oid.clone()),
        }).collect())
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, elem) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            match elem {
                PatternElem::Any => f.write_str("*")?,
                PatternElem::Name(name) => f.write_str(name)?,
                PatternElem::DefinedBy(oid) => write!(f, "DEFINED BY {}", oid)?,
            }
        }
        Ok(())
    }
}


//------------ Path Functions ------------------------------------------------

/// Resolves a relative path against `base`.
///
/// A leading `"/"` makes `rel` absolute and `".."` steps up from `base`.
pub fn abs_decode_path(base: &DecodePath, rel: &[String]) -> DecodePath {
    match rel.split_first() {
        Some((first, rest)) if first == "/" => {
            rest.iter().map(String::as_str).collect()
        }
        Some((first, rest)) if first == ".." => {
            abs_decode_path(&base.parent(), rest)
        }
        _ => {
            let mut res = base.clone();
            for elem in rel {
                res.push(elem.as_str());
            }
            res
        }
    }
}

/// Returns the rules of the first pattern matching `path`.
pub fn get_def_by_path<'a, T>(
    rules: &'a [(PathPattern, T)], path: &DecodePath
) -> Option<&'a T> {
    rules.iter().find(|(pattern, _)| pattern.matches(path)).map(|(_, t)| t)
}


//------------ Session -------------------------------------------------------

/// The state of a single top-level decode call.
///
/// Apart from the context, the session collects the DEFINED BY
/// associations found so far so that fields decoded later can pick them
/// up. It is created anew for every call and never outlives it.
pub(crate) struct Session<'c> {
    pub ctx: &'c Context,
    defines: Vec<(DecodePath, Oid, Schema)>,
}

impl<'c> Session<'c> {
    pub fn new(ctx: &'c Context) -> Self {
        Session { ctx, defines: Vec::new() }
    }

    /// Remembers that the value at `path` is to be decoded with `schema`.
    pub fn register(&mut self, path: DecodePath, oid: Oid, schema: Schema) {
        log::debug!("DEFINED BY {} registered for {}", oid, path);
        self.defines.push((path, oid, schema))
    }

    /// Returns the association registered for `path`.
    pub fn lookup(&self, path: &DecodePath) -> Option<(Oid, Schema)> {
        self.defines.iter().find(|(item, _, _)| item == path).map(
            |(_, oid, schema)| (oid.clone(), schema.clone())
        )
    }
}


//============ Tests =========================================================
