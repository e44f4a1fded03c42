//! Walking the structure of a value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use bytes::Bytes;
use crate::error::DecodePath;
use crate::length::EOC;
use crate::tag::Tag;
use crate::value::{Content, Value};


//------------ Node ----------------------------------------------------------

/// The description of a single node in the structure of a value.
///
/// Nodes are produced by [`Value::nodes`]. Apart from nodes for the value
/// and everything contained in it, there are nodes for end-of-contents
/// markers of values using the indefinite length form. These have no
/// value and `eoc` set.
#[derive(Clone, Debug)]
pub struct Node<'a> {
    /// The described value. `None` for end-of-contents markers.
    pub value: Option<&'a Value>,

    /// The name of the type.
    pub type_name: Cow<'static, str>,

    /// The name of the kind of the type in ASN.1 notation.
    pub asn1_type_name: &'static str,

    /// The field name or element index of the value.
    pub name: Option<String>,

    pub decode_path: DecodePath,

    /// The nesting level starting at zero.
    pub depth: usize,

    pub tag: Option<Tag>,
    pub expl: Option<Tag>,
    pub implicit: bool,
    pub optional: bool,

    /// Whether the value is the default value of its field.
    pub default: bool,

    pub offset: usize,
    pub tlen: usize,
    pub llen: usize,
    pub vlen: usize,
    pub expl_offset: usize,
    pub expl_tlen: usize,
    pub expl_llen: usize,
    pub expl_vlen: usize,
    pub expl_lenindef: bool,
    pub lenindef: bool,
    pub ber_encoded: bool,
    pub bered: bool,

    /// The value as text for primitive values.
    pub text: Option<String>,

    /// The octets of octet string based values and ANY values.
    pub blob: Option<Bytes>,

    /// Whether the node is an end-of-contents marker.
    pub eoc: bool,
}

impl<'a> Node<'a> {
    fn from_value(
        value: &'a Value,
        name: Option<String>,
        decode_path: DecodePath,
        depth: usize,
        default: bool,
    ) -> Self {
        let schema = value.schema();
        let text = match value.content() {
            Content::Choice(_) | Content::Fields(_) | Content::Items(_) => None,
            _ => Some(value.to_string())
        };
        let blob = match value.content() {
            Content::OctetString(octets) | Content::String(octets)
            | Content::Any(octets) => Some(octets.clone()),
            Content::BitString(bits) => Some(bits.octet_bytes()),
            _ => None
        };
        Node {
            value: Some(value),
            type_name: schema.type_name(),
            asn1_type_name: schema.kind().asn1_name(),
            name,
            decode_path,
            depth,
            tag: schema.tag(),
            expl: schema.expl(),
            implicit: schema.is_implicit(),
            optional: schema.is_optional(),
            default,
            offset: value.offset(),
            tlen: value.tlen(),
            llen: value.llen(),
            vlen: value.vlen(),
            expl_offset: value.expl_offset(),
            expl_tlen: value.expl_tlen(),
            expl_llen: value.expl_llen(),
            expl_vlen: value.expl_vlen(),
            expl_lenindef: value.expl_lenindef(),
            lenindef: value.lenindef(),
            ber_encoded: value.ber_encoded(),
            bered: value.bered(),
            text,
            blob,
            eoc: false,
        }
    }

    fn eoc(
        name: Option<String>, decode_path: DecodePath, depth: usize,
        offset: usize,
    ) -> Self {
        Node {
            value: None,
            type_name: Cow::Borrowed("EOC"),
            asn1_type_name: "EOC",
            name,
            decode_path,
            depth,
            tag: Some(Tag::END_OF_VALUE),
            expl: None,
            implicit: false,
            optional: false,
            default: false,
            offset,
            tlen: 1,
            llen: 1,
            vlen: 0,
            expl_offset: offset,
            expl_tlen: 0,
            expl_llen: 0,
            expl_vlen: 0,
            expl_lenindef: false,
            lenindef: false,
            ber_encoded: true,
            bered: true,
            text: None,
            blob: None,
            eoc: true,
        }
    }
}


//------------ Nodes ---------------------------------------------------------

/// An iterator over the nodes of a value in pre-order.
///
/// Each value is followed by the values it contains, then the value
/// decoded through a DEFINED BY rule if there is one, and finally the
/// end-of-contents markers of the value and of its explicit tag.
pub struct Nodes<'a> {
    stack: Vec<Pending<'a>>,
}

enum Pending<'a> {
    Value {
        value: &'a Value,
        name: Option<String>,
        path: DecodePath,
        depth: usize,
        default: bool,
    },
    Eoc {
        name: Option<String>,
        path: DecodePath,
        depth: usize,
        offset: usize,
    },
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(value: &'a Value) -> Self {
        Nodes {
            stack: vec![Pending::Value {
                value,
                name: None,
                path: DecodePath::new(),
                depth: 0,
                default: false,
            }]
        }
    }

    /// Queues everything following the node of a value.
    fn push_following(
        &mut self, value: &'a Value, path: &DecodePath, depth: usize
    ) {
        if value.expl_lenindef() {
            self.stack.push(Pending::Eoc {
                name: Some("EXPLICIT".into()),
                path: path.clone(),
                depth,
                offset: value.expl_offset() + value.fulllen() - EOC.len(),
            });
        }
        if value.lenindef() {
            self.stack.push(Pending::Eoc {
                name: None,
                path: path.clone(),
                depth,
                offset: value.offset() + value.tlvlen() - EOC.len(),
            });
        }
        if let Some((oid, defined)) = value.defined() {
            self.stack.push(Pending::Value {
                value: defined,
                name: Some(format!("DEFINED BY {}", oid)),
                path: path.join(oid.clone()),
                depth: depth + 1,
                default: false,
            });
        }
        let mut children = Vec::new();
        match value.content() {
            Content::Choice(Some((_, chosen))) => {
                if let Some(name) = value.choice() {
                    children.push((name.to_string(), chosen.as_ref(), false));
                }
            }
            Content::Fields(_) => {
                for (name, field) in value.fields() {
                    let default = value.schema().field(name).map_or(
                        false, |item| item.schema().is_default(field)
                    );
                    children.push((name.to_string(), field, default));
                }
            }
            Content::Items(items) => {
                for (i, item) in items.iter().enumerate() {
                    children.push((i.to_string(), item, false));
                }
            }
            _ => { }
        }
        for (name, child, default) in children.into_iter().rev() {
            self.stack.push(Pending::Value {
                value: child,
                path: path.join(name.as_str()),
                name: Some(name),
                depth: depth + 1,
                default,
            });
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stack.pop()? {
            Pending::Value { value, name, path, depth, default } => {
                self.push_following(value, &path, depth);
                Some(Node::from_value(value, name, path, depth, default))
            }
            Pending::Eoc { name, path, depth, offset } => {
                Some(Node::eoc(name, path, depth, offset))
            }
        }
    }
}

impl Value {
    /// Returns an iterator over the structure of the value.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self)
    }
}


//============ Tests =========================================================
