//! Opaque attribute values.
//!
//! Debug annotations carry source-language type parameters (widths, element
//! types, generator arguments) that extraction never interprets. They are
//! kept as a small attribute tree and passed through unchanged.

use crate::Name;

/// An opaque attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attr {
    Int(i64),
    Bool(bool),
    Str(Name),
    Array(Vec<Attr>),
    /// Ordered key/value pairs, as written.
    Dict(Vec<(Name, Attr)>),
}

impl Attr {
    /// Look up a key in a `Dict` attribute.
    pub fn get(&self, key: Name) -> Option<&Attr> {
        match self {
            Attr::Dict(entries) => entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}
