//! Kind tags and the scalar currency exchanged with backends.

use std::borrow::Cow;
use std::fmt;

use crate::value::Primitive;

/// The closed set of attribute kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Node,
    Value,
    Enum,
    List,
    Map,
    Variant,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Node => "Node",
            Kind::Value => "Value",
            Kind::Enum => "Enum",
            Kind::List => "List",
            Kind::Map => "Map",
            Kind::Variant => "Variant",
        }
    }

    /// Kinds whose content is a single primitive or enumerator.
    pub fn is_leaf(self) -> bool {
        matches!(self, Kind::Value | Kind::Enum)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Bytes,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Double,
    Bool,
}

impl ValueKind {
    pub const ALL: [ValueKind; 9] = [
        ValueKind::String,
        ValueKind::Bytes,
        ValueKind::Int32,
        ValueKind::Int64,
        ValueKind::UInt32,
        ValueKind::UInt64,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::Bool,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "String",
            ValueKind::Bytes => "Bytes",
            ValueKind::Int32 => "Int32",
            ValueKind::Int64 => "Int64",
            ValueKind::UInt32 => "UInt32",
            ValueKind::UInt64 => "UInt64",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Bool => "Bool",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, ValueKind::String | ValueKind::Bytes | ValueKind::Bool)
    }

    /// Kinds with a fixed-width or varint encoding.
    pub fn is_packable(self) -> bool {
        !matches!(self, ValueKind::String | ValueKind::Bytes)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One primitive value, borrowed when packing and owned when unpacking.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    String(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
}

impl<'a> Scalar<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::String(_) => ValueKind::String,
            Scalar::Bytes(_) => ValueKind::Bytes,
            Scalar::Int32(_) => ValueKind::Int32,
            Scalar::Int64(_) => ValueKind::Int64,
            Scalar::UInt32(_) => ValueKind::UInt32,
            Scalar::UInt64(_) => ValueKind::UInt64,
            Scalar::Float(_) => ValueKind::Float,
            Scalar::Double(_) => ValueKind::Double,
            Scalar::Bool(_) => ValueKind::Bool,
        }
    }

    pub fn into_owned(self) -> Scalar<'static> {
        match self {
            Scalar::String(s) => Scalar::String(Cow::Owned(s.into_owned())),
            Scalar::Bytes(b) => Scalar::Bytes(Cow::Owned(b.into_owned())),
            Scalar::Int32(v) => Scalar::Int32(v),
            Scalar::Int64(v) => Scalar::Int64(v),
            Scalar::UInt32(v) => Scalar::UInt32(v),
            Scalar::UInt64(v) => Scalar::UInt64(v),
            Scalar::Float(v) => Scalar::Float(v),
            Scalar::Double(v) => Scalar::Double(v),
            Scalar::Bool(v) => Scalar::Bool(v),
        }
    }

    /// Coerce into `kind` using the rules in [`crate::convert`].
    ///
    /// `None` when the source has no meaningful value of that kind, such as
    /// text that does not parse as a number.
    pub fn convert_to(self, kind: ValueKind) -> Option<Scalar<'static>> {
        if self.kind() == kind {
            return Some(self.into_owned());
        }
        Some(match kind {
            ValueKind::String => Scalar::String(Cow::Owned(String::from_scalar(self)?)),
            ValueKind::Bytes => Scalar::Bytes(Cow::Owned(Vec::<u8>::from_scalar(self)?)),
            ValueKind::Int32 => Scalar::Int32(i32::from_scalar(self)?),
            ValueKind::Int64 => Scalar::Int64(i64::from_scalar(self)?),
            ValueKind::UInt32 => Scalar::UInt32(u32::from_scalar(self)?),
            ValueKind::UInt64 => Scalar::UInt64(u64::from_scalar(self)?),
            ValueKind::Float => Scalar::Float(f32::from_scalar(self)?),
            ValueKind::Double => Scalar::Double(f64::from_scalar(self)?),
            ValueKind::Bool => Scalar::Bool(bool::from_scalar(self)?),
        })
    }

    /// Like [`Scalar::convert_to`], falling back to [`Scalar::zero`].
    pub fn coerce(self, kind: ValueKind) -> Scalar<'static> {
        self.convert_to(kind).unwrap_or_else(|| Scalar::zero(kind))
    }

    /// The zero value of `kind`: empty text or bytes, `0`, `false`.
    pub fn zero(kind: ValueKind) -> Scalar<'static> {
        match kind {
            ValueKind::String => Scalar::String(Cow::Borrowed("")),
            ValueKind::Bytes => Scalar::Bytes(Cow::Borrowed(&[])),
            ValueKind::Int32 => Scalar::Int32(0),
            ValueKind::Int64 => Scalar::Int64(0),
            ValueKind::UInt32 => Scalar::UInt32(0),
            ValueKind::UInt64 => Scalar::UInt64(0),
            ValueKind::Float => Scalar::Float(0.0),
            ValueKind::Double => Scalar::Double(0.0),
            ValueKind::Bool => Scalar::Bool(false),
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{:?}", s),
            Scalar::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Scalar::Int32(v) => write!(f, "{}", v),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::UInt32(v) => write!(f, "{}", v),
            Scalar::UInt64(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Double(v) => write!(f, "{}", v),
            Scalar::Bool(v) => write!(f, "{}", v),
        }
    }
}
