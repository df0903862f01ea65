//! Mirror value tree walked by the merge engine.
//!
//! Rust has no runtime reflection, so values to be merged are represented as
//! an explicit tree of [`Value`] nodes that mirrors the host type's shape:
//! scalars, handles, sequences, maps, references, and named-field structures.
//! [`Kind`] names the shape at one tree position and drives engine dispatch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural shape of a value at one tree position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// UTF-8 string scalar.
    String,
    /// Boolean scalar.
    Bool,
    /// Signed integer scalar, any width.
    Int,
    /// Unsigned integer scalar, any width.
    Uint,
    /// Floating point scalar.
    Float,
    /// Complex number scalar.
    Complex,
    /// Callable handle.
    Func,
    /// Channel-like handle.
    Chan,
    /// Growable sequence; may be nil.
    Slice,
    /// Fixed-size sequence; never nil.
    Array,
    /// Keyed mapping; may be nil.
    Map,
    /// Pointer / optional reference.
    Ref,
    /// Ordered set of named fields.
    Struct,
    /// A shape the engine has no rule for.
    Opaque,
}

impl Kind {
    /// Lower-case kind name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Complex => "complex",
            Kind::Func => "func",
            Kind::Chan => "chan",
            Kind::Slice => "slice",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Ref => "ref",
            Kind::Struct => "struct",
            Kind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of an opaque runtime handle (channel or callable).
///
/// The engine never looks inside a handle; it only compares against the nil
/// handle and copies the identity wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleId(pub u64);

/// Complex number scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }
}

/// Struct-shaped value with fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructValue {
    /// Host type name, carried for diagnostics.
    pub type_name: String,
    /// Named field values in declaration order.
    pub fields: Vec<FieldValue>,
}

/// One named field of a [`StructValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        FieldValue {
            name: name.into(),
            value,
        }
    }
}

/// One node of the mirror tree.
///
/// Nil-ability is modelled where the host runtime has it: slices, maps,
/// references, and handles distinguish nil from empty; arrays and structs do
/// not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex),
    Func(Option<HandleId>),
    Chan(Option<HandleId>),
    Slice(Option<Vec<Value>>),
    Array(Vec<Value>),
    Map(Option<IndexMap<String, Value>>),
    Ref(Option<Box<Value>>),
    Struct(StructValue),
    /// A value the engine has no rule for; carries the host type name.
    Opaque(String),
}

impl Value {
    /// Shape of this node.
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Complex(_) => Kind::Complex,
            Value::Func(_) => Kind::Func,
            Value::Chan(_) => Kind::Chan,
            Value::Slice(_) => Kind::Slice,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
            Value::Ref(_) => Kind::Ref,
            Value::Struct(_) => Kind::Struct,
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    /// Whether this node holds its kind's zero value.
    ///
    /// An empty-but-non-nil slice or map is NOT zero; nil-ability, not length,
    /// decides zero-ness for nil-able kinds. Arrays and structs are zero when
    /// every element or field is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Uint(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Complex(c) => c.re == 0.0 && c.im == 0.0,
            Value::Func(h) | Value::Chan(h) => h.is_none(),
            Value::Slice(items) => items.is_none(),
            Value::Array(items) => items.iter().all(Value::is_zero),
            Value::Map(entries) => entries.is_none(),
            Value::Ref(referent) => referent.is_none(),
            Value::Struct(s) => s.fields.iter().all(|f| f.value.is_zero()),
            Value::Opaque(_) => false,
        }
    }

    /// A non-null reference to `value`.
    pub fn reference(value: Value) -> Value {
        Value::Ref(Some(Box::new(value)))
    }

    /// The null reference.
    pub fn null_ref() -> Value {
        Value::Ref(None)
    }

    /// A non-nil slice holding `items`.
    pub fn slice<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Slice(Some(items.into_iter().collect()))
    }

    /// The nil slice.
    pub fn nil_slice() -> Value {
        Value::Slice(None)
    }

    /// A non-nil map holding `entries` in iteration order.
    pub fn map<K, I>(entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(Some(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// The nil map.
    pub fn nil_map() -> Value {
        Value::Map(None)
    }

    /// A struct value with fields in declaration order.
    pub fn structure<N, I>(type_name: N, fields: I) -> Value
    where
        N: Into<String>,
        I: IntoIterator<Item = FieldValue>,
    {
        Value::Struct(StructValue {
            type_name: type_name.into(),
            fields: fields.into_iter().collect(),
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}
