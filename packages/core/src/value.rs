//! Primitive attributes: a current value plus a default baseline.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use crate::attribute::{AttrMut, AttrRef, Attribute, Element, Keyed};
use crate::convert::ConvertFrom;
use crate::types::{Kind, Scalar, ValueKind};

mod sealed {
    pub trait Sealed {}
}

/// The primitive types a [`Value`] can hold.
///
/// Sealed: the set is closed so that backends can match it exhaustively
/// through [`ValueRef`] and [`ValueMut`].
pub trait Primitive:
    sealed::Sealed
    + Clone
    + Default
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + 'static
    + for<'a> ConvertFrom<&'a str>
    + for<'a> ConvertFrom<&'a [u8]>
    + ConvertFrom<i32>
    + ConvertFrom<i64>
    + ConvertFrom<u32>
    + ConvertFrom<u64>
    + ConvertFrom<f32>
    + ConvertFrom<f64>
    + ConvertFrom<bool>
{
    const KIND: ValueKind;

    fn to_scalar(&self) -> Scalar<'_>;

    fn wrap(value: &Value<Self>) -> ValueRef<'_>;

    fn wrap_mut(value: &mut Value<Self>) -> ValueMut<'_>;

    /// Coerce any scalar into `Self`.
    fn from_scalar(scalar: Scalar<'_>) -> Option<Self> {
        match scalar {
            Scalar::String(s) => Self::convert_from(&*s),
            Scalar::Bytes(b) => Self::convert_from(&*b),
            Scalar::Int32(v) => Self::convert_from(v),
            Scalar::Int64(v) => Self::convert_from(v),
            Scalar::UInt32(v) => Self::convert_from(v),
            Scalar::UInt64(v) => Self::convert_from(v),
            Scalar::Float(v) => Self::convert_from(v),
            Scalar::Double(v) => Self::convert_from(v),
            Scalar::Bool(v) => Self::convert_from(v),
        }
    }
}

macro_rules! primitive {
    ($($ty:ty => $variant:ident, $to_scalar:expr;)*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Primitive for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn to_scalar(&self) -> Scalar<'_> {
                    let to_scalar: fn(&$ty) -> Scalar<'_> = $to_scalar;
                    to_scalar(self)
                }

                fn wrap(value: &Value<Self>) -> ValueRef<'_> {
                    ValueRef::$variant(value)
                }

                fn wrap_mut(value: &mut Value<Self>) -> ValueMut<'_> {
                    ValueMut::$variant(value)
                }
            }
        )*
    };
}

primitive! {
    String => String, |v| Scalar::String(Cow::Borrowed(v.as_str()));
    Vec<u8> => Bytes, |v| Scalar::Bytes(Cow::Borrowed(v.as_slice()));
    i32 => Int32, |v| Scalar::Int32(*v);
    i64 => Int64, |v| Scalar::Int64(*v);
    u32 => UInt32, |v| Scalar::UInt32(*v);
    u64 => UInt64, |v| Scalar::UInt64(*v);
    f32 => Float, |v| Scalar::Float(*v);
    f64 => Double, |v| Scalar::Double(*v);
    bool => Bool, |v| Scalar::Bool(*v);
}

/// Typed read access to a primitive attribute.
pub enum ValueRef<'a> {
    String(&'a Value<String>),
    Bytes(&'a Value<Vec<u8>>),
    Int32(&'a Value<i32>),
    Int64(&'a Value<i64>),
    UInt32(&'a Value<u32>),
    UInt64(&'a Value<u64>),
    Float(&'a Value<f32>),
    Double(&'a Value<f64>),
    Bool(&'a Value<bool>),
}

impl<'a> ValueRef<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueRef::String(_) => ValueKind::String,
            ValueRef::Bytes(_) => ValueKind::Bytes,
            ValueRef::Int32(_) => ValueKind::Int32,
            ValueRef::Int64(_) => ValueKind::Int64,
            ValueRef::UInt32(_) => ValueKind::UInt32,
            ValueRef::UInt64(_) => ValueKind::UInt64,
            ValueRef::Float(_) => ValueKind::Float,
            ValueRef::Double(_) => ValueKind::Double,
            ValueRef::Bool(_) => ValueKind::Bool,
        }
    }

    /// The current value.
    pub fn scalar(&self) -> Scalar<'a> {
        match *self {
            ValueRef::String(v) => v.value.to_scalar(),
            ValueRef::Bytes(v) => v.value.to_scalar(),
            ValueRef::Int32(v) => v.value.to_scalar(),
            ValueRef::Int64(v) => v.value.to_scalar(),
            ValueRef::UInt32(v) => v.value.to_scalar(),
            ValueRef::UInt64(v) => v.value.to_scalar(),
            ValueRef::Float(v) => v.value.to_scalar(),
            ValueRef::Double(v) => v.value.to_scalar(),
            ValueRef::Bool(v) => v.value.to_scalar(),
        }
    }
}

/// Typed write access to a primitive attribute.
pub enum ValueMut<'a> {
    String(&'a mut Value<String>),
    Bytes(&'a mut Value<Vec<u8>>),
    Int32(&'a mut Value<i32>),
    Int64(&'a mut Value<i64>),
    UInt32(&'a mut Value<u32>),
    UInt64(&'a mut Value<u64>),
    Float(&'a mut Value<f32>),
    Double(&'a mut Value<f64>),
    Bool(&'a mut Value<bool>),
}

impl ValueMut<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueMut::String(_) => ValueKind::String,
            ValueMut::Bytes(_) => ValueKind::Bytes,
            ValueMut::Int32(_) => ValueKind::Int32,
            ValueMut::Int64(_) => ValueKind::Int64,
            ValueMut::UInt32(_) => ValueKind::UInt32,
            ValueMut::UInt64(_) => ValueKind::UInt64,
            ValueMut::Float(_) => ValueKind::Float,
            ValueMut::Double(_) => ValueKind::Double,
            ValueMut::Bool(_) => ValueKind::Bool,
        }
    }

    /// Store `scalar`, coercing it to this value's kind. Returns `false`
    /// and leaves the value unchanged when the scalar cannot be coerced.
    pub fn assign(&mut self, scalar: Scalar<'_>) -> bool {
        match self {
            ValueMut::String(v) => v.assign_scalar(scalar),
            ValueMut::Bytes(v) => v.assign_scalar(scalar),
            ValueMut::Int32(v) => v.assign_scalar(scalar),
            ValueMut::Int64(v) => v.assign_scalar(scalar),
            ValueMut::UInt32(v) => v.assign_scalar(scalar),
            ValueMut::UInt64(v) => v.assign_scalar(scalar),
            ValueMut::Float(v) => v.assign_scalar(scalar),
            ValueMut::Double(v) => v.assign_scalar(scalar),
            ValueMut::Bool(v) => v.assign_scalar(scalar),
        }
    }
}

/// A primitive attribute holding a current value and a default baseline.
///
/// ```rust
/// use structpack_core::{Attribute, Int32};
///
/// let mut count = Int32::with_default(11);
/// assert!(!count.has_value());
/// count.set_value(42);
/// assert!(count.has_value());
/// count.clear();
/// assert_eq!(*count.value(), 11);
/// ```
#[derive(Clone)]
pub struct Value<T: Primitive> {
    key: Cow<'static, str>,
    value: T,
    default: T,
}

pub type Text = Value<String>;
pub type Binary = Value<Vec<u8>>;
pub type Int32 = Value<i32>;
pub type Int64 = Value<i64>;
pub type UInt32 = Value<u32>;
pub type UInt64 = Value<u64>;
pub type Float = Value<f32>;
pub type Double = Value<f64>;
pub type Bool = Value<bool>;

impl<T: Primitive> Value<T> {
    /// Value with the type's zero as default.
    pub fn new(value: T) -> Self {
        Self {
            key: Cow::Borrowed(""),
            value,
            default: T::default(),
        }
    }

    /// Value whose current content and baseline are both `default`.
    pub fn with_default(default: T) -> Self {
        Self {
            key: Cow::Borrowed(""),
            value: default.clone(),
            default,
        }
    }

    /// Replace the baseline, keeping the current content.
    pub fn default_value(mut self, default: T) -> Self {
        self.default = default;
        self
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn def_value(&self) -> &T {
        &self.default
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub fn into_value(self) -> T {
        self.value
    }

    fn assign_scalar(&mut self, scalar: Scalar<'_>) -> bool {
        match T::from_scalar(scalar) {
            Some(value) => {
                self.value = value;
                true
            }
            None => false,
        }
    }
}

impl<T: Primitive> Default for Value<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Primitive> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("default", &self.default)
            .finish()
    }
}

impl<T: Primitive> Keyed for Value<T> {
    fn keyed(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }
}

impl<T: Primitive> Attribute for Value<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> Kind {
        Kind::Value
    }

    fn type_name(&self) -> String {
        format!("Value<{}>", T::KIND)
    }

    fn has_value(&self) -> bool {
        self.value != self.default
    }

    fn clear(&mut self) {
        self.value = self.default.clone();
    }

    fn compare(&self, other: &dyn Attribute) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.value == other.value)
    }

    fn set(&mut self, other: &dyn Attribute) {
        if let Some(other) = other.as_any().downcast_ref::<Self>() {
            self.value = other.value.clone();
        }
    }

    fn take(&mut self, other: &mut dyn Attribute) {
        if let Some(other) = other.as_any_mut().downcast_mut::<Self>() {
            let reset = other.default.clone();
            self.value = std::mem::replace(&mut other.value, reset);
        }
    }

    fn view(&self) -> AttrRef<'_> {
        AttrRef::Value(T::wrap(self))
    }

    fn view_mut(&mut self) -> AttrMut<'_> {
        AttrMut::Value(T::wrap_mut(self))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Primitive> Element for Value<T> {
    const KIND: Kind = Kind::Value;
    const VALUE_KIND: Option<ValueKind> = Some(T::KIND);

    fn element_name() -> Cow<'static, str> {
        Cow::Borrowed(T::KIND.name())
    }
}

impl<T: Primitive> PartialEq for Value<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Primitive> PartialEq<T> for Value<T> {
    fn eq(&self, other: &T) -> bool {
        &self.value == other
    }
}

impl<T: Primitive> PartialOrd for Value<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<T: Primitive> From<T> for Value<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Primitive + fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

/// Primitives that support compound arithmetic.
pub trait Numeric:
    Primitive
    + Copy
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
{
}

impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for u32 {}
impl Numeric for u64 {}
impl Numeric for f32 {}
impl Numeric for f64 {}

macro_rules! compound_ops {
    ($($trait:ident::$method:ident => $op:tt),*) => {
        $(
            impl<T: Numeric> $trait<T> for Value<T> {
                fn $method(&mut self, rhs: T) {
                    self.value = self.value $op rhs;
                }
            }

            impl<T: Numeric> $trait<&Value<T>> for Value<T> {
                fn $method(&mut self, rhs: &Value<T>) {
                    self.value = self.value $op rhs.value;
                }
            }
        )*
    };
}

compound_ops!(AddAssign::add_assign => +, SubAssign::sub_assign => -, MulAssign::mul_assign => *, DivAssign::div_assign => /);

impl Value<String> {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn push_str(&mut self, text: &str) {
        self.value.push_str(text);
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl PartialEq<&str> for Value<String> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl AddAssign<&str> for Value<String> {
    fn add_assign(&mut self, rhs: &str) {
        self.value.push_str(rhs);
    }
}

impl Value<Vec<u8>> {
    /// Binary value holding the UTF-8 bytes of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }

    pub fn set_text(&mut self, text: &str) {
        self.value = text.as_bytes().to_vec();
    }

    /// Content as text, with invalid UTF-8 replaced.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_value() {
        let mut val = Int32::default();
        assert_eq!(val, 0);
        assert!(!val.has_value());
        assert_eq!(val.kind(), Kind::Value);
        assert_eq!(val.type_name(), "Value<Int32>");

        val.set_value(10);
        assert_eq!(val, 10);
        assert!(val.has_value());

        let mut val2 = Int32::new(42).default_value(11);
        assert_eq!(*val2.value(), 42);
        assert_eq!(*val2.def_value(), 11);
        val2.clear();
        assert_eq!(val2, 11);
        assert!(!val2.has_value());
    }

    #[test]
    fn copy_keeps_own_default() {
        let val = Int32::new(42).default_value(11);
        let mut copy = Int32::with_default(3);
        copy.set(&val);
        assert_eq!(copy, 42);
        assert_eq!(*copy.def_value(), 3);
        assert!(copy.compare(&val));
    }

    #[test]
    fn take_leaves_source_at_default() {
        let mut source = Text::with_default("empty".to_string());
        source.set_value("full".into());
        let mut target = Text::default();
        target.take(&mut source);
        assert_eq!(target, "full");
        assert_eq!(source, "empty");
        assert!(!source.has_value());
    }

    #[test]
    fn kind_mismatch_is_silent() {
        let text = Text::from("42");
        let mut number = Int32::new(7);
        number.set(&text);
        assert_eq!(number, 7);
        assert!(!number.compare(&text));
    }

    #[test]
    fn compound_arithmetic() {
        let mut val = Int32::new(10);
        val += 5;
        assert_eq!(val, 15);
        val -= 3;
        assert_eq!(val, 12);
        val *= 2;
        assert_eq!(val, 24);
        val /= 4;
        assert_eq!(val, 6);

        let other = Int32::new(4);
        val += &other;
        assert_eq!(val, 10);

        let mut d = Double::new(1.5);
        d *= 2.0;
        assert_eq!(d, 3.0);
    }

    #[test]
    fn compound_arithmetic_keeps_default() {
        let mut val = Int64::with_default(5);
        val += 1;
        assert_eq!(*val.def_value(), 5);
        assert!(val.has_value());
    }

    #[test]
    fn text_value() {
        let mut text = Text::from("dead");
        text += " parrot";
        assert_eq!(text, "dead parrot");
        assert_eq!(text.as_str(), "dead parrot");
        assert_eq!(text.type_name(), "Value<String>");
        text.push_str("!");
        assert_eq!(text.len(), 12);
    }

    #[test]
    fn display_shows_current_value() {
        assert_eq!(Int32::new(-7).to_string(), "-7");
        assert_eq!(Text::from("spam").to_string(), "spam");
        assert_eq!(format!("{:>4}", UInt32::new(42)), "  42");
    }

    #[test]
    fn binary_value() {
        let mut bin = Binary::from_text("dead parrot");
        assert_eq!(bin.as_bytes()[0], b'd');
        assert_eq!(bin.as_text(), "dead parrot");
        assert!(bin.has_value());
        bin.set_text("");
        assert!(!bin.has_value());
        assert_eq!(bin.type_name(), "Value<Bytes>");
    }

    #[test]
    fn assign_through_view() {
        let mut val = UInt32::default();
        let AttrMut::Value(mut view) = val.view_mut() else {
            panic!("expected value view");
        };
        assert_eq!(view.kind(), ValueKind::UInt32);
        assert!(view.assign(Scalar::String(Cow::Borrowed("254"))));
        assert!(!view.assign(Scalar::String(Cow::Borrowed("parrot"))));
        assert_eq!(val, 254);
    }

    #[test]
    fn scalar_through_view() {
        let val = Float::new(22.5).keyed("ratio");
        assert_eq!(val.key(), "ratio");
        let AttrRef::Value(view) = val.view() else {
            panic!("expected value view");
        };
        assert_eq!(view.scalar(), Scalar::Float(22.5));
    }
}
