//! Closed enumerations and the `Enum` attribute that stores them.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::attribute::{AttrMut, AttrRef, Attribute, Element, EnumAttribute, Keyed};
use crate::types::{Kind, ValueKind};

/// A Rust enum with a declared name and integer code per enumerator.
///
/// Implemented by the [`enumeration!`](crate::enumeration) macro. The first
/// declared enumerator is the default.
pub trait Enumerated: Copy + PartialEq + Default + fmt::Debug + 'static {
    const TYPE_NAME: &'static str;

    /// `(enumerator, name, code)` in declaration order.
    const ENTRIES: &'static [(Self, &'static str, i32)];

    fn name(self) -> &'static str {
        Self::ENTRIES
            .iter()
            .find(|(value, _, _)| *value == self)
            .map_or("", |(_, name, _)| *name)
    }

    fn code(self) -> i32 {
        Self::ENTRIES
            .iter()
            .find(|(value, _, _)| *value == self)
            .map_or(0, |(_, _, code)| *code)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ENTRIES
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(value, _, _)| *value)
    }

    fn from_code(code: i32) -> Option<Self> {
        Self::ENTRIES
            .iter()
            .find(|(_, _, c)| *c == code)
            .map(|(value, _, _)| *value)
    }
}

/// Declare a Rust enum together with its [`Enumerated`] table.
///
/// Each enumerator takes an integer code and optionally a text name; the
/// identifier is used when no name is given.
///
/// ```rust
/// structpack_core::enumeration! {
///     pub enum Colour {
///         Red = 0 => "RED",
///         Green = 1,
///     }
/// }
///
/// use structpack_core::Enumerated;
/// assert_eq!(Colour::default(), Colour::Red);
/// assert_eq!(Colour::Red.name(), "RED");
/// assert_eq!(Colour::from_code(1), Some(Colour::Green));
/// ```
#[macro_export]
macro_rules! enumeration {
    (@name $variant:ident) => {
        stringify!($variant)
    };
    (@name $variant:ident $name:literal) => {
        $name
    };
    (
        $(#[$attr:meta])*
        $vis:vis enum $enum_name:ident {
            $(
                $(#[$variant_attr:meta])*
                $variant:ident = $code:literal $(=> $name:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $enum_name {
            $(
                $(#[$variant_attr])*
                $variant = $code,
            )+
        }

        impl $crate::Enumerated for $enum_name {
            const TYPE_NAME: &'static str = stringify!($enum_name);
            const ENTRIES: &'static [(Self, &'static str, i32)] = &[
                $(
                    (
                        $enum_name::$variant,
                        $crate::enumeration!(@name $variant $($name)?),
                        $code,
                    ),
                )+
            ];
        }

        impl ::std::default::Default for $enum_name {
            fn default() -> Self {
                <Self as $crate::Enumerated>::ENTRIES[0].0
            }
        }
    };
}

/// An enumeration attribute with a current enumerator and a default.
#[derive(Clone)]
pub struct Enum<T: Enumerated> {
    key: Cow<'static, str>,
    value: T,
    default: T,
}

impl<T: Enumerated> Enum<T> {
    pub fn new(value: T) -> Self {
        Self {
            key: Cow::Borrowed(""),
            value,
            default: T::default(),
        }
    }

    pub fn with_default(default: T) -> Self {
        Self {
            key: Cow::Borrowed(""),
            value: default,
            default,
        }
    }

    pub fn default_value(mut self, default: T) -> Self {
        self.default = default;
        self
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn def_value(&self) -> T {
        self.default
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: Enumerated> Default for Enum<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Enumerated> fmt::Debug for Enum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enum")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("default", &self.default)
            .finish()
    }
}

impl<T: Enumerated> Keyed for Enum<T> {
    fn keyed(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }
}

impl<T: Enumerated> Attribute for Enum<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> Kind {
        Kind::Enum
    }

    fn type_name(&self) -> String {
        format!("Enum<{}>", T::TYPE_NAME)
    }

    fn has_value(&self) -> bool {
        self.value != self.default
    }

    fn clear(&mut self) {
        self.value = self.default;
    }

    fn compare(&self, other: &dyn Attribute) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self.value == other.value)
    }

    fn set(&mut self, other: &dyn Attribute) {
        if let Some(other) = other.as_any().downcast_ref::<Self>() {
            self.value = other.value;
        }
    }

    fn take(&mut self, other: &mut dyn Attribute) {
        if let Some(other) = other.as_any_mut().downcast_mut::<Self>() {
            self.value = other.value;
            other.value = other.default;
        }
    }

    fn view(&self) -> AttrRef<'_> {
        AttrRef::Enum(self)
    }

    fn view_mut(&mut self) -> AttrMut<'_> {
        AttrMut::Enum(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: Enumerated> EnumAttribute for Enum<T> {
    fn as_str(&self) -> &'static str {
        self.value.name()
    }

    fn set_from_str(&mut self, name: &str) {
        self.value = T::from_name(name).unwrap_or(self.default);
    }

    fn as_int(&self) -> i32 {
        self.value.code()
    }

    fn set_from_int(&mut self, code: i32) {
        self.value = T::from_code(code).unwrap_or(self.default);
    }

    fn values(&self) -> Vec<(&'static str, i32)> {
        T::ENTRIES.iter().map(|(_, name, code)| (*name, *code)).collect()
    }
}

impl<T: Enumerated> Element for Enum<T> {
    const KIND: Kind = Kind::Enum;
    const VALUE_KIND: Option<ValueKind> = Some(ValueKind::Int32);

    fn element_name() -> Cow<'static, str> {
        Cow::Borrowed(T::TYPE_NAME)
    }
}

impl<T: Enumerated> PartialEq for Enum<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Enumerated> PartialEq<T> for Enum<T> {
    fn eq(&self, other: &T) -> bool {
        self.value == *other
    }
}

impl<T: Enumerated> From<T> for Enum<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}
