//! Tagged unions of record types.
//!
//! [`alternatives!`](crate::alternatives) declares a Rust enum with one
//! record per variant; [`Variant`] wraps it as an attribute. When a format
//! carries no explicit tag, [`VariantAttribute::find_better`] picks the
//! alternative from the keys observed in the input.

use std::any::Any;
use std::borrow::Cow;
use std::cmp::Reverse;
use std::fmt;

use crate::attribute::{
    AttrMut, AttrRef, Attribute, Element, Keyed, NodeAttribute, Record, VariantAttribute,
};
use crate::meta::Meta;
use crate::node;
use crate::types::Kind;

/// An enum of record alternatives. Implemented by
/// [`alternatives!`](crate::alternatives).
pub trait Alternatives: Clone + Default + fmt::Debug + 'static {
    const TYPE_NAME: &'static str;

    /// Metadata of each alternative in declaration order.
    const METAS: &'static [&'static Meta];

    fn index(&self) -> usize;

    /// A default instance of the alternative at `index`.
    fn activate(index: usize) -> Option<Self>;

    fn node(&self) -> &dyn NodeAttribute;

    fn node_mut(&mut self) -> &mut dyn NodeAttribute;
}

/// Declare the alternatives of a [`Variant`].
///
/// ```rust
/// use structpack_core::{alternatives, record, Int32, Text, Variant};
///
/// record! { pub struct Circle { pub radius: Int32 => "radius" } }
/// record! { pub struct Label { pub text: Text => "text" } }
///
/// alternatives! {
///     pub enum Shape {
///         Circle(Circle),
///         Label(Label),
///     }
/// }
///
/// let mut shape = Variant::<Shape>::default();
/// assert!(shape.is::<Circle>());
/// shape.reset::<Label>().text.set_value("hi".into());
/// assert_eq!(shape.get::<Label>().map(|l| l.text.as_str()), Some("hi"));
/// ```
#[macro_export]
macro_rules! alternatives {
    (@first $name:ident; $alt:ident($ty:ty) $(, $rest:ident($rest_ty:ty))*) => {
        $name::$alt(<$ty as ::std::default::Default>::default())
    };
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $($alt:ident($ty:ty)),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone)]
        $vis enum $name {
            $($alt($ty),)+
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                $crate::alternatives!(@first $name; $($alt($ty)),+)
            }
        }

        impl $crate::Alternatives for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const METAS: &'static [&'static $crate::Meta] =
                &[$(<$ty as $crate::Record>::META),+];

            #[allow(unused_assignments)]
            fn index(&self) -> usize {
                let mut position = 0usize;
                $(
                    if let $name::$alt(_) = self {
                        return position;
                    }
                    position += 1;
                )+
                position
            }

            #[allow(unused_assignments)]
            fn activate(index: usize) -> Option<Self> {
                let mut position = 0usize;
                $(
                    if position == index {
                        return Some($name::$alt(<$ty as ::std::default::Default>::default()));
                    }
                    position += 1;
                )+
                None
            }

            fn node(&self) -> &dyn $crate::NodeAttribute {
                match self {
                    $($name::$alt(value) => value,)+
                }
            }

            fn node_mut(&mut self) -> &mut dyn $crate::NodeAttribute {
                match self {
                    $($name::$alt(value) => value,)+
                }
            }
        }

        $(
            impl ::std::convert::From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    $name::$alt(value)
                }
            }
        )+
    };
}

/// A tagged-union attribute; exactly one alternative is active.
#[derive(Clone)]
pub struct Variant<U: Alternatives> {
    key: Cow<'static, str>,
    value: U,
}

impl<U: Alternatives> Variant<U> {
    pub fn new(value: impl Into<U>) -> Self {
        Self {
            key: Cow::Borrowed(""),
            value: value.into(),
        }
    }

    pub fn value(&self) -> &U {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut U {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<U>) {
        self.value = value.into();
    }

    /// Whether the active alternative is `T`.
    pub fn is<T: Record>(&self) -> bool {
        self.value.node().as_any().is::<T>()
    }

    pub fn get<T: Record>(&self) -> Option<&T> {
        self.value.node().as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.value.node_mut().as_any_mut().downcast_mut::<T>()
    }

    /// Activate a default `T` and return it.
    pub fn reset<T: Record>(&mut self) -> &mut T
    where
        U: From<T>,
    {
        self.value = U::from(T::default());
        match self.value.node_mut().as_any_mut().downcast_mut::<T>() {
            Some(active) => active,
            None => unreachable!("alternative {} was just activated", T::META.name()),
        }
    }

    pub fn as_node(&self) -> &dyn NodeAttribute {
        self.value.node()
    }

    pub fn as_node_mut(&mut self) -> &mut dyn NodeAttribute {
        self.value.node_mut()
    }
}

type Rank = (usize, Reverse<usize>, Reverse<usize>);

/// Rank of an alternative against the observed keys: more matched keys
/// first, then fewer unknown keys, then fewer unobserved fields. Ties go
/// to the earlier alternative.
fn rank(meta: &Meta, keys: &[&str]) -> Rank {
    let fields = meta.keys();
    let matched = keys
        .iter()
        .filter(|k| fields.iter().any(|f| f == *k))
        .count();
    let unknown = keys.len() - matched;
    let missing = fields
        .iter()
        .filter(|f| !keys.iter().any(|k| k == *f))
        .count();
    (matched, Reverse(unknown), Reverse(missing))
}

impl<U: Alternatives> Default for Variant<U> {
    fn default() -> Self {
        Self {
            key: Cow::Borrowed(""),
            value: U::default(),
        }
    }
}

impl<U: Alternatives> fmt::Debug for Variant<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<U: Alternatives> Keyed for Variant<U> {
    fn keyed(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = key.into();
        self
    }
}

impl<U: Alternatives> PartialEq for Variant<U> {
    fn eq(&self, other: &Self) -> bool {
        self.value.index() == other.value.index()
            && node::compare(self.value.node(), other.value.node().as_attribute())
    }
}

impl<U: Alternatives> Attribute for Variant<U> {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> Kind {
        Kind::Variant
    }

    fn type_name(&self) -> String {
        let names: Vec<&str> = U::METAS.iter().map(|m| m.name()).collect();
        format!("Variant<{}>", names.join(", "))
    }

    /// Any alternative other than the first counts as a value.
    fn has_value(&self) -> bool {
        self.value.index() != 0 || self.value.node().has_value()
    }

    fn clear(&mut self) {
        self.value = U::default();
    }

    fn compare(&self, other: &dyn Attribute) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }

    fn set(&mut self, other: &dyn Attribute) {
        if let Some(other) = other.as_any().downcast_ref::<Self>() {
            self.value = other.value.clone();
        }
    }

    fn take(&mut self, other: &mut dyn Attribute) {
        if let Some(other) = other.as_any_mut().downcast_mut::<Self>() {
            self.value = std::mem::take(&mut other.value);
        }
    }

    fn view(&self) -> AttrRef<'_> {
        AttrRef::Variant(self)
    }

    fn view_mut(&mut self) -> AttrMut<'_> {
        AttrMut::Variant(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<U: Alternatives> VariantAttribute for Variant<U> {
    fn index(&self) -> usize {
        self.value.index()
    }

    fn alternatives(&self) -> &'static [&'static Meta] {
        U::METAS
    }

    fn active(&self) -> &dyn NodeAttribute {
        self.value.node()
    }

    fn active_mut(&mut self) -> &mut dyn NodeAttribute {
        self.value.node_mut()
    }

    fn activate(&mut self, index: usize) -> bool {
        if index == self.value.index() {
            return true;
        }
        match U::activate(index) {
            Some(value) => {
                self.value = value;
                true
            }
            None => false,
        }
    }

    fn find_better(&mut self, keys: &[&str]) -> bool {
        if keys.is_empty() {
            return true;
        }

        let mut best: Option<(usize, Rank)> = None;
        for (index, meta) in U::METAS.iter().enumerate() {
            let rank = rank(meta, keys);
            if best.as_ref().map_or(true, |(_, b)| rank > *b) {
                best = Some((index, rank));
            }
        }

        match best {
            Some((index, (matched, _, _))) if matched > 0 => {
                log::trace!(
                    "variant {} selected {} for keys {:?}",
                    U::TYPE_NAME,
                    U::METAS[index].name(),
                    keys
                );
                self.activate(index)
            }
            _ => {
                log::trace!("variant {} matched none of {:?}", U::TYPE_NAME, keys);
                false
            }
        }
    }
}

impl<U: Alternatives> Element for Variant<U> {
    const KIND: Kind = Kind::Variant;

    fn element_name() -> Cow<'static, str> {
        Cow::Borrowed(U::TYPE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Int32, Text};

    crate::record! {
        struct A {
            a: Int32 => "a",
            b: Int32 => "b",
        }
    }

    crate::record! {
        struct B {
            a: Int32 => "a",
            b: Int32 => "b",
            c: Int32 => "c",
        }
    }

    crate::record! {
        struct Note {
            text: Text => "text",
        }
    }

    crate::alternatives! {
        enum Choice {
            B(B),
            A(A),
            Note(Note),
        }
    }

    #[test]
    fn first_alternative_is_default() {
        let v = Variant::<Choice>::default();
        assert!(v.is::<B>());
        assert_eq!(v.index(), 0);
        assert_eq!(v.kind(), Kind::Variant);
        assert_eq!(v.type_name(), "Variant<B, A, Note>");
        assert!(!v.has_value());
    }

    #[test]
    fn exact_key_set_wins() {
        let mut v = Variant::<Choice>::default();
        assert!(v.find_better(&["a", "b"]));
        assert!(v.is::<A>());

        assert!(v.find_better(&["a", "b", "c"]));
        assert!(v.is::<B>());

        assert!(v.find_better(&["text"]));
        assert!(v.is::<Note>());
    }

    #[test]
    fn subset_prefers_fewest_missing_fields() {
        let mut v = Variant::<Choice>::default();
        assert!(v.find_better(&["c"]));
        assert!(v.is::<B>());
        assert!(v.find_better(&["a"]));
        assert!(v.is::<A>());
    }

    #[test]
    fn unknown_keys_leave_variant_unchanged() {
        let mut v = Variant::<Choice>::new(Note::default());
        assert!(!v.find_better(&["zzz"]));
        assert!(v.is::<Note>());
        assert!(v.find_better(&[]));
        assert!(v.is::<Note>());
    }

    #[test]
    fn reactivating_keeps_content() {
        let mut v = Variant::<Choice>::default();
        v.reset::<A>().a.set_value(3);
        assert!(v.activate(1));
        assert_eq!(v.get::<A>().map(|a| *a.a.value()), Some(3));
        assert!(v.activate(2));
        assert!(v.get::<A>().is_none());
        assert!(!v.activate(9));
    }

    #[test]
    fn copy_and_compare() {
        let mut source = Variant::<Choice>::default();
        source.reset::<Note>().text.set_value("spam".into());

        let mut target = Variant::<Choice>::default();
        assert!(!target.compare(&source));
        target.set(&source);
        assert!(target.compare(&source));
        assert_eq!(target.get::<Note>().map(|n| n.text.as_str()), Some("spam"));

        target.clear();
        assert!(target.is::<B>());
    }

    #[test]
    fn active_field_access() {
        let mut v = Variant::<Choice>::new(A::default());
        let active = v.active_mut();
        assert_eq!(active.meta().name(), "A");
        active.field_mut("b").unwrap().clear();
        assert_eq!(v.alternatives().len(), 3);
        assert!(v.get_mut::<A>().is_some());
    }
}
