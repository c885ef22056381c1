//! The reflective attribute interface shared by every schema element.
//!
//! An [`Attribute`] is a named, typed value that knows whether it holds
//! something other than its default, can be reset, compared and copied
//! from another attribute, and exposes a kind-specific view through
//! [`Attribute::view`]. The visitor engine only ever talks to attributes
//! through these views, so adding a backend never touches the model.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use crate::meta::Meta;
use crate::types::{Kind, ValueKind};
use crate::value::{ValueMut, ValueRef};

/// A named, typed schema element.
///
/// `set`, `take` and `compare` against an attribute of a different concrete
/// type are not errors: `set`/`take` leave `self` unchanged and `compare`
/// returns `false`.
pub trait Attribute: Any + fmt::Debug {
    /// Field name inside the owning record, empty for roots and elements.
    fn key(&self) -> &str;

    fn kind(&self) -> Kind {
        self.view().kind()
    }

    /// Human-readable type description, e.g. `Value<Int32>` or `List<Person>`.
    fn type_name(&self) -> String;

    /// Whether the content differs from the default baseline.
    fn has_value(&self) -> bool;

    /// Reset content to the default baseline. The key is kept.
    fn clear(&mut self);

    /// Deep content equality. Keys and defaults are not compared.
    fn compare(&self, other: &dyn Attribute) -> bool;

    /// Copy content from `other`. The key and default baseline are kept.
    fn set(&mut self, other: &dyn Attribute);

    /// Move content out of `other`, leaving it at its default baseline.
    fn take(&mut self, other: &mut dyn Attribute);

    fn view(&self) -> AttrRef<'_>;

    fn view_mut(&mut self) -> AttrMut<'_>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Kind-specific read access to an attribute.
pub enum AttrRef<'a> {
    Node(&'a dyn NodeAttribute),
    Value(ValueRef<'a>),
    Enum(&'a dyn EnumAttribute),
    List(&'a dyn ListAttribute),
    Map(&'a dyn MapAttribute),
    Variant(&'a dyn VariantAttribute),
}

impl AttrRef<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            AttrRef::Node(_) => Kind::Node,
            AttrRef::Value(_) => Kind::Value,
            AttrRef::Enum(_) => Kind::Enum,
            AttrRef::List(_) => Kind::List,
            AttrRef::Map(_) => Kind::Map,
            AttrRef::Variant(_) => Kind::Variant,
        }
    }
}

/// Kind-specific write access to an attribute.
pub enum AttrMut<'a> {
    Node(&'a mut dyn NodeAttribute),
    Value(ValueMut<'a>),
    Enum(&'a mut dyn EnumAttribute),
    List(&'a mut dyn ListAttribute),
    Map(&'a mut dyn MapAttribute),
    Variant(&'a mut dyn VariantAttribute),
}

impl AttrMut<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            AttrMut::Node(_) => Kind::Node,
            AttrMut::Value(_) => Kind::Value,
            AttrMut::Enum(_) => Kind::Enum,
            AttrMut::List(_) => Kind::List,
            AttrMut::Map(_) => Kind::Map,
            AttrMut::Variant(_) => Kind::Variant,
        }
    }
}

/// A record: an ordered, fixed set of named fields.
pub trait NodeAttribute: Attribute {
    fn meta(&self) -> &'static Meta;

    fn as_attribute(&self) -> &dyn Attribute;

    fn as_attribute_mut(&mut self) -> &mut dyn Attribute;

    /// Fields in declaration order, base record fields first.
    fn fields(&self) -> Vec<&dyn Attribute>;

    fn fields_mut(&mut self) -> Vec<&mut dyn Attribute>;

    fn field(&self, key: &str) -> Option<&dyn Attribute> {
        self.fields().into_iter().find(|f| f.key() == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut dyn Attribute> {
        self.fields_mut().into_iter().find(|f| f.key() == key)
    }
}

/// A closed enumeration with text and integer forms.
pub trait EnumAttribute: Attribute {
    /// Declared name of the current enumerator.
    fn as_str(&self) -> &'static str;

    /// Set from a declared name. Unknown names reset to the default.
    fn set_from_str(&mut self, name: &str);

    fn as_int(&self) -> i32;

    /// Set from a declared code. Unknown codes reset to the default.
    fn set_from_int(&mut self, code: i32);

    /// Every declared `(name, code)` pair in declaration order.
    fn values(&self) -> Vec<(&'static str, i32)>;
}

/// An ordered sequence of same-typed elements.
pub trait ListAttribute: Attribute {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn item(&self, index: usize) -> Option<&dyn Attribute>;

    /// Append a default element and return it for filling in.
    fn create(&mut self) -> &mut dyn Attribute;

    fn element_kind(&self) -> Kind;

    /// Scalar kind the elements travel as, if they are leaves.
    fn value_kind(&self) -> Option<ValueKind>;

    fn is_value_list(&self) -> bool {
        self.element_kind().is_leaf()
    }
}

/// An insertion-ordered string-keyed collection.
pub trait MapAttribute: Attribute {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_at(&self, index: usize) -> Option<(&str, &dyn Attribute)>;

    fn entry(&self, key: &str) -> Option<&dyn Attribute>;

    /// A default element stored under `key`. An existing entry is reset in
    /// place, keeping its position.
    fn create(&mut self, key: &str) -> &mut dyn Attribute;

    fn element_kind(&self) -> Kind;

    fn value_kind(&self) -> Option<ValueKind>;
}

/// A tagged union of records, exactly one of which is active.
pub trait VariantAttribute: Attribute {
    /// Position of the active alternative.
    fn index(&self) -> usize;

    fn alternatives(&self) -> &'static [&'static Meta];

    fn active(&self) -> &dyn NodeAttribute;

    fn active_mut(&mut self) -> &mut dyn NodeAttribute;

    /// Switch to a default instance of the alternative at `index`.
    /// Activating the already-active alternative keeps its content.
    fn activate(&mut self, index: usize) -> bool;

    /// Activate the alternative that best explains the observed keys.
    /// Returns `false` and leaves the variant unchanged when none does.
    fn find_better(&mut self, keys: &[&str]) -> bool;
}

/// Builder for attaching a field key at declaration time.
pub trait Keyed: Sized {
    fn keyed(self, key: impl Into<Cow<'static, str>>) -> Self;
}

/// Attributes that can be stored in a [`List`](crate::List) or
/// [`Map`](crate::Map).
pub trait Element: Attribute + Default + Clone + PartialEq {
    const KIND: Kind;

    /// Scalar kind the element travels as, if it is a leaf.
    const VALUE_KIND: Option<ValueKind> = None;

    /// Type label used inside container type names.
    fn element_name() -> Cow<'static, str>;
}

/// A concrete record type with static metadata.
pub trait Record: NodeAttribute + Element {
    const META: &'static Meta;
}
