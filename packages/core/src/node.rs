//! Records: declaration macro and the field-wise operations it delegates to.
//!
//! A record is a plain struct whose fields are attributes. The [`record!`]
//! macro generates the struct together with its [`Meta`](crate::Meta),
//! [`Default`] (keys and default values attached), and the
//! [`Attribute`]/[`NodeAttribute`] implementations, which forward to the
//! functions in this module.
//!
//! ```rust
//! use structpack_core::{record, Attribute, NodeAttribute, Int32, Text};
//!
//! record! {
//!     pub struct Person {
//!         pub name: Text => "name",
//!         pub age: Int32 => "age" = 18,
//!     }
//! }
//!
//! let mut p = Person::default();
//! assert_eq!(p.meta().keys(), vec!["name", "age"]);
//! assert_eq!(p.age, 18);
//! assert!(!p.has_value());
//! p.name.set_value("Ada".into());
//! assert!(p.has_value());
//! ```

use crate::attribute::{AttrMut, AttrRef, Attribute, NodeAttribute};

/// Whether any field differs from its default.
pub fn has_value(node: &dyn NodeAttribute) -> bool {
    node.fields().iter().any(|f| f.has_value())
}

pub fn clear(node: &mut dyn NodeAttribute) {
    for field in node.fields_mut() {
        field.clear();
    }
}

/// Field-by-field equality, matching fields by key.
pub fn compare(node: &dyn NodeAttribute, other: &dyn Attribute) -> bool {
    let AttrRef::Node(other) = other.view() else {
        return false;
    };
    let fields = node.fields();
    fields.len() == other.fields().len()
        && fields
            .iter()
            .all(|f| other.field(f.key()).is_some_and(|o| f.compare(o)))
}

/// Copy every field of `other` whose key exists in `node`.
pub fn set(node: &mut dyn NodeAttribute, other: &dyn Attribute) {
    let AttrRef::Node(source) = other.view() else {
        return;
    };
    for field in node.fields_mut() {
        if let Some(value) = source.field(field.key()) {
            field.set(value);
        }
    }
}

/// Move every field of `other` whose key exists in `node`.
pub fn take(node: &mut dyn NodeAttribute, other: &mut dyn Attribute) {
    let AttrMut::Node(source) = other.view_mut() else {
        return;
    };
    for field in node.fields_mut() {
        if let Some(value) = source.field_mut(field.key()) {
            field.take(value);
        }
    }
}

/// Declare a record type.
///
/// Each field names its attribute type, its serialized key and optionally
/// a default value. A base record is embedded with `(field: Base)` after
/// the type name, with the same visibility rules as any other field; its
/// fields come first in the key order.
///
/// ```rust
/// use structpack_core::{record, NodeAttribute, Text};
///
/// record! {
///     pub struct Parent {
///         pub name: Text => "name",
///     }
/// }
///
/// record! {
///     pub struct Child (pub base: Parent) {
///         pub work: Text => "work",
///     }
/// }
///
/// let mut child = Child::default();
/// child.base.name.set_value("Arthur".to_string());
/// assert_eq!(child.meta().keys(), vec!["name", "work"]);
/// assert_eq!(child.meta().own_keys(), &["work"]);
/// ```
///
/// Without a visibility the base stays private to the declaring module:
///
/// ```compile_fail
/// mod zoo {
///     use structpack_core::{record, Text};
///
///     record! { pub struct Parent { pub name: Text => "name" } }
///     record! { pub struct Child (base: Parent) { pub work: Text => "work" } }
/// }
///
/// let child = zoo::Child::default();
/// let _ = &child.base;
/// ```
#[macro_export]
macro_rules! record {
    (@init $ty:ty, $key:literal) => {
        $crate::Keyed::keyed(<$ty as ::std::default::Default>::default(), $key)
    };
    (@init $ty:ty, $key:literal, $default:expr) => {
        $crate::Keyed::keyed(<$ty>::with_default($default), $key)
    };
    (@meta $name:ident; $($key:literal),*) => {
        $crate::Meta::new(stringify!($name), &[$($key),*])
    };
    (@meta $name:ident, $base:ty; $($key:literal),*) => {
        $crate::Meta::derived(stringify!($name), <$base as $crate::Record>::META, &[$($key),*])
    };
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident $(($base_vis:vis $base_field:ident : $base:ty))? {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field:ident : $field_ty:ty => $key:literal $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone)]
        $vis struct $name {
            __key: ::std::borrow::Cow<'static, str>,
            $($base_vis $base_field: $base,)?
            $(
                $(#[$field_attr])*
                $field_vis $field: $field_ty,
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self {
                    __key: ::std::borrow::Cow::Borrowed(""),
                    $($base_field: <$base as ::std::default::Default>::default(),)?
                    $(
                        $field: $crate::record!(@init $field_ty, $key $(, $default)?),
                    )*
                }
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($base_field), &self.$base_field))?
                    $(.field($key, &self.$field))*
                    .finish()
            }
        }

        impl ::std::cmp::PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                $crate::node::compare(self, other)
            }
        }

        impl $crate::Keyed for $name {
            fn keyed(mut self, key: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.__key = key.into();
                self
            }
        }

        impl $crate::Record for $name {
            const META: &'static $crate::Meta =
                &$crate::record!(@meta $name $(, $base)?; $($key),*);
        }

        impl $crate::Element for $name {
            const KIND: $crate::Kind = $crate::Kind::Node;

            fn element_name() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(stringify!($name))
            }
        }

        impl $crate::Attribute for $name {
            fn key(&self) -> &str {
                &self.__key
            }

            fn kind(&self) -> $crate::Kind {
                $crate::Kind::Node
            }

            fn type_name(&self) -> String {
                stringify!($name).to_string()
            }

            fn has_value(&self) -> bool {
                $crate::node::has_value(self)
            }

            fn clear(&mut self) {
                $crate::node::clear(self)
            }

            fn compare(&self, other: &dyn $crate::Attribute) -> bool {
                $crate::node::compare(self, other)
            }

            fn set(&mut self, other: &dyn $crate::Attribute) {
                $crate::node::set(self, other)
            }

            fn take(&mut self, other: &mut dyn $crate::Attribute) {
                $crate::node::take(self, other)
            }

            fn view(&self) -> $crate::AttrRef<'_> {
                $crate::AttrRef::Node(self)
            }

            fn view_mut(&mut self) -> $crate::AttrMut<'_> {
                $crate::AttrMut::Node(self)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }

        impl $crate::NodeAttribute for $name {
            fn meta(&self) -> &'static $crate::Meta {
                <Self as $crate::Record>::META
            }

            fn as_attribute(&self) -> &dyn $crate::Attribute {
                self
            }

            fn as_attribute_mut(&mut self) -> &mut dyn $crate::Attribute {
                self
            }

            fn fields(&self) -> Vec<&dyn $crate::Attribute> {
                #[allow(unused_mut)]
                let mut fields: Vec<&dyn $crate::Attribute> = Vec::new();
                $(fields.extend($crate::NodeAttribute::fields(&self.$base_field));)?
                $(fields.push(&self.$field);)*
                fields
            }

            fn fields_mut(&mut self) -> Vec<&mut dyn $crate::Attribute> {
                #[allow(unused_mut)]
                let mut fields: Vec<&mut dyn $crate::Attribute> = Vec::new();
                $(fields.extend($crate::NodeAttribute::fields_mut(&mut self.$base_field));)?
                $(fields.push(&mut self.$field);)*
                fields
            }
        }
    };
}
