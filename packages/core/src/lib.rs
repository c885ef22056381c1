//! StructPack core: the reflective attribute model and the visitor engine
//!
//! This layer knows nothing about any wire format. It provides:
//! - `Value`, `Enum`, `List`, `Map`, `Variant`: typed attributes with a
//!   default baseline and presence tracking
//! - `record!`: declares records whose fields are attributes, with static
//!   `Meta` describing their keys
//! - `Backend`, `serialize`, `deserialize`: the generic walk a wire format
//!   plugs into
//! - `Codec`, `Format`, `Options`, `Limits`, `Error`: the shared surface of
//!   every backend crate
//!
//! # Example
//!
//! ```rust
//! use structpack_core::{record, Attribute, Int32, List, Text};
//!
//! record! {
//!     pub struct Person {
//!         pub name: Text => "name",
//!         pub age: Int32 => "age",
//!         pub nicknames: List<Text> => "nicknames",
//!     }
//! }
//!
//! let mut p = Person::default();
//! p.name.set_value("Brian".to_string());
//! p.nicknames.append_value("the naughty boy".to_string());
//! assert!(p.has_value());
//! assert!(!p.age.has_value());
//! ```

pub use bytes::Bytes;

mod attribute;
mod codec;
pub mod convert;
mod enumeration;
mod error;
mod format;
pub mod io;
mod list;
mod map;
mod meta;
#[doc(hidden)]
pub mod node;
mod options;
mod types;
mod value;
mod variant;
mod visitor;

pub use attribute::{
    AttrMut, AttrRef, Attribute, Element, EnumAttribute, Keyed, ListAttribute, MapAttribute,
    NodeAttribute, Record, VariantAttribute,
};
pub use codec::{Codec, NoCodec};
pub use convert::{convert, convert_or, ConvertFrom};
pub use enumeration::{Enum, Enumerated};
pub use error::{Error, Result};
pub use format::Format;
pub use list::{BoolList, DoubleList, Int32List, Int64List, List, TextList};
pub use map::{DoubleMap, Int32Map, Map, TextMap};
pub use meta::Meta;
pub use options::{Limits, Options};
pub use types::{Kind, Scalar, ValueKind};
pub use value::{
    Binary, Bool, Double, Float, Int32, Int64, Numeric, Primitive, Text, UInt32, UInt64, Value,
    ValueMut, ValueRef,
};
pub use variant::{Alternatives, Variant};
pub use visitor::{deserialize, serialize, Backend, FieldRef};
