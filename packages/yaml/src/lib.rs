//! YAML backend for StructPack
//!
//! Records and maps become block mappings in declaration/insertion order,
//! lists become sequences, enums are written by name and bytes as
//! `!binary` base64 scalars. Variants are untagged, as in JSON.
//!
//! # Example
//!
//! ```rust
//! use structpack_core::{record, Int32, Options, Text};
//!
//! record! {
//!     pub struct Person {
//!         pub name: Text => "name",
//!         pub age: Int32 => "age",
//!     }
//! }
//!
//! let mut p = Person::default();
//! p.name.set_value("Brian".to_string());
//! p.age.set_value(33);
//! let text = structpack_yaml::serialize(&p, Options::empty()).unwrap();
//! assert_eq!(text, "name: Brian\nage: 33\n");
//! ```

mod backend;
mod codec;
mod convert;

pub use backend::YamlBackend;
pub use codec::YamlCodec;
pub use convert::{
    deserialize, deserialize_file, from_value, serialize, serialize_file, to_value,
};
