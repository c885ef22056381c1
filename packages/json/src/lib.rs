//! JSON backend for StructPack
//!
//! Maps attribute trees onto ordered `serde_json` values:
//! - records and maps become objects, keys in declaration/insertion order
//! - lists become arrays
//! - enums are written by name and read from a name or a code
//! - bytes are base64 strings
//!
//! Variants are written untagged; on decode the alternative is picked from
//! the keys present in the object.
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
//! let text = structpack_json::serialize(&p, Options::empty()).unwrap();
//! assert_eq!(text, r#"{"name":"Brian"}"#);
//!
//! let mut back = Person::default();
//! structpack_json::deserialize(&text, &mut back).unwrap();
//! assert_eq!(back, p);
//! ```

mod backend;
mod codec;
mod convert;

pub use backend::JsonBackend;
pub use codec::JsonCodec;
pub use convert::{
    deserialize, deserialize_file, from_value, serialize, serialize_file, to_value,
};
