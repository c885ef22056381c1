//! StructPack: schema-typed records with pluggable serialization.
//!
//! Records are declared with [`record!`]; their fields are attributes
//! ([`Value`], [`Enum`], [`List`], [`Map`], [`Variant`] or nested records)
//! that know their key, their default and whether they hold a value. One
//! generic visitor walks them for every wire format:
//!
//! - [`json`]: ordered JSON objects
//! - [`yaml`]: block-style YAML
//! - [`protobuf`]: the protobuf binary wire format, fields numbered by
//!   declaration position
//!
//! The functions at the crate root pick the backend by [`Format`].
//!
//! # Example
//!
//! ```rust
//! use structpack::{record, Format, Int32, List, Options, Text};
//!
//! record! {
//!     pub struct Parrot {
//!         pub name: Text => "name",
//!         pub age: Int32 => "age",
//!         pub owners: List<Text> => "owners",
//!     }
//! }
//!
//! let mut polly = Parrot::default();
//! polly.name.set_value("Polly".to_string());
//! polly.owners.append_value("Mr Praline".to_string());
//!
//! let bytes = structpack::serialize(&polly, &Format::JSON, Options::empty()).unwrap();
//! assert_eq!(&bytes[..], br#"{"name":"Polly","owners":["Mr Praline"]}"#);
//!
//! let mut back = Parrot::default();
//! structpack::deserialize(&bytes, &Format::JSON, &mut back).unwrap();
//! assert_eq!(back, polly);
//! ```
//!
//! The visitor itself is [`structpack_core::serialize`] and
//! [`structpack_core::deserialize`], driven by a [`Backend`].

mod codec;
mod dispatch;

pub use structpack_core::*;

pub use codec::MultiCodec;
pub use dispatch::{deserialize, deserialize_file, serialize, serialize_file};

pub use structpack_json as json;
pub use structpack_protobuf as protobuf;
pub use structpack_yaml as yaml;
