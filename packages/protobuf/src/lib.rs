//! Protocol Buffers backend for StructPack
//!
//! Speaks the protobuf binary wire format directly, without descriptors:
//! a record's field numbers are its one-based declaration positions. A
//! record declared in the same field order as a `.proto` message is
//! wire-compatible with it.
//!
//! # Example
//!
//! ```rust
//! use structpack_core::{record, Int32, Options, Text};
//!
//! record! {
//!     // message Person { string name = 1; int32 age = 2; }
//!     pub struct Person {
//!         pub name: Text => "name",
//!         pub age: Int32 => "age",
//!     }
//! }
//!
//! let mut p = Person::default();
//! p.age.set_value(36);
//! let bytes = structpack_protobuf::serialize(&p, Options::empty()).unwrap();
//! assert_eq!(&bytes[..], &[0x10, 0x24]);
//! ```

mod backend;
mod codec;
mod convert;
mod message;
pub mod wire;

pub use backend::ProtobufBackend;
pub use codec::ProtobufCodec;
pub use convert::{deserialize, deserialize_file, serialize, serialize_file};
pub use message::Wire;
pub use wire::WireError;
