//! JSON codec implementation.

use bytes::Bytes;
use structpack_core::{Attribute, Codec, Error, Format, Limits, Options, Result};

use crate::convert::{deserialize_with, serialize_with};

/// A codec that handles JSON encoding/decoding.
///
/// # Example
///
/// ```rust
/// use structpack_core::{record, Codec, Format, Options, Text};
/// use structpack_json::JsonCodec;
///
/// record! {
///     pub struct Greeting {
///         pub text: Text => "text",
///     }
/// }
///
/// let mut hello = Greeting::default();
/// hello.text.set_value("hello".to_string());
///
/// let codec = JsonCodec::new();
/// let bytes = codec.encode(&hello, &Format::JSON, Options::empty()).unwrap();
/// assert_eq!(&bytes[..], br#"{"text":"hello"}"#);
///
/// let mut decoded = Greeting::default();
/// codec.decode(&bytes, &Format::JSON, &mut decoded).unwrap();
/// assert_eq!(decoded, hello);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    limits: Limits,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl Codec for JsonCodec {
    fn encode(&self, attr: &dyn Attribute, format: &Format, options: Options) -> Result<Bytes> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }
        Ok(Bytes::from(serialize_with(attr, options, self.limits)?))
    }

    fn decode(&self, bytes: &[u8], format: &Format, attr: &mut dyn Attribute) -> Result<()> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }
        deserialize_with(bytes, attr, self.limits)
    }

    fn supports(&self, format: &Format) -> bool {
        format == &Format::JSON
    }
}
