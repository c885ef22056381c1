//! Protobuf codec implementation.

use bytes::Bytes;
use structpack_core::{Attribute, Codec, Error, Format, Limits, Options, Result};

use crate::convert::{deserialize_with, serialize_with};

/// A codec that handles protobuf encoding/decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec {
    limits: Limits,
}

impl ProtobufCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl Codec for ProtobufCodec {
    fn encode(&self, attr: &dyn Attribute, format: &Format, options: Options) -> Result<Bytes> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }
        serialize_with(attr, options, self.limits)
    }

    fn decode(&self, bytes: &[u8], format: &Format, attr: &mut dyn Attribute) -> Result<()> {
        if !self.supports(format) {
            return Err(Error::UnsupportedFormat(format.clone()));
        }
        deserialize_with(bytes, attr, self.limits)
    }

    fn supports(&self, format: &Format) -> bool {
        format == &Format::PROTOBUF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structpack_core::{List, Text};

    structpack_core::record! {
        struct Chain {
            label: Text => "label",
            next: List<Chain> => "next",
        }
    }

    #[test]
    fn encode_respects_depth_limit() {
        let mut chain = Chain::default();
        let mut cursor = &mut chain;
        for _ in 0..6 {
            cursor = cursor.next.append_new();
            cursor.label.set_value("link".to_string());
        }

        let codec = ProtobufCodec::new().with_limits(Limits::new(4));
        let err = codec
            .encode(&chain, &Format::PROTOBUF, Options::empty())
            .unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: 4 }));

        let bytes = ProtobufCodec::new()
            .encode(&chain, &Format::PROTOBUF, Options::empty())
            .unwrap();
        let mut back = Chain::default();
        ProtobufCodec::new()
            .decode(&bytes, &Format::PROTOBUF, &mut back)
            .unwrap();
        assert_eq!(back, chain);
    }

    #[test]
    fn rejects_text_formats() {
        assert!(!ProtobufCodec::new().supports(&Format::JSON));
        let err = ProtobufCodec::new()
            .encode(&Text::default(), &Format::YAML, Options::empty())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
