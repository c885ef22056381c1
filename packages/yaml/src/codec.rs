//! YAML codec implementation.

use bytes::Bytes;
use structpack_core::{Attribute, Codec, Error, Format, Limits, Options, Result};

use crate::convert::{deserialize_with, serialize_with};

/// A codec that handles YAML encoding/decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec {
    limits: Limits,
}

impl YamlCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl Codec for YamlCodec {
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
        format == &Format::YAML
    }
}
