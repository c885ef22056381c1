//! Routing between the backend codecs.

use bytes::Bytes;
use structpack_core::{Attribute, Codec, Error, Format, Limits, Options, Result};
use structpack_json::JsonCodec;
use structpack_protobuf::ProtobufCodec;
use structpack_yaml::YamlCodec;

/// A codec that combines multiple codecs.
///
/// Routes encode/decode to the first codec that supports the format.
pub struct MultiCodec {
    codecs: Vec<Box<dyn Codec>>,
}

impl MultiCodec {
    /// Create an empty multi-codec.
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Add a codec.
    pub fn add(&mut self, codec: impl Codec + 'static) {
        self.codecs.push(Box::new(codec));
    }

    /// Create a multi-codec with the JSON, YAML and protobuf codecs.
    pub fn with_all() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Like [`MultiCodec::with_all`], with every codec bounded by `limits`.
    pub fn with_limits(limits: Limits) -> Self {
        let mut mc = Self::new();
        mc.add(JsonCodec::new().with_limits(limits));
        mc.add(YamlCodec::new().with_limits(limits));
        mc.add(ProtobufCodec::new().with_limits(limits));
        mc
    }

    fn route(&self, format: &Format) -> Result<&dyn Codec> {
        self.codecs
            .iter()
            .find(|c| c.supports(format))
            .map(|c| &**c)
            .ok_or_else(|| {
                log::debug!("No codec registered for {}", format);
                Error::UnsupportedFormat(format.clone())
            })
    }
}

impl Default for MultiCodec {
    fn default() -> Self {
        Self::with_all()
    }
}

impl Codec for MultiCodec {
    fn encode(&self, attr: &dyn Attribute, format: &Format, options: Options) -> Result<Bytes> {
        self.route(format)?.encode(attr, format, options)
    }

    fn decode(&self, bytes: &[u8], format: &Format, attr: &mut dyn Attribute) -> Result<()> {
        self.route(format)?.decode(bytes, format, attr)
    }

    fn supports(&self, format: &Format) -> bool {
        self.codecs.iter().any(|c| c.supports(format))
    }
}
