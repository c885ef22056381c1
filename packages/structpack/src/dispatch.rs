//! Format-dispatched entry points.

use std::path::Path;

use bytes::Bytes;
use structpack_core::{Attribute, Codec, Format, Options, Result};

use crate::codec::MultiCodec;

/// Encode `attr` in any supported format.
pub fn serialize(attr: &dyn Attribute, format: &Format, options: Options) -> Result<Bytes> {
    MultiCodec::default().encode(attr, format, options)
}

/// Decode `bytes` in `format` into `attr`.
pub fn deserialize(bytes: &[u8], format: &Format, attr: &mut dyn Attribute) -> Result<()> {
    MultiCodec::default().decode(bytes, format, attr)
}

pub fn serialize_file(
    path: impl AsRef<Path>,
    attr: &dyn Attribute,
    format: &Format,
    options: Options,
) -> Result<()> {
    MultiCodec::default().encode_file(attr, format, options, path.as_ref())
}

pub fn deserialize_file(
    path: impl AsRef<Path>,
    format: &Format,
    attr: &mut dyn Attribute,
) -> Result<()> {
    MultiCodec::default().decode_file(path.as_ref(), format, attr)
}
