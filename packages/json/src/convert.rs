//! Entry points between attributes, JSON values and JSON text.

use std::path::Path;

use serde::Serialize;
use serde_json::Value as JsonValue;
use structpack_core::{io, Attribute, Error, Format, Limits, Options, Result};

use crate::backend::JsonBackend;

/// Convert an attribute to a JSON value.
pub fn to_value(attr: &dyn Attribute, options: Options) -> Result<JsonValue> {
    to_value_with(attr, options, Limits::default())
}

/// Fill an attribute from a JSON value.
pub fn from_value(json: &JsonValue, attr: &mut dyn Attribute) -> Result<()> {
    from_value_with(json, attr, Limits::default())
}

/// Serialize an attribute to JSON text.
///
/// [`Options::PRETTY_PRINT`] indents with four spaces.
pub fn serialize(attr: &dyn Attribute, options: Options) -> Result<String> {
    serialize_with(attr, options, Limits::default())
}

/// Parse JSON text into an attribute.
pub fn deserialize(text: &str, attr: &mut dyn Attribute) -> Result<()> {
    deserialize_with(text.as_bytes(), attr, Limits::default())
}

pub fn serialize_file(path: impl AsRef<Path>, attr: &dyn Attribute, options: Options) -> Result<()> {
    io::write_file(path, serialize(attr, options)?)
}

pub fn deserialize_file(path: impl AsRef<Path>, attr: &mut dyn Attribute) -> Result<()> {
    let text = io::read_text(path)?;
    deserialize(&text, attr)
}

pub(crate) fn to_value_with(
    attr: &dyn Attribute,
    options: Options,
    limits: Limits,
) -> Result<JsonValue> {
    structpack_core::serialize(&JsonBackend, attr, options, limits)
        .map_err(|e| e.into_encode(&Format::JSON))
}

pub(crate) fn from_value_with(
    json: &JsonValue,
    attr: &mut dyn Attribute,
    limits: Limits,
) -> Result<()> {
    structpack_core::deserialize(&JsonBackend, json, attr, limits)
        .map_err(|e| e.into_decode(&Format::JSON))
}

pub(crate) fn serialize_with(
    attr: &dyn Attribute,
    options: Options,
    limits: Limits,
) -> Result<String> {
    log::debug!("Serializing {} as {}", attr.type_name(), Format::JSON);
    let json = to_value_with(attr, options, limits)?;
    let text = if options.contains(Options::PRETTY_PRINT) {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        json.serialize(&mut ser)
            .map_err(|e| Error::encode(Format::JSON, e))?;
        String::from_utf8(out).map_err(|e| Error::encode(Format::JSON, e))?
    } else {
        serde_json::to_string(&json).map_err(|e| Error::encode(Format::JSON, e))?
    };
    Ok(text)
}

pub(crate) fn deserialize_with(
    bytes: &[u8],
    attr: &mut dyn Attribute,
    limits: Limits,
) -> Result<()> {
    log::debug!(
        "Deserializing {} from {} ({} bytes)",
        attr.type_name(),
        Format::JSON,
        bytes.len()
    );
    let json: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| Error::decode(Format::JSON, e))?;
    from_value_with(&json, attr, limits)
}
