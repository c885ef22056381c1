//! Entry points between attributes, YAML values and YAML text.

use std::path::Path;

use serde_yaml::Value as YamlValue;
use structpack_core::{io, Attribute, Error, Format, Limits, Options, Result};

use crate::backend::YamlBackend;

/// Convert an attribute to a YAML value.
pub fn to_value(attr: &dyn Attribute, options: Options) -> Result<YamlValue> {
    to_value_with(attr, options, Limits::default())
}

/// Fill an attribute from a YAML value.
pub fn from_value(yaml: &YamlValue, attr: &mut dyn Attribute) -> Result<()> {
    from_value_with(yaml, attr, Limits::default())
}

/// Serialize an attribute to YAML text. Output is always block style, so
/// [`Options::PRETTY_PRINT`] changes nothing.
pub fn serialize(attr: &dyn Attribute, options: Options) -> Result<String> {
    serialize_with(attr, options, Limits::default())
}

/// Parse YAML text into an attribute. An empty document leaves it unchanged.
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
) -> Result<YamlValue> {
    structpack_core::serialize(&YamlBackend, attr, options, limits)
        .map_err(|e| e.into_encode(&Format::YAML))
}

pub(crate) fn from_value_with(
    yaml: &YamlValue,
    attr: &mut dyn Attribute,
    limits: Limits,
) -> Result<()> {
    structpack_core::deserialize(&YamlBackend, yaml, attr, limits)
        .map_err(|e| e.into_decode(&Format::YAML))
}

pub(crate) fn serialize_with(
    attr: &dyn Attribute,
    options: Options,
    limits: Limits,
) -> Result<String> {
    log::debug!("Serializing {} as {}", attr.type_name(), Format::YAML);
    let yaml = to_value_with(attr, options, limits)?;
    serde_yaml::to_string(&yaml).map_err(|e| Error::encode(Format::YAML, e))
}

pub(crate) fn deserialize_with(
    bytes: &[u8],
    attr: &mut dyn Attribute,
    limits: Limits,
) -> Result<()> {
    log::debug!(
        "Deserializing {} from {} ({} bytes)",
        attr.type_name(),
        Format::YAML,
        bytes.len()
    );
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    let yaml: YamlValue =
        serde_yaml::from_slice(bytes).map_err(|e| Error::decode(Format::YAML, e))?;
    from_value_with(&yaml, attr, limits)
}
