//! Mapping between attribute trees and `serde_yaml::Value`.

use std::borrow::Cow;

use base64::Engine;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Value as YamlValue};
use structpack_core::{
    failure, Backend, EnumAttribute, FieldRef, Format, Options, Result, Scalar, ValueKind,
};

const BINARY_TAG: &str = "binary";

/// [`Backend`] over YAML values.
///
/// Bytes are written as `!binary` tagged base64 scalars; plain base64
/// strings are accepted on decode too.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlBackend;

fn describe(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "boolean",
        YamlValue::Number(_) => "number",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "sequence",
        YamlValue::Mapping(_) => "mapping",
        YamlValue::Tagged(_) => "tagged value",
    }
}

fn as_mapping(value: &YamlValue) -> Result<&Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| failure!("expected mapping, found {}", describe(value)))
}

/// Mapping keys are usually strings, but plain scalars are accepted.
fn key_text(key: &YamlValue) -> Result<Cow<'_, str>> {
    match key {
        YamlValue::String(s) => Ok(Cow::Borrowed(s.as_str())),
        YamlValue::Number(n) => Ok(Cow::Owned(n.to_string())),
        YamlValue::Bool(b) => Ok(Cow::Owned(b.to_string())),
        other => Err(failure!("unsupported mapping key: {}", describe(other))),
    }
}

fn decode_base64(text: &str) -> Result<Scalar<'static>> {
    // Long binary scalars may be folded over several lines.
    let compact: String = text.split_whitespace().collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| failure!("invalid base64: {}", e))?;
    Ok(Scalar::Bytes(Cow::Owned(bytes)))
}

impl Backend for YamlBackend {
    type Carrier = YamlValue;

    fn format(&self) -> Format {
        Format::YAML
    }

    fn pack_scalar(&self, scalar: Scalar<'_>, _options: Options) -> Result<YamlValue> {
        Ok(match scalar {
            Scalar::String(s) => YamlValue::String(s.into_owned()),
            Scalar::Bytes(b) => YamlValue::Tagged(Box::new(TaggedValue {
                tag: Tag::new(BINARY_TAG),
                value: YamlValue::String(base64::engine::general_purpose::STANDARD.encode(&b)),
            })),
            Scalar::Int32(v) => YamlValue::Number(Number::from(v)),
            Scalar::Int64(v) => YamlValue::Number(Number::from(v)),
            Scalar::UInt32(v) => YamlValue::Number(Number::from(v)),
            Scalar::UInt64(v) => YamlValue::Number(Number::from(v)),
            Scalar::Float(v) => {
                YamlValue::Number(Number::from(v.to_string().parse::<f64>().unwrap_or(f64::NAN)))
            }
            Scalar::Double(v) => YamlValue::Number(Number::from(v)),
            Scalar::Bool(v) => YamlValue::Bool(v),
        })
    }

    fn pack_enum(&self, value: &dyn EnumAttribute, _options: Options) -> Result<YamlValue> {
        Ok(YamlValue::String(value.as_str().to_string()))
    }

    fn new_object(&self) -> YamlValue {
        YamlValue::Mapping(Mapping::new())
    }

    fn insert_field(
        &self,
        object: &mut YamlValue,
        field: FieldRef<'_>,
        child: YamlValue,
    ) -> Result<()> {
        self.insert_entry(object, field.key, child)
    }

    fn insert_entry(&self, map: &mut YamlValue, key: &str, child: YamlValue) -> Result<()> {
        match map {
            YamlValue::Mapping(entries) => {
                entries.insert(YamlValue::String(key.to_string()), child);
                Ok(())
            }
            other => Err(failure!("cannot add key '{}' to {}", key, describe(other))),
        }
    }

    fn new_list(&self) -> YamlValue {
        YamlValue::Sequence(Vec::new())
    }

    fn push_element(&self, list: &mut YamlValue, child: YamlValue) -> Result<()> {
        match list {
            YamlValue::Sequence(items) => {
                items.push(child);
                Ok(())
            }
            other => Err(failure!("cannot append to {}", describe(other))),
        }
    }

    fn is_null(&self, carrier: &YamlValue) -> bool {
        carrier.is_null()
    }

    fn field<'c>(
        &self,
        object: &'c YamlValue,
        field: FieldRef<'_>,
    ) -> Result<Option<Cow<'c, YamlValue>>> {
        Ok(as_mapping(object)?.get(field.key).map(Cow::Borrowed))
    }

    fn object_keys(&self, object: &YamlValue) -> Result<Vec<String>> {
        as_mapping(object)?
            .keys()
            .map(|k| key_text(k).map(Cow::into_owned))
            .collect()
    }

    fn entries<'c>(
        &self,
        map: &'c YamlValue,
    ) -> Result<Vec<(Cow<'c, str>, Cow<'c, YamlValue>)>> {
        as_mapping(map)?
            .iter()
            .map(|(k, v)| Ok((key_text(k)?, Cow::Borrowed(v))))
            .collect()
    }

    fn elements<'c>(
        &self,
        list: &'c YamlValue,
        _kind: Option<ValueKind>,
    ) -> Result<Vec<Cow<'c, YamlValue>>> {
        match list {
            YamlValue::Sequence(items) => Ok(items.iter().map(Cow::Borrowed).collect()),
            other => Err(failure!("expected sequence, found {}", describe(other))),
        }
    }

    fn unpack_scalar(&self, carrier: &YamlValue, kind: ValueKind) -> Result<Scalar<'static>> {
        let scalar = match carrier {
            YamlValue::Tagged(tagged) => return self.unpack_scalar(&tagged.value, kind),
            YamlValue::String(s) if kind == ValueKind::Bytes => return decode_base64(s),
            YamlValue::String(s) => Scalar::String(Cow::Borrowed(s.as_str())),
            YamlValue::Bool(b) => Scalar::Bool(*b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Scalar::UInt64(u)
                } else {
                    Scalar::Double(n.as_f64().unwrap_or_default())
                }
            }
            YamlValue::Null => return Ok(Scalar::zero(kind)),
            other => {
                return Err(failure!("expected {}, found {}", kind, describe(other)));
            }
        };
        Ok(scalar.coerce(kind))
    }

    fn unpack_enum(&self, carrier: &YamlValue, target: &mut dyn EnumAttribute) -> Result<()> {
        match carrier {
            YamlValue::String(name) => target.set_from_str(name),
            YamlValue::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
                Some(code) => target.set_from_int(code),
                None => target.clear(),
            },
            YamlValue::Tagged(tagged) => return self.unpack_enum(&tagged.value, target),
            other => {
                return Err(failure!(
                    "expected {} name, found {}",
                    target.type_name(),
                    describe(other)
                ))
            }
        }
        Ok(())
    }
}
