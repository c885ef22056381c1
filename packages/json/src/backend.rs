//! Mapping between attribute trees and `serde_json::Value`.

use std::borrow::Cow;

use base64::Engine;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use structpack_core::{
    failure, Backend, EnumAttribute, FieldRef, Format, Options, Result, Scalar, ValueKind,
};

/// [`Backend`] over ordered JSON values.
///
/// Bytes travel as standard base64 strings. Non-finite floats have no JSON
/// form and are written as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

fn describe(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn float(value: f64) -> JsonValue {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn as_object(value: &JsonValue) -> Result<&JsonMap<String, JsonValue>> {
    value
        .as_object()
        .ok_or_else(|| failure!("expected object, found {}", describe(value)))
}

impl Backend for JsonBackend {
    type Carrier = JsonValue;

    fn format(&self) -> Format {
        Format::JSON
    }

    fn pack_scalar(&self, scalar: Scalar<'_>, _options: Options) -> Result<JsonValue> {
        Ok(match scalar {
            Scalar::String(s) => JsonValue::String(s.into_owned()),
            Scalar::Bytes(b) => {
                JsonValue::String(base64::engine::general_purpose::STANDARD.encode(&b))
            }
            Scalar::Int32(v) => JsonValue::from(v),
            Scalar::Int64(v) => JsonValue::from(v),
            Scalar::UInt32(v) => JsonValue::from(v),
            Scalar::UInt64(v) => JsonValue::from(v),
            // Through text so 0.1f32 is written as 0.1, not 0.10000000149011612.
            Scalar::Float(v) => float(v.to_string().parse().unwrap_or(f64::NAN)),
            Scalar::Double(v) => float(v),
            Scalar::Bool(v) => JsonValue::Bool(v),
        })
    }

    fn pack_enum(&self, value: &dyn EnumAttribute, _options: Options) -> Result<JsonValue> {
        Ok(JsonValue::String(value.as_str().to_string()))
    }

    fn new_object(&self) -> JsonValue {
        JsonValue::Object(JsonMap::new())
    }

    fn insert_field(
        &self,
        object: &mut JsonValue,
        field: FieldRef<'_>,
        child: JsonValue,
    ) -> Result<()> {
        self.insert_entry(object, field.key, child)
    }

    fn insert_entry(&self, map: &mut JsonValue, key: &str, child: JsonValue) -> Result<()> {
        match map {
            JsonValue::Object(entries) => {
                entries.insert(key.to_string(), child);
                Ok(())
            }
            other => Err(failure!("cannot add key '{}' to {}", key, describe(other))),
        }
    }

    fn new_list(&self) -> JsonValue {
        JsonValue::Array(Vec::new())
    }

    fn push_element(&self, list: &mut JsonValue, child: JsonValue) -> Result<()> {
        match list {
            JsonValue::Array(items) => {
                items.push(child);
                Ok(())
            }
            other => Err(failure!("cannot append to {}", describe(other))),
        }
    }

    fn is_null(&self, carrier: &JsonValue) -> bool {
        carrier.is_null()
    }

    fn field<'c>(
        &self,
        object: &'c JsonValue,
        field: FieldRef<'_>,
    ) -> Result<Option<Cow<'c, JsonValue>>> {
        Ok(as_object(object)?.get(field.key).map(Cow::Borrowed))
    }

    fn object_keys(&self, object: &JsonValue) -> Result<Vec<String>> {
        Ok(as_object(object)?.keys().cloned().collect())
    }

    fn entries<'c>(
        &self,
        map: &'c JsonValue,
    ) -> Result<Vec<(Cow<'c, str>, Cow<'c, JsonValue>)>> {
        Ok(as_object(map)?
            .iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), Cow::Borrowed(v)))
            .collect())
    }

    fn elements<'c>(
        &self,
        list: &'c JsonValue,
        _kind: Option<ValueKind>,
    ) -> Result<Vec<Cow<'c, JsonValue>>> {
        match list {
            JsonValue::Array(items) => Ok(items.iter().map(Cow::Borrowed).collect()),
            other => Err(failure!("expected array, found {}", describe(other))),
        }
    }

    fn unpack_scalar(&self, carrier: &JsonValue, kind: ValueKind) -> Result<Scalar<'static>> {
        let scalar = match carrier {
            JsonValue::String(s) if kind == ValueKind::Bytes => {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(s)
                    .map_err(|e| failure!("invalid base64: {}", e))?;
                return Ok(Scalar::Bytes(Cow::Owned(bytes)));
            }
            JsonValue::String(s) => Scalar::String(Cow::Borrowed(s.as_str())),
            JsonValue::Bool(b) => Scalar::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Scalar::UInt64(u)
                } else {
                    Scalar::Double(n.as_f64().unwrap_or_default())
                }
            }
            JsonValue::Null => return Ok(Scalar::zero(kind)),
            other => {
                return Err(failure!("expected {}, found {}", kind, describe(other)));
            }
        };
        Ok(scalar.coerce(kind))
    }

    fn unpack_enum(&self, carrier: &JsonValue, target: &mut dyn EnumAttribute) -> Result<()> {
        match carrier {
            JsonValue::String(name) => target.set_from_str(name),
            JsonValue::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
                Some(code) => target.set_from_int(code),
                None => target.clear(),
            },
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
