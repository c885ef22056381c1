//! Mapping between attribute trees and protobuf wire fields.
//!
//! Field numbers are one-based declaration positions, base record fields
//! first, so a record declared in the same order as a `.proto` message
//! reads and writes that message. Scalars map onto the proto3 scalar
//! types of the same name (`int32`, `uint64`, `float`, ...), with enums
//! as `int32` codes. A map is a repeated entry message with the key in
//! field 1 and the value in field 2. A variant is a wrapper message
//! holding the active alternative at its one-based position, like a
//! `oneof` of messages.

use std::borrow::Cow;

use bytes::Bytes;
use structpack_core::{
    failure, Backend, EnumAttribute, FieldRef, Format, Options, Result, Scalar, ValueKind,
};

use crate::message::{parse_message, parse_packed, push_field, Wire};

const MAP_KEY: u32 = 1;
const MAP_VALUE: u32 = 2;

/// [`Backend`] over schema-less protobuf fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufBackend;

/// Every occurrence of a field, in wire order.
fn occurrences(carrier: &Wire) -> &[Wire] {
    match carrier {
        Wire::Repeated(items) => items.as_slice(),
        Wire::Null => &[],
        single => std::slice::from_ref(single),
    }
}

/// Collapse the occurrences of one field number.
fn gather<'c>(mut found: Vec<&'c Wire>) -> Option<Cow<'c, Wire>> {
    match found.len() {
        0 => None,
        1 => found.pop().map(Cow::Borrowed),
        _ => Some(Cow::Owned(Wire::Repeated(
            found.into_iter().cloned().collect(),
        ))),
    }
}

fn message_fields(carrier: &Wire) -> Result<&[(u32, Wire)]> {
    match carrier {
        Wire::Message(fields) => Ok(fields),
        other => Err(failure!("expected message, found {}", other.describe())),
    }
}

impl Backend for ProtobufBackend {
    type Carrier = Wire;

    fn format(&self) -> Format {
        Format::PROTOBUF
    }

    fn tagged_variants(&self) -> bool {
        true
    }

    fn pack_scalar(&self, scalar: Scalar<'_>, _options: Options) -> Result<Wire> {
        Ok(match scalar {
            Scalar::String(s) => Wire::Len(Bytes::from(s.into_owned())),
            Scalar::Bytes(b) => Wire::Len(Bytes::from(b.into_owned())),
            // Negative int32 values are sign-extended, as protoc does.
            Scalar::Int32(v) => Wire::Varint(i64::from(v) as u64),
            Scalar::Int64(v) => Wire::Varint(v as u64),
            Scalar::UInt32(v) => Wire::Varint(u64::from(v)),
            Scalar::UInt64(v) => Wire::Varint(v),
            Scalar::Float(v) => Wire::Fixed32(v.to_bits()),
            Scalar::Double(v) => Wire::Fixed64(v.to_bits()),
            Scalar::Bool(v) => Wire::Varint(u64::from(v)),
        })
    }

    fn pack_enum(&self, value: &dyn EnumAttribute, _options: Options) -> Result<Wire> {
        Ok(Wire::Varint(i64::from(value.as_int()) as u64))
    }

    fn new_object(&self) -> Wire {
        Wire::Message(Vec::new())
    }

    fn insert_field(&self, object: &mut Wire, field: FieldRef<'_>, child: Wire) -> Result<()> {
        match object {
            Wire::Message(fields) => {
                push_field(fields, field.number, child).map_err(|e| failure!("{}", e))
            }
            other => Err(failure!(
                "cannot add field {} to {}",
                field.number,
                other.describe()
            )),
        }
    }

    fn new_map(&self) -> Wire {
        Wire::Repeated(Vec::new())
    }

    fn insert_entry(&self, map: &mut Wire, key: &str, child: Wire) -> Result<()> {
        match map {
            Wire::Repeated(entries) => {
                let mut entry =
                    vec![(MAP_KEY, Wire::Len(Bytes::copy_from_slice(key.as_bytes())))];
                push_field(&mut entry, MAP_VALUE, child).map_err(|e| failure!("{}", e))?;
                entries.push(Wire::Message(entry));
                Ok(())
            }
            other => Err(failure!("cannot add map entry to {}", other.describe())),
        }
    }

    fn new_list(&self) -> Wire {
        Wire::Repeated(Vec::new())
    }

    fn push_element(&self, list: &mut Wire, child: Wire) -> Result<()> {
        match list {
            Wire::Repeated(items) => {
                items.push(child);
                Ok(())
            }
            other => Err(failure!("cannot append to {}", other.describe())),
        }
    }

    fn is_null(&self, carrier: &Wire) -> bool {
        *carrier == Wire::Null
    }

    /// Nested messages arrive as raw bytes. Several occurrences of one
    /// message field are merged, later fields after earlier ones.
    fn open_object<'c>(&self, carrier: &'c Wire) -> Result<Cow<'c, Wire>> {
        match carrier {
            Wire::Message(_) => Ok(Cow::Borrowed(carrier)),
            Wire::Len(data) => {
                let fields = parse_message(data).map_err(|e| failure!("{}", e))?;
                Ok(Cow::Owned(Wire::Message(fields)))
            }
            Wire::Repeated(items) => {
                let mut merged = Vec::new();
                for item in items {
                    let opened = self.open_object(item)?;
                    merged.extend_from_slice(message_fields(&opened)?);
                }
                Ok(Cow::Owned(Wire::Message(merged)))
            }
            Wire::Null => Ok(Cow::Owned(Wire::Message(Vec::new()))),
            other => Err(failure!("expected message, found {}", other.describe())),
        }
    }

    fn field<'c>(&self, object: &'c Wire, field: FieldRef<'_>) -> Result<Option<Cow<'c, Wire>>> {
        let found = message_fields(object)?
            .iter()
            .filter(|(number, _)| *number == field.number)
            .map(|(_, value)| value)
            .collect();
        Ok(gather(found))
    }

    fn object_keys(&self, object: &Wire) -> Result<Vec<String>> {
        let mut numbers: Vec<u32> = message_fields(object)?.iter().map(|(n, _)| *n).collect();
        numbers.dedup();
        Ok(numbers.iter().map(u32::to_string).collect())
    }

    fn entries<'c>(&self, map: &'c Wire) -> Result<Vec<(Cow<'c, str>, Cow<'c, Wire>)>> {
        let mut entries = Vec::new();
        for occurrence in occurrences(map) {
            let entry = self.open_object(occurrence)?;
            let fields = message_fields(&entry)?;

            let key = match fields.iter().rev().find(|(n, _)| *n == MAP_KEY) {
                Some((_, Wire::Len(data))) => String::from_utf8(data.to_vec())
                    .map_err(|_| failure!("map key is not valid UTF-8"))?,
                Some((_, other)) => {
                    return Err(failure!("expected map key text, found {}", other.describe()))
                }
                None => String::new(),
            };
            let values = fields
                .iter()
                .filter(|(n, _)| *n == MAP_VALUE)
                .map(|(_, value)| value)
                .collect();
            let value = gather(values).map_or(Wire::Null, Cow::into_owned);
            entries.push((Cow::Owned(key), Cow::Owned(value)));
        }
        Ok(entries)
    }

    fn elements<'c>(&self, list: &'c Wire, kind: Option<ValueKind>) -> Result<Vec<Cow<'c, Wire>>> {
        let mut items = Vec::new();
        for occurrence in occurrences(list) {
            match (kind, occurrence) {
                (Some(kind), Wire::Len(data)) if kind.is_packable() => {
                    let packed = parse_packed(data, kind).map_err(|e| failure!("{}", e))?;
                    items.extend(packed.into_iter().map(Cow::Owned));
                }
                _ => items.push(Cow::Borrowed(occurrence)),
            }
        }
        Ok(items)
    }

    fn unpack_scalar(&self, carrier: &Wire, kind: ValueKind) -> Result<Scalar<'static>> {
        Ok(match carrier {
            // Last one wins for a singular field seen several times.
            Wire::Repeated(items) => match items.last() {
                Some(last) => return self.unpack_scalar(last, kind),
                None => Scalar::zero(kind),
            },
            Wire::Null => Scalar::zero(kind),
            Wire::Varint(v) => match kind {
                ValueKind::Int32 => Scalar::Int32(*v as i32),
                ValueKind::Int64 => Scalar::Int64(*v as i64),
                ValueKind::UInt32 => Scalar::UInt32(*v as u32),
                ValueKind::UInt64 => Scalar::UInt64(*v),
                ValueKind::Bool => Scalar::Bool(*v != 0),
                _ => Scalar::Int64(*v as i64).coerce(kind),
            },
            Wire::Fixed32(bits) => match kind {
                ValueKind::Float => Scalar::Float(f32::from_bits(*bits)),
                ValueKind::UInt32 => Scalar::UInt32(*bits),
                ValueKind::Int32 => Scalar::Int32(*bits as i32),
                _ => Scalar::Float(f32::from_bits(*bits)).coerce(kind),
            },
            Wire::Fixed64(bits) => match kind {
                ValueKind::Double => Scalar::Double(f64::from_bits(*bits)),
                ValueKind::UInt64 => Scalar::UInt64(*bits),
                ValueKind::Int64 => Scalar::Int64(*bits as i64),
                _ => Scalar::Double(f64::from_bits(*bits)).coerce(kind),
            },
            Wire::Len(data) => match kind {
                ValueKind::Bytes => Scalar::Bytes(Cow::Owned(data.to_vec())),
                ValueKind::String => Scalar::String(Cow::Owned(
                    String::from_utf8(data.to_vec())
                        .map_err(|_| failure!("string field is not valid UTF-8"))?,
                )),
                _ => Scalar::Bytes(Cow::Borrowed(&data[..])).coerce(kind),
            },
            Wire::Message(_) => {
                return Err(failure!("expected {}, found message", kind));
            }
        })
    }

    fn unpack_enum(&self, carrier: &Wire, target: &mut dyn EnumAttribute) -> Result<()> {
        match carrier {
            Wire::Repeated(items) => match items.last() {
                Some(last) => self.unpack_enum(last, target),
                None => Ok(()),
            },
            Wire::Varint(v) => {
                target.set_from_int(*v as i32);
                Ok(())
            }
            Wire::Null => Ok(()),
            other => Err(failure!(
                "expected {} code, found {}",
                target.type_name(),
                other.describe()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_use_proto_encodings() {
        let b = ProtobufBackend;
        let opts = Options::empty();
        assert_eq!(
            b.pack_scalar(Scalar::Int32(-1), opts).unwrap(),
            Wire::Varint(u64::MAX)
        );
        assert_eq!(
            b.unpack_scalar(&Wire::Varint(u64::MAX), ValueKind::Int32).unwrap(),
            Scalar::Int32(-1)
        );
        assert_eq!(
            b.pack_scalar(Scalar::Double(1.0), opts).unwrap(),
            Wire::Fixed64(1.0f64.to_bits())
        );
        assert_eq!(
            b.pack_scalar(Scalar::Bool(true), opts).unwrap(),
            Wire::Varint(1)
        );
    }

    #[test]
    fn last_occurrence_wins_for_scalars() {
        let b = ProtobufBackend;
        let repeated = Wire::Repeated(vec![Wire::Varint(1), Wire::Varint(2)]);
        assert_eq!(
            b.unpack_scalar(&repeated, ValueKind::UInt32).unwrap(),
            Scalar::UInt32(2)
        );
    }

    #[test]
    fn mismatched_wire_types_coerce() {
        let b = ProtobufBackend;
        assert_eq!(
            b.unpack_scalar(&Wire::Varint(7), ValueKind::String).unwrap(),
            Scalar::String(Cow::Owned("7".to_string()))
        );
        assert_eq!(
            b.unpack_scalar(&Wire::Len(Bytes::from_static(b"12")), ValueKind::Int64)
                .unwrap(),
            Scalar::Int64(12)
        );
        assert!(b
            .unpack_scalar(&Wire::Len(Bytes::from_static(b"\xff\xfe")), ValueKind::String)
            .is_err());
        assert!(b
            .unpack_scalar(&Wire::Message(Vec::new()), ValueKind::Bool)
            .is_err());
    }

    #[test]
    fn packed_lists_are_expanded() {
        let b = ProtobufBackend;
        let packed = Wire::Len(Bytes::from_static(&[0x03, 0x8e, 0x02]));
        let items = b.elements(&packed, Some(ValueKind::Int32)).unwrap();
        let values: Vec<Wire> = items.into_iter().map(Cow::into_owned).collect();
        assert_eq!(values, vec![Wire::Varint(3), Wire::Varint(270)]);

        let texts = b.elements(&packed, Some(ValueKind::String)).unwrap();
        assert_eq!(texts.len(), 1);
    }

    #[test]
    fn map_entries_read_key_and_value() {
        let b = ProtobufBackend;
        let mut map = b.new_map();
        b.insert_entry(&mut map, "one", Wire::Varint(1)).unwrap();
        b.insert_entry(&mut map, "two", Wire::Repeated(Vec::new())).unwrap();
        let entries = b.entries(&map).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "one");
        assert_eq!(*entries[0].1, Wire::Varint(1));
        assert_eq!(entries[1].0, "two");
        assert_eq!(*entries[1].1, Wire::Null);
    }

    #[test]
    fn repeated_messages_merge() {
        let b = ProtobufBackend;
        let first = Wire::Message(vec![(1, Wire::Varint(1))]);
        let second = Wire::Message(vec![(2, Wire::Varint(2))]);
        let repeated = Wire::Repeated(vec![first, second]);
        let opened = b.open_object(&repeated).unwrap();
        assert_eq!(
            *opened,
            Wire::Message(vec![(1, Wire::Varint(1)), (2, Wire::Varint(2))])
        );
        assert!(b.open_object(&Wire::Varint(3)).is_err());
    }
}
