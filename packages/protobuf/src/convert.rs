//! Entry points between attributes and protobuf bytes.

use std::path::Path;

use bytes::{Bytes, BytesMut};
use structpack_core::{
    io, Attribute, Backend, Error, FieldRef, Format, Kind, Limits, Options, Result,
};

use crate::backend::ProtobufBackend;
use crate::message::{encode_message, parse_message, push_field, Wire};

/// Encode an attribute as a protobuf message.
///
/// Records and variants are the message itself. Any other attribute is
/// written as field 1 of a wrapper message.
pub fn serialize(attr: &dyn Attribute, options: Options) -> Result<Bytes> {
    serialize_with(attr, options, Limits::default())
}

/// Decode a protobuf message into an attribute. Unknown fields are skipped.
pub fn deserialize(bytes: &[u8], attr: &mut dyn Attribute) -> Result<()> {
    deserialize_with(bytes, attr, Limits::default())
}

pub fn serialize_file(path: impl AsRef<Path>, attr: &dyn Attribute, options: Options) -> Result<()> {
    io::write_file(path, serialize(attr, options)?)
}

pub fn deserialize_file(path: impl AsRef<Path>, attr: &mut dyn Attribute) -> Result<()> {
    let bytes = io::read_file(path)?;
    deserialize(&bytes, attr)
}

fn is_message(attr: &dyn Attribute) -> bool {
    matches!(attr.kind(), Kind::Node | Kind::Variant)
}

pub(crate) fn serialize_with(
    attr: &dyn Attribute,
    options: Options,
    limits: Limits,
) -> Result<Bytes> {
    log::debug!("Serializing {} as {}", attr.type_name(), Format::PROTOBUF);
    let carrier = structpack_core::serialize(&ProtobufBackend, attr, options, limits)
        .map_err(|e| e.into_encode(&Format::PROTOBUF))?;

    let fields = match carrier {
        Wire::Message(fields) if is_message(attr) => fields,
        other => {
            let mut fields = Vec::new();
            push_field(&mut fields, 1, other).map_err(|e| Error::encode(Format::PROTOBUF, e))?;
            fields
        }
    };

    let mut buf = BytesMut::new();
    encode_message(&fields, &mut buf).map_err(|e| Error::encode(Format::PROTOBUF, e))?;
    Ok(buf.freeze())
}

pub(crate) fn deserialize_with(
    bytes: &[u8],
    attr: &mut dyn Attribute,
    limits: Limits,
) -> Result<()> {
    log::debug!(
        "Deserializing {} from {} ({} bytes)",
        attr.type_name(),
        Format::PROTOBUF,
        bytes.len()
    );
    let data = Bytes::copy_from_slice(bytes);
    let fields = parse_message(&data).map_err(|e| Error::decode(Format::PROTOBUF, e))?;
    let message = Wire::Message(fields);

    let backend = ProtobufBackend;
    let result = if is_message(attr) {
        structpack_core::deserialize(&backend, &message, attr, limits)
    } else {
        match backend.field(&message, FieldRef::new("", 0)) {
            Ok(Some(root)) => structpack_core::deserialize(&backend, &root, attr, limits),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        }
    };
    result.map_err(|e| e.into_decode(&Format::PROTOBUF))
}

#[cfg(test)]
mod tests {
    use super::*;
    use structpack_core::{
        alternatives, enumeration, record, Binary, Bool, Double, Enum, Float, Int32, Int32List,
        Int64, List, Map, Text, TextList, UInt32, UInt64, Variant,
    };

    enumeration! {
        enum Species {
            Unknown = 0,
            Parrot = 3,
        }
    }

    record! {
        struct Person {
            name: Text => "name",
            age: Int32 => "age",
        }
    }

    record! {
        struct Scalars {
            text: Text => "text",
            blob: Binary => "blob",
            i32_val: Int32 => "i32",
            i64_val: Int64 => "i64",
            u32_val: UInt32 => "u32",
            u64_val: UInt64 => "u64",
            f32_val: Float => "f32",
            f64_val: Double => "f64",
            flag: Bool => "flag",
            kind: Enum<Species> => "kind",
        }
    }

    record! {
        struct Collections {
            numbers: Int32List => "numbers",
            names: TextList => "names",
            people: List<Person> => "people",
            ages: Map<Int32> => "ages",
            teams: Map<List<Person>> => "teams",
        }
    }

    record! {
        struct Circle {
            radius: Double => "radius",
        }
    }

    record! {
        struct Label {
            text: Text => "text",
        }
    }

    alternatives! {
        enum Shape {
            Circle(Circle),
            Label(Label),
        }
    }

    record! {
        struct Drawing {
            title: Text => "title",
            shape: Variant<Shape> => "shape",
        }
    }

    record! {
        struct Grid {
            rows: List<Int32List> => "rows",
        }
    }

    #[test]
    fn matches_protoc_layout() {
        let mut p = Person::default();
        p.name.set_value("Ada".to_string());
        p.age.set_value(36);
        let bytes = serialize(&p, Options::empty()).unwrap();
        assert_eq!(&bytes[..], &[0x0a, 0x03, b'A', b'd', b'a', 0x10, 0x24]);

        let mut back = Person::default();
        deserialize(&bytes, &mut back).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn scalar_round_trip() {
        let mut s = Scalars::default();
        s.text.set_value("dead parrot".to_string());
        s.blob.set_text("dead parrot");
        s.i32_val.set_value(-42);
        s.i64_val.set_value(i64::MIN);
        s.u32_val.set_value(u32::MAX);
        s.u64_val.set_value(u64::MAX);
        s.f32_val.set_value(1.25);
        s.f64_val.set_value(-0.5);
        s.flag.set_value(true);
        s.kind.set_value(Species::Parrot);

        let bytes = serialize(&s, Options::empty()).unwrap();
        let mut back = Scalars::default();
        deserialize(&bytes, &mut back).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.blob.as_text(), "dead parrot");
        assert_eq!(back.blob.as_bytes()[0], b'd');
    }

    #[test]
    fn collections_round_trip() {
        let mut c = Collections::default();
        c.numbers.append_value(1);
        c.numbers.append_value(-2);
        c.names.append_value("Michael".to_string());
        c.people.append_new().name.set_value("Graham".to_string());
        c.people.append_new().age.set_value(80);
        c.ages.append_value("eric", 81);
        c.ages.append_value("john", 84);
        c.teams.append_new("pythons").append_new().name.set_value("Terry".to_string());
        c.teams.append_new("empty");

        let bytes = serialize(&c, Options::empty()).unwrap();
        let mut back = Collections::default();
        deserialize(&bytes, &mut back).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.ages.keys(), vec!["eric", "john"]);
    }

    #[test]
    fn packed_repeated_fields_are_accepted() {
        // field 1, wire type 2, three packed varints
        let bytes = [0x0a, 0x03, 0x01, 0x02, 0x03];
        let mut c = Collections::default();
        deserialize(&bytes, &mut c).unwrap();
        assert_eq!(c.numbers.values(), vec![1, 2, 3]);
    }

    #[test]
    fn variants_are_wrapped_by_position() {
        let mut d = Drawing::default();
        d.title.set_value("sketch".to_string());
        d.shape.reset::<Label>().text.set_value("x".to_string());

        let bytes = serialize(&d, Options::empty()).unwrap();
        // shape is field 2, Label is alternative 2, text is field 1
        assert_eq!(
            &bytes[..],
            &[0x0a, 0x06, b's', b'k', b'e', b't', b'c', b'h', 0x12, 0x05, 0x12, 0x03, 0x0a, 0x01, b'x']
        );

        let mut back = Drawing::default();
        deserialize(&bytes, &mut back).unwrap();
        assert!(back.shape.is::<Label>());
        assert_eq!(back, d);
    }

    #[test]
    fn non_records_are_wrapped_as_field_one() {
        let mut list = TextList::new();
        list.append_value("a".to_string());
        list.append_value("b".to_string());
        let bytes = serialize(&list, Options::empty()).unwrap();
        assert_eq!(&bytes[..], &[0x0a, 0x01, b'a', 0x0a, 0x01, b'b']);

        let mut back = TextList::new();
        deserialize(&bytes, &mut back).unwrap();
        assert_eq!(back, list);

        let bytes = serialize(&Int32::new(5), Options::empty()).unwrap();
        let mut value = Int32::default();
        deserialize(&bytes, &mut value).unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn unknown_fields_are_skipped() {
        // field 9 varint, then field 1 "Ada"
        let bytes = [0x48, 0x01, 0x0a, 0x03, b'A', b'd', b'a'];
        let mut p = Person::default();
        deserialize(&bytes, &mut p).unwrap();
        assert_eq!(p.name, "Ada");
    }

    #[test]
    fn nested_lists_cannot_be_encoded() {
        let mut g = Grid::default();
        g.rows.append_new().append_value(1);
        let err = serialize(&g, Options::empty()).unwrap_err();
        assert!(matches!(err, Error::Encode { ref format, .. } if *format == Format::PROTOBUF));
    }

    #[test]
    fn truncated_input_is_decode_error() {
        let mut p = Person::default();
        let err = deserialize(&[0x0a, 0x05, b'A'], &mut p).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));

        // a nested message that is itself malformed
        let mut c = Collections::default();
        let err = deserialize(&[0x1a, 0x02, 0x0a, 0x05], &mut c).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
