//! Schema-less protobuf messages.
//!
//! Without a descriptor the wire only tells us how a payload is framed,
//! not what it means. [`Wire`] keeps payloads in that raw form and the
//! backend interprets them once it knows the target attribute's kind.

use bytes::{Buf, Bytes, BytesMut};
use structpack_core::ValueKind;

use crate::wire::{
    decode_key, decode_varint, encode_key, encode_varint, get_fixed32, get_fixed64, WireError,
    WireType,
};

/// One field payload, or a message under construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Wire {
    /// Placeholder for "nothing here"; never written.
    Null,
    Varint(u64),
    Fixed32(u32),
    Fixed64(u64),
    /// Length-delimited payload: text, bytes, a packed run or an
    /// unparsed nested message.
    Len(Bytes),
    /// Fields in write order. Repeated fields appear once per element.
    Message(Vec<(u32, Wire)>),
    /// Elements of a repeated field, expanded when stored in a message.
    Repeated(Vec<Wire>),
}

impl Wire {
    pub fn describe(&self) -> &'static str {
        match self {
            Wire::Null => "nothing",
            Wire::Varint(_) => "varint",
            Wire::Fixed32(_) => "fixed32",
            Wire::Fixed64(_) => "fixed64",
            Wire::Len(_) => "length-delimited",
            Wire::Message(_) => "message",
            Wire::Repeated(_) => "repeated field",
        }
    }
}

/// Store `child` as field `number`, one entry per element if it is
/// repeated.
pub fn push_field(fields: &mut Vec<(u32, Wire)>, number: u32, child: Wire) -> Result<(), WireError> {
    match child {
        Wire::Repeated(items) => {
            for item in items {
                if matches!(item, Wire::Repeated(_)) {
                    return Err(WireError::NestedRepeated(number));
                }
                fields.push((number, item));
            }
        }
        Wire::Null => {}
        other => fields.push((number, other)),
    }
    Ok(())
}

pub fn encode_message(fields: &[(u32, Wire)], buf: &mut BytesMut) -> Result<(), WireError> {
    for (number, value) in fields {
        encode_field(*number, value, buf)?;
    }
    Ok(())
}

fn encode_field(number: u32, value: &Wire, buf: &mut BytesMut) -> Result<(), WireError> {
    match value {
        Wire::Null => {}
        Wire::Varint(v) => {
            encode_key(number, WireType::Varint, buf);
            encode_varint(*v, buf);
        }
        Wire::Fixed32(v) => {
            encode_key(number, WireType::Fixed32, buf);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Wire::Fixed64(v) => {
            encode_key(number, WireType::Fixed64, buf);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Wire::Len(data) => {
            encode_key(number, WireType::Len, buf);
            encode_varint(data.len() as u64, buf);
            buf.extend_from_slice(data);
        }
        Wire::Message(fields) => {
            let mut inner = BytesMut::new();
            encode_message(fields, &mut inner)?;
            encode_key(number, WireType::Len, buf);
            encode_varint(inner.len() as u64, buf);
            buf.extend_from_slice(&inner);
        }
        Wire::Repeated(items) => {
            for item in items {
                if matches!(item, Wire::Repeated(_)) {
                    return Err(WireError::NestedRepeated(number));
                }
                encode_field(number, item, buf)?;
            }
        }
    }
    Ok(())
}

/// Split a message into its fields. Nested messages stay as
/// [`Wire::Len`] slices of `data`.
pub fn parse_message(data: &Bytes) -> Result<Vec<(u32, Wire)>, WireError> {
    let mut buf = data.clone();
    let mut fields = Vec::new();
    while buf.has_remaining() {
        let (number, wire_type) = decode_key(&mut buf)?;
        let value = match wire_type {
            WireType::Varint => Wire::Varint(decode_varint(&mut buf)?),
            WireType::Fixed32 => Wire::Fixed32(get_fixed32(&mut buf)?),
            WireType::Fixed64 => Wire::Fixed64(get_fixed64(&mut buf)?),
            WireType::Len => {
                let len = decode_varint(&mut buf)?;
                if len > buf.remaining() as u64 {
                    return Err(WireError::Truncated);
                }
                Wire::Len(buf.split_to(len as usize))
            }
        };
        fields.push((number, value));
    }
    Ok(fields)
}

/// Expand a packed run of `kind` scalars.
pub fn parse_packed(data: &Bytes, kind: ValueKind) -> Result<Vec<Wire>, WireError> {
    let mut buf = data.clone();
    let mut items = Vec::new();
    while buf.has_remaining() {
        items.push(match kind {
            ValueKind::Float => Wire::Fixed32(get_fixed32(&mut buf)?),
            ValueKind::Double => Wire::Fixed64(get_fixed64(&mut buf)?),
            _ => Wire::Varint(decode_varint(&mut buf)?),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(fields: &[(u32, Wire)]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_message(fields, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn known_encodings() {
        // The canonical example from the protobuf encoding guide.
        assert_eq!(encode(&[(1, Wire::Varint(150))]), vec![0x08, 0x96, 0x01]);
        assert_eq!(
            encode(&[(2, Wire::Len(Bytes::from_static(b"testing")))]),
            b"\x12\x07testing".to_vec()
        );
        assert_eq!(
            encode(&[(3, Wire::Message(vec![(1, Wire::Varint(150))]))]),
            vec![0x1a, 0x03, 0x08, 0x96, 0x01]
        );
        assert_eq!(
            encode(&[(1, Wire::Fixed32(1.0f32.to_bits()))]),
            vec![0x0d, 0x00, 0x00, 0x80, 0x3f]
        );
    }

    #[test]
    fn parse_keeps_nested_messages_raw() {
        let data = Bytes::from(encode(&[
            (1, Wire::Varint(7)),
            (3, Wire::Message(vec![(1, Wire::Fixed64(2))])),
            (1, Wire::Varint(8)),
        ]));
        let fields = parse_message(&data).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], (1, Wire::Varint(7)));
        assert_eq!(fields[2], (1, Wire::Varint(8)));
        let Wire::Len(nested) = &fields[1].1 else {
            panic!("expected raw nested message");
        };
        assert_eq!(parse_message(nested).unwrap(), vec![(1, Wire::Fixed64(2))]);
    }

    #[test]
    fn truncated_input() {
        let data = Bytes::from_static(b"\x12\x07test");
        assert_eq!(parse_message(&data), Err(WireError::Truncated));
        let data = Bytes::from_static(b"\x0d\x00\x00");
        assert_eq!(parse_message(&data), Err(WireError::Truncated));
    }

    #[test]
    fn repeated_fields_expand() {
        let mut fields = Vec::new();
        push_field(
            &mut fields,
            4,
            Wire::Repeated(vec![Wire::Varint(1), Wire::Varint(2)]),
        )
        .unwrap();
        push_field(&mut fields, 5, Wire::Null).unwrap();
        assert_eq!(fields, vec![(4, Wire::Varint(1)), (4, Wire::Varint(2))]);

        let nested = Wire::Repeated(vec![Wire::Repeated(vec![])]);
        assert_eq!(
            push_field(&mut fields, 6, nested),
            Err(WireError::NestedRepeated(6))
        );
    }

    #[test]
    fn packed_runs() {
        let mut buf = BytesMut::new();
        for v in [3u64, 270, 86942] {
            encode_varint(v, &mut buf);
        }
        let items = parse_packed(&buf.freeze(), ValueKind::Int32).unwrap();
        assert_eq!(
            items,
            vec![Wire::Varint(3), Wire::Varint(270), Wire::Varint(86942)]
        );

        let floats = Bytes::from(
            [1.5f32, -2.0]
                .iter()
                .flat_map(|f| f.to_le_bytes())
                .collect::<Vec<u8>>(),
        );
        let items = parse_packed(&floats, ValueKind::Float).unwrap();
        assert_eq!(
            items,
            vec![
                Wire::Fixed32(1.5f32.to_bits()),
                Wire::Fixed32((-2.0f32).to_bits())
            ]
        );
    }
}
