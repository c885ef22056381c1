//! Protocol buffers wire primitives: varints, field keys and wire types.

use bytes::{Buf, BufMut};

/// Malformed binary input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("input truncated")]
    Truncated,

    #[error("varint exceeds 64 bits")]
    VarintOverflow,

    #[error("unsupported wire type {0}")]
    InvalidWireType(u8),

    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),

    #[error("nested repeated field {0} has no wire representation")]
    NestedRepeated(u32),
}

/// How a field's payload is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    Len = 2,
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, WireError> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::Len),
            5 => Ok(WireType::Fixed32),
            // 3 and 4 are the deprecated group markers
            other => Err(WireError::InvalidWireType(other)),
        }
    }
}

pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub fn decode_varint(buf: &mut impl Buf) -> Result<u64, WireError> {
    let mut value = 0u64;
    for shift in (0..70).step_by(7) {
        if !buf.has_remaining() {
            return Err(WireError::Truncated);
        }
        let byte = buf.get_u8();
        let low = u64::from(byte & 0x7f);
        if shift == 63 && low > 1 {
            return Err(WireError::VarintOverflow);
        }
        value |= low << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(WireError::VarintOverflow)
}

pub fn encode_key(number: u32, wire_type: WireType, buf: &mut impl BufMut) {
    encode_varint((u64::from(number) << 3) | wire_type as u64, buf);
}

pub fn decode_key(buf: &mut impl Buf) -> Result<(u32, WireType), WireError> {
    let key = decode_varint(buf)?;
    let wire_type = WireType::try_from((key & 0x7) as u8)?;
    let number = key >> 3;
    if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
        return Err(WireError::InvalidFieldNumber(number));
    }
    Ok((number as u32, wire_type))
}

pub fn get_fixed32(buf: &mut impl Buf) -> Result<u32, WireError> {
    if buf.remaining() < 4 {
        return Err(WireError::Truncated);
    }
    Ok(buf.get_u32_le())
}

pub fn get_fixed64(buf: &mut impl Buf) -> Result<u64, WireError> {
    if buf.remaining() < 8 {
        return Err(WireError::Truncated);
    }
    Ok(buf.get_u64_le())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn varint_bytes(value: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_varint(value, &mut buf);
        buf.to_vec()
    }

    #[test]
    fn varint_layout() {
        assert_eq!(varint_bytes(0), vec![0x00]);
        assert_eq!(varint_bytes(1), vec![0x01]);
        assert_eq!(varint_bytes(150), vec![0x96, 0x01]);
        assert_eq!(varint_bytes(u64::MAX).len(), 10);
        // int32 -1 is sign-extended to ten bytes
        assert_eq!(varint_bytes(-1i32 as i64 as u64).len(), 10);
    }

    #[test]
    fn varint_decoding() {
        let mut data: &[u8] = &[0x96, 0x01, 0x05];
        assert_eq!(decode_varint(&mut data), Ok(150));
        assert_eq!(decode_varint(&mut data), Ok(5));
        assert_eq!(decode_varint(&mut data), Err(WireError::Truncated));

        let max = varint_bytes(u64::MAX);
        assert_eq!(decode_varint(&mut max.as_slice()), Ok(u64::MAX));

        let mut truncated: &[u8] = &[0x96];
        assert_eq!(decode_varint(&mut truncated), Err(WireError::Truncated));

        let mut overflow: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f];
        assert_eq!(decode_varint(&mut overflow), Err(WireError::VarintOverflow));
    }

    #[test]
    fn keys() {
        let mut buf = BytesMut::new();
        encode_key(1, WireType::Len, &mut buf);
        assert_eq!(buf.to_vec(), vec![0x0a]);
        assert_eq!(decode_key(&mut buf.freeze()), Ok((1, WireType::Len)));

        let mut group: &[u8] = &[0x0b];
        assert_eq!(decode_key(&mut group), Err(WireError::InvalidWireType(3)));

        let mut zero: &[u8] = &[0x00];
        assert_eq!(decode_key(&mut zero), Err(WireError::InvalidFieldNumber(0)));
    }

    #[test]
    fn fixed_width() {
        let mut data: &[u8] = &[1, 0, 0, 0, 2, 0, 0];
        assert_eq!(get_fixed32(&mut data), Ok(1));
        assert_eq!(get_fixed32(&mut data), Err(WireError::Truncated));
        let mut data: &[u8] = &[0, 0, 0, 0, 0, 0, 0xf0, 0x3f];
        assert_eq!(get_fixed64(&mut data).map(f64::from_bits), Ok(1.0));
    }
}
