//! Protobuf wire format primitives shared by the descriptor and plugin codecs.

use bytes::{Buf, BufMut};

use crate::Error;

/// Maximum size for a single length-delimited value (64MB).
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// The wire type encoded in the low three bits of a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    I64 = 1,
    Len = 2,
    SGroup = 3,
    EGroup = 4,
    I32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Varint),
            1 => Ok(Self::I64),
            2 => Ok(Self::Len),
            3 => Ok(Self::SGroup),
            4 => Ok(Self::EGroup),
            5 => Ok(Self::I32),
            other => Err(Error::InvalidWireType(other)),
        }
    }
}

/// Decode a field key (tag number + wire type).
pub fn decode_key(buf: &mut &[u8]) -> Result<(u32, WireType), Error> {
    let key = decode_varint(buf)?;
    let wire_type = WireType::try_from((key & 0x07) as u8)?;
    let field_number = u32::try_from(key >> 3).map_err(|_| Error::InvalidVarint)?;
    Ok((field_number, wire_type))
}

/// Decode a LEB128 varint.
pub fn decode_varint(buf: &mut &[u8]) -> Result<u64, Error> {
    leb128::read::unsigned(buf).map_err(|e| match e {
        leb128::read::Error::IoError(_) => Error::UnexpectedEof,
        leb128::read::Error::Overflow => Error::InvalidVarint,
    })
}

/// Decode a varint-encoded `int32`. Negative values are sign-extended to
/// ten bytes on the wire, so truncation is the intended conversion.
pub fn decode_int32(buf: &mut &[u8]) -> Result<i32, Error> {
    Ok(decode_varint(buf)? as i32)
}

/// Decode a varint-encoded `bool`.
pub fn decode_bool(buf: &mut &[u8]) -> Result<bool, Error> {
    Ok(decode_varint(buf)? != 0)
}

/// Decode a length value and validate it's within bounds.
pub fn decode_len(buf: &mut &[u8]) -> Result<usize, Error> {
    let len = decode_varint(buf)?;
    if len > MAX_MESSAGE_SIZE as u64 {
        return Err(Error::MessageTooLarge(len));
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(Error::UnexpectedEof);
    }
    Ok(len)
}

/// Split off a length-delimited payload, advancing past it.
pub fn decode_bytes<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], Error> {
    let len = decode_len(buf)?;
    let data: &'a [u8] = *buf;
    let (payload, rest) = data.split_at(len);
    *buf = rest;
    Ok(payload)
}

/// Decode a length-delimited string.
pub fn decode_string(buf: &mut &[u8]) -> Result<String, Error> {
    let payload = decode_bytes(buf)?;
    Ok(std::str::from_utf8(payload)?.to_string())
}

/// Skip a field based on its wire type.
pub fn skip_field(buf: &mut &[u8], wire_type: WireType) -> Result<(), Error> {
    match wire_type {
        WireType::Varint => {
            decode_varint(buf)?;
        }
        WireType::I64 => advance(buf, 8)?,
        WireType::I32 => advance(buf, 4)?,
        WireType::Len => {
            decode_bytes(buf)?;
        }
        WireType::SGroup => loop {
            let (_, inner) = decode_key(buf)?;
            if inner == WireType::EGroup {
                break;
            }
            skip_field(buf, inner)?;
        },
        WireType::EGroup => return Err(Error::InvalidWireType(WireType::EGroup as u8)),
    }
    Ok(())
}

fn advance(buf: &mut &[u8], count: usize) -> Result<(), Error> {
    if buf.remaining() < count {
        return Err(Error::UnexpectedEof);
    }
    buf.advance(count);
    Ok(())
}

/// Encode a LEB128 varint.
pub fn encode_varint(value: u64, out: &mut Vec<u8>) -> Result<(), Error> {
    leb128::write::unsigned(out, value)?;
    Ok(())
}

/// Encode a field key.
pub fn encode_key(field_number: u32, wire_type: WireType, out: &mut Vec<u8>) -> Result<(), Error> {
    encode_varint((u64::from(field_number) << 3) | wire_type as u64, out)
}

/// Encode a length-delimited field.
pub fn encode_bytes(field_number: u32, payload: &[u8], out: &mut Vec<u8>) -> Result<(), Error> {
    encode_key(field_number, WireType::Len, out)?;
    encode_varint(payload.len() as u64, out)?;
    out.put_slice(payload);
    Ok(())
}

/// Encode a string field.
pub fn encode_string(field_number: u32, value: &str, out: &mut Vec<u8>) -> Result<(), Error> {
    encode_bytes(field_number, value.as_bytes(), out)
}

/// Encode a varint field.
pub fn encode_uint64(field_number: u32, value: u64, out: &mut Vec<u8>) -> Result<(), Error> {
    encode_key(field_number, WireType::Varint, out)?;
    encode_varint(value, out)
}
