use bytes::{BufMut, BytesMut};

use crate::decode::MAX_DEPTH;
use crate::error::{PackError, Result};
use crate::marker::*;
use crate::value::Value;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Serialize a value into its binary form.
///
/// Deterministic: the same value always yields the same bytes. Integers take
/// their smallest encoding and floats are always written as float64, so both
/// round-trip exactly. Fails on a length the 32-bit wire format cannot
/// express, and on nesting deeper than [`MAX_DEPTH`], which [`deserialize`]
/// would refuse.
///
/// [`deserialize`]: crate::deserialize
pub fn serialize(value: &Value) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
    encode_value(value, &mut buf)?;
    tracing::debug!(kind = value.kind(), bytes = buf.len(), "serialized value");
    Ok(buf.to_vec())
}

/// Append the encoding of `value` to `dst`.
pub fn encode_value(value: &Value, dst: &mut BytesMut) -> Result<()> {
    encode_nested(value, dst, 0)
}

fn encode_nested(value: &Value, dst: &mut BytesMut, depth: usize) -> Result<()> {
    if matches!(value, Value::List(_) | Value::Map(_)) && depth >= MAX_DEPTH {
        return Err(PackError::DepthExceeded { max: MAX_DEPTH });
    }
    match value {
        Value::Null => dst.put_u8(NIL),
        Value::Bool(false) => dst.put_u8(FALSE),
        Value::Bool(true) => dst.put_u8(TRUE),
        Value::Integer(i) => encode_integer(*i, dst),
        Value::Float(f) => {
            dst.put_u8(FLOAT64);
            dst.put_f64(*f);
        }
        Value::Bytes(bytes) => {
            let len = bytes.len();
            if len <= u8::MAX as usize {
                dst.put_u8(BIN8);
                dst.put_u8(len as u8);
            } else if len <= u16::MAX as usize {
                dst.put_u8(BIN16);
                dst.put_u16(len as u16);
            } else {
                dst.put_u8(BIN32);
                dst.put_u32(len32(len)?);
            }
            dst.put_slice(bytes);
        }
        Value::Str(s) => encode_str(s, dst)?,
        Value::List(items) => {
            let len = items.len();
            if len <= FIXARRAY_MAX_LEN {
                dst.put_u8(FIXARRAY | len as u8);
            } else if len <= u16::MAX as usize {
                dst.put_u8(ARRAY16);
                dst.put_u16(len as u16);
            } else {
                dst.put_u8(ARRAY32);
                dst.put_u32(len32(len)?);
            }
            for item in items {
                encode_nested(item, dst, depth + 1)?;
            }
        }
        Value::Map(entries) => {
            let len = entries.len();
            if len <= FIXMAP_MAX_LEN {
                dst.put_u8(FIXMAP | len as u8);
            } else if len <= u16::MAX as usize {
                dst.put_u8(MAP16);
                dst.put_u16(len as u16);
            } else {
                dst.put_u8(MAP32);
                dst.put_u32(len32(len)?);
            }
            for (key, value) in entries {
                encode_str(key, dst)?;
                encode_nested(value, dst, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn encode_integer(i: i64, dst: &mut BytesMut) {
    if i >= 0 {
        let u = i as u64;
        if u <= POSITIVE_FIXINT_MAX as u64 {
            dst.put_u8(u as u8);
        } else if u <= u8::MAX as u64 {
            dst.put_u8(UINT8);
            dst.put_u8(u as u8);
        } else if u <= u16::MAX as u64 {
            dst.put_u8(UINT16);
            dst.put_u16(u as u16);
        } else if u <= u32::MAX as u64 {
            dst.put_u8(UINT32);
            dst.put_u32(u as u32);
        } else {
            dst.put_u8(UINT64);
            dst.put_u64(u);
        }
    } else if i >= -32 {
        dst.put_u8(i as i8 as u8);
    } else if i >= i8::MIN as i64 {
        dst.put_u8(INT8);
        dst.put_i8(i as i8);
    } else if i >= i16::MIN as i64 {
        dst.put_u8(INT16);
        dst.put_i16(i as i16);
    } else if i >= i32::MIN as i64 {
        dst.put_u8(INT32);
        dst.put_i32(i as i32);
    } else {
        dst.put_u8(INT64);
        dst.put_i64(i);
    }
}

fn encode_str(s: &str, dst: &mut BytesMut) -> Result<()> {
    let len = s.len();
    if len <= FIXSTR_MAX_LEN {
        dst.put_u8(FIXSTR | len as u8);
    } else if len <= u8::MAX as usize {
        dst.put_u8(STR8);
        dst.put_u8(len as u8);
    } else if len <= u16::MAX as usize {
        dst.put_u8(STR16);
        dst.put_u16(len as u16);
    } else {
        dst.put_u8(STR32);
        dst.put_u32(len32(len)?);
    }
    dst.put_slice(s.as_bytes());
    Ok(())
}

fn len32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| PackError::LengthOverflow(len))
}
