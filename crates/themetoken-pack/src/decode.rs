use bytes::Buf;

use crate::error::{PackError, Result};
use crate::marker::*;
use crate::value::Value;

/// Maximum container nesting accepted by [`deserialize`].
pub const MAX_DEPTH: usize = 128;

/// Decode exactly one value from `input`.
///
/// Fails with [`PackError::Truncated`] when the input ends mid-element and with
/// [`PackError::UnknownTag`] on markers outside the value model (extension
/// types included). Declared lengths are checked against the remaining input
/// before anything is allocated.
pub fn deserialize(input: &[u8]) -> Result<Value> {
    let mut decoder = Decoder {
        buf: input,
        total: input.len(),
        depth: 0,
    };
    let value = decoder.read_value()?;
    if decoder.buf.has_remaining() {
        return Err(PackError::TrailingBytes(decoder.buf.remaining()));
    }
    tracing::debug!(kind = value.kind(), bytes = input.len(), "deserialized value");
    Ok(value)
}

struct Decoder<'a> {
    buf: &'a [u8],
    total: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn offset(&self) -> usize {
        self.total - self.buf.remaining()
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(PackError::Truncated {
                offset: self.offset(),
                needed: n - self.buf.remaining(),
            });
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    fn u16(&mut self) -> Result<u16> {
        self.need(2)?;
        Ok(self.buf.get_u16())
    }

    fn u32(&mut self) -> Result<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32())
    }

    fn u64(&mut self) -> Result<u64> {
        self.need(8)?;
        Ok(self.buf.get_u64())
    }

    fn read_value(&mut self) -> Result<Value> {
        let marker = self.u8()?;
        match marker {
            0x00..=POSITIVE_FIXINT_MAX => Ok(Value::Integer(i64::from(marker))),
            0x80..=0x8f => self.read_map((marker & 0x0f) as usize),
            0x90..=0x9f => self.read_list((marker & 0x0f) as usize),
            0xa0..=0xbf => self.read_str((marker & 0x1f) as usize).map(Value::Str),
            NEGATIVE_FIXINT..=0xff => Ok(Value::Integer(i64::from(marker as i8))),
            NIL => Ok(Value::Null),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            BIN8 => {
                let len = self.u8()? as usize;
                self.read_bytes(len)
            }
            BIN16 => {
                let len = self.u16()? as usize;
                self.read_bytes(len)
            }
            BIN32 => {
                let len = self.u32()? as usize;
                self.read_bytes(len)
            }
            FLOAT32 => {
                self.need(4)?;
                Ok(Value::Float(f64::from(self.buf.get_f32())))
            }
            FLOAT64 => {
                self.need(8)?;
                Ok(Value::Float(self.buf.get_f64()))
            }
            UINT8 => Ok(Value::Integer(i64::from(self.u8()?))),
            UINT16 => Ok(Value::Integer(i64::from(self.u16()?))),
            UINT32 => Ok(Value::Integer(i64::from(self.u32()?))),
            UINT64 => {
                let u = self.u64()?;
                i64::try_from(u)
                    .map(Value::Integer)
                    .map_err(|_| PackError::IntegerOverflow(u))
            }
            INT8 => Ok(Value::Integer(i64::from(self.u8()? as i8))),
            INT16 => Ok(Value::Integer(i64::from(self.u16()? as i16))),
            INT32 => Ok(Value::Integer(i64::from(self.u32()? as i32))),
            INT64 => Ok(Value::Integer(self.u64()? as i64)),
            STR8 => {
                let len = self.u8()? as usize;
                self.read_str(len).map(Value::Str)
            }
            STR16 => {
                let len = self.u16()? as usize;
                self.read_str(len).map(Value::Str)
            }
            STR32 => {
                let len = self.u32()? as usize;
                self.read_str(len).map(Value::Str)
            }
            ARRAY16 => {
                let len = self.u16()? as usize;
                self.read_list(len)
            }
            ARRAY32 => {
                let len = self.u32()? as usize;
                self.read_list(len)
            }
            MAP16 => {
                let len = self.u16()? as usize;
                self.read_map(len)
            }
            MAP32 => {
                let len = self.u32()? as usize;
                self.read_map(len)
            }
            // never-used marker plus the ext/fixext family
            _ => Err(PackError::UnknownTag(marker)),
        }
    }

    fn read_bytes(&mut self, len: usize) -> Result<Value> {
        Ok(Value::Bytes(self.take(len)?.to_vec()))
    }

    fn read_str(&mut self, len: usize) -> Result<String> {
        let offset = self.offset();
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|_| PackError::InvalidUtf8 { offset })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PackError::DepthExceeded { max: MAX_DEPTH });
        }
        Ok(())
    }

    fn read_list(&mut self, len: usize) -> Result<Value> {
        // Every element takes at least one byte.
        self.need(len)?;
        self.enter()?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_value()?);
        }
        self.depth -= 1;
        Ok(Value::List(items))
    }

    fn read_map(&mut self, len: usize) -> Result<Value> {
        // Every entry takes at least a key byte and a value byte.
        self.need(len.saturating_mul(2))?;
        self.enter()?;
        let mut entries = Vec::with_capacity(len);
        for _ in 0..len {
            let key_offset = self.offset();
            let key = match self.read_value()? {
                Value::Str(key) => key,
                _ => return Err(PackError::NonStringKey { offset: key_offset }),
            };
            let value = self.read_value()?;
            entries.push((key, value));
        }
        self.depth -= 1;
        Ok(Value::Map(entries))
    }
}
