//! MessagePack marker bytes used by the object codec.

pub const NIL: u8 = 0xc0;
/// Reserved by MessagePack, never valid.
pub const NEVER_USED: u8 = 0xc1;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;

pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;

pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;

pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;

pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Positive fixint: `0x00..=0x7f`.
pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;
/// Fixmap: `0x80..=0x8f`, low nibble is the entry count.
pub const FIXMAP: u8 = 0x80;
/// Fixarray: `0x90..=0x9f`, low nibble is the element count.
pub const FIXARRAY: u8 = 0x90;
/// Fixstr: `0xa0..=0xbf`, low five bits are the byte length.
pub const FIXSTR: u8 = 0xa0;
/// Negative fixint: `0xe0..=0xff`.
pub const NEGATIVE_FIXINT: u8 = 0xe0;

pub const FIXMAP_MAX_LEN: usize = 15;
pub const FIXARRAY_MAX_LEN: usize = 15;
pub const FIXSTR_MAX_LEN: usize = 31;
