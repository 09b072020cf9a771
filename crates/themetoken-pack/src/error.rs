/// Errors that can occur during object encoding/decoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PackError {
    /// The input ended in the middle of an element.
    #[error("truncated payload (needed {needed} more bytes at offset {offset})")]
    Truncated { offset: usize, needed: usize },

    /// A type marker byte that no value variant uses.
    #[error("unknown type marker 0x{0:02x}")]
    UnknownTag(u8),

    /// A string element is not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// A map key is something other than a string.
    #[error("map key at offset {offset} is not a string")]
    NonStringKey { offset: usize },

    /// An unsigned integer does not fit the signed integer range.
    #[error("integer {0} exceeds the supported range")]
    IntegerOverflow(u64),

    /// Containers are nested deeper than the decoder allows.
    #[error("nesting depth exceeds {max}")]
    DepthExceeded { max: usize },

    /// Bytes remain after the top-level value.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// A length does not fit the 32-bit wire representation.
    #[error("length {0} exceeds the 32-bit wire limit")]
    LengthOverflow(usize),
}

pub type Result<T> = std::result::Result<T, PackError>;
