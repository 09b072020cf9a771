//! Typed value model and compact binary object encoding.
//!
//! Payloads are carried as a [`Value`] and written in MessagePack form:
//! - every value starts with a one-byte marker naming its type
//! - lengths and multi-byte numbers are big-endian
//! - byte buffers (`bin`) and UTF-8 strings (`str`) use distinct markers
//!
//! The byte/string distinction survives the round trip, so a decoder can tell
//! raw text payloads apart from structured documents without guessing.

pub mod decode;
pub mod encode;
pub mod error;
pub mod marker;
pub mod value;

pub use decode::{deserialize, MAX_DEPTH};
pub use encode::{encode_value, serialize};
pub use error::{PackError, Result};
pub use value::Value;
