//! Compact URL-safe tokens for browser theme payloads.
//!
//! A payload is serialized into a typed binary object, compressed, and written
//! in the URL-safe base64 alphabet. Decoding runs the same stages backwards.
//!
//! # Crate Structure
//!
//! - [`transport`] — Token text encoding (URL-safe base64)
//! - [`pack`] — Typed value model and binary object encoding
//! - [`compress`] — Compression stage (external filter or in-process zstd)
//! - [`codec`] — The full encode/decode pipeline
//! - [`theme`] — Browser theme generation from a sixteen-color scheme

pub mod codec;
pub mod error;
pub mod theme;

pub use codec::{render, TokenCodec};
pub use error::{CodecError, Result};

/// Re-export transport types.
pub mod transport {
    pub use themetoken_transport::*;
}

/// Re-export object codec types.
pub mod pack {
    pub use themetoken_pack::*;
}

/// Re-export compression types.
pub mod compress {
    pub use themetoken_compress::*;
}
