//! Pluggable compression stage.
//!
//! Every backend implements [`Compressor`]. Two are provided:
//! - [`ProcessCompressor`] pipes bytes through an external filter executable
//!   (`lzma -c` / `lzcat` by default)
//! - [`ZstdCompressor`] compresses in-process with zstd
//!
//! The backend is chosen once, from a [`CompressionConfig`], via
//! [`build_compressor`]. Tokens are only portable between identical backends.

pub mod config;
pub mod error;
pub mod process;
pub mod traits;
pub mod zstd;

use std::sync::Arc;

pub use config::{Backend, CompressionConfig, FilterCommand, DEFAULT_TIMEOUT};
pub use error::{CompressionError, Result};
pub use process::ProcessCompressor;
pub use traits::Compressor;
pub use zstd::ZstdCompressor;

/// Build the compressor selected by `config`.
pub fn build_compressor(config: &CompressionConfig) -> Arc<dyn Compressor> {
    tracing::debug!(backend = %config.backend, "selected compression backend");
    match config.backend {
        Backend::Process => Arc::new(ProcessCompressor::from_config(config)),
        Backend::Zstd => Arc::new(ZstdCompressor::from_config(config)),
    }
}
