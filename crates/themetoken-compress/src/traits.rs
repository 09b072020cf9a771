use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A reversible byte compressor.
///
/// Each call owns its input and produces a fresh buffer; implementations keep
/// no state between calls, so one instance may serve concurrent callers.
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Compress `input` completely.
    async fn compress(&self, input: &[u8]) -> Result<Bytes>;

    /// Reverse [`Compressor::compress`].
    async fn decompress(&self, input: &[u8]) -> Result<Bytes>;

    /// Short backend identifier, used in logs and diagnostics.
    fn name(&self) -> &'static str;
}
