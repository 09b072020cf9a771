use async_trait::async_trait;
use bytes::Bytes;

use crate::config::{CompressionConfig, DEFAULT_MAX_DECOMPRESSED_SIZE, DEFAULT_ZSTD_LEVEL};
use crate::error::{CompressionError, Result};
use crate::traits::Compressor;

/// In-process zstd compressor.
///
/// Each call creates its own compression context, so the compressor itself is
/// stateless. Frames always carry their content size, which bounds the output
/// buffer before decompression starts. The codec work runs on tokio's blocking
/// pool so high compression levels do not stall the calling executor.
#[derive(Debug, Clone)]
pub struct ZstdCompressor {
    level: i32,
    max_decompressed_size: usize,
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new(DEFAULT_ZSTD_LEVEL, DEFAULT_MAX_DECOMPRESSED_SIZE)
    }
}

impl ZstdCompressor {
    pub fn new(level: i32, max_decompressed_size: usize) -> Self {
        Self {
            level,
            max_decompressed_size,
        }
    }

    pub fn from_config(config: &CompressionConfig) -> Self {
        Self::new(config.zstd_level, config.max_decompressed_size)
    }

    fn compress_sync(&self, input: &[u8]) -> Result<Bytes> {
        let mut out = Vec::with_capacity(zstd_safe::compress_bound(input.len()));
        let mut cctx = zstd_safe::CCtx::create();
        cctx.compress(&mut out, input, self.level)
            .map_err(codec_error)?;
        tracing::debug!(input = input.len(), output = out.len(), level = self.level, "zstd compressed");
        Ok(Bytes::from(out))
    }

    fn decompress_sync(&self, input: &[u8]) -> Result<Bytes> {
        let expected = match zstd_safe::get_frame_content_size(input) {
            Ok(Some(size)) => size,
            Ok(None) => {
                return Err(CompressionError::Codec {
                    reason: "zstd frame does not declare its content size".to_string(),
                })
            }
            Err(_) => {
                return Err(CompressionError::Codec {
                    reason: "input is not a zstd frame".to_string(),
                })
            }
        };
        if expected > self.max_decompressed_size as u64 {
            return Err(CompressionError::Codec {
                reason: format!(
                    "declared size {expected} exceeds limit {}",
                    self.max_decompressed_size
                ),
            });
        }

        let mut out = Vec::with_capacity(expected as usize);
        let mut dctx = zstd_safe::DCtx::create();
        let written = dctx.decompress(&mut out, input).map_err(codec_error)?;
        if written as u64 != expected {
            return Err(CompressionError::Codec {
                reason: format!("decompressed {written} bytes, frame declared {expected}"),
            });
        }
        tracing::debug!(input = input.len(), output = out.len(), "zstd decompressed");
        Ok(Bytes::from(out))
    }
}

fn codec_error(code: zstd_safe::ErrorCode) -> CompressionError {
    CompressionError::Codec {
        reason: zstd_safe::get_error_name(code).to_string(),
    }
}

async fn run_blocking<F>(job: F) -> Result<Bytes>
where
    F: FnOnce() -> Result<Bytes> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| CompressionError::Codec {
            reason: format!("zstd worker failed: {err}"),
        })?
}

#[async_trait]
impl Compressor for ZstdCompressor {
    async fn compress(&self, input: &[u8]) -> Result<Bytes> {
        let this = self.clone();
        let input = input.to_vec();
        run_blocking(move || this.compress_sync(&input)).await
    }

    async fn decompress(&self, input: &[u8]) -> Result<Bytes> {
        let this = self.clone();
        let input = input.to_vec();
        run_blocking(move || this.decompress_sync(&input)).await
    }

    fn name(&self) -> &'static str {
        "zstd"
    }
}
