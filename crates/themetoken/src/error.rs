/// Errors that can occur anywhere in the token pipeline.
///
/// Each stage fails fast; the first failing stage's error is returned as-is.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The token text is malformed.
    #[error("transport error: {0}")]
    Transport(#[from] themetoken_transport::TransportError),

    /// Compression or decompression failed.
    #[error("compression error: {0}")]
    Compression(#[from] themetoken_compress::CompressionError),

    /// The binary object payload is malformed.
    #[error("object codec error: {0}")]
    Pack(#[from] themetoken_pack::PackError),

    /// A structured payload is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
