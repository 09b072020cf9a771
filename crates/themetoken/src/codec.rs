use std::sync::Arc;

use themetoken_compress::{build_compressor, CompressionConfig, Compressor};
use themetoken_pack::{deserialize, serialize, Value};
use themetoken_transport::{from_text, to_text};

use crate::error::Result;

/// The encode/decode pipeline.
///
/// Encoding runs object serialization, compression, then token text
/// encoding. Decoding runs them in reverse. Every call owns its buffers, so a
/// single codec can serve concurrent callers.
#[derive(Clone)]
pub struct TokenCodec {
    compressor: Arc<dyn Compressor>,
}

impl TokenCodec {
    pub fn new(compressor: Arc<dyn Compressor>) -> Self {
        Self { compressor }
    }

    /// Build a codec around the backend selected by `config`.
    pub fn from_config(config: &CompressionConfig) -> Self {
        Self::new(build_compressor(config))
    }

    /// Name of the compression backend in use.
    pub fn backend(&self) -> &'static str {
        self.compressor.name()
    }

    /// Encode a text payload as a raw byte buffer.
    ///
    /// The payload is not interpreted, so it decodes back to the exact same
    /// text even when it happens to be JSON.
    pub async fn encode_text(&self, text: &str) -> Result<String> {
        self.encode_value(&Value::Bytes(text.as_bytes().to_vec()))
            .await
    }

    /// Parse `json` and encode it as a structured value.
    pub async fn encode_json(&self, json: &str) -> Result<String> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        self.encode_value(&Value::try_from(parsed)?).await
    }

    pub async fn encode_value(&self, value: &Value) -> Result<String> {
        let packed = serialize(value)?;
        let compressed = self.compressor.compress(&packed).await?;
        let token = to_text(&compressed);
        tracing::debug!(
            kind = value.kind(),
            packed = packed.len(),
            compressed = compressed.len(),
            token = token.len(),
            backend = self.backend(),
            "encoded token"
        );
        Ok(token)
    }

    pub async fn decode_value(&self, token: &str) -> Result<Value> {
        let compressed = from_text(token)?;
        let packed = self.compressor.decompress(&compressed).await?;
        let value = deserialize(&packed)?;
        tracing::debug!(
            kind = value.kind(),
            compressed = compressed.len(),
            packed = packed.len(),
            backend = self.backend(),
            "decoded token"
        );
        Ok(value)
    }

    /// Decode `token` into display text. See [`render`].
    pub async fn decode(&self, token: &str) -> Result<String> {
        let value = self.decode_value(token).await?;
        Ok(render(&value))
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("backend", &self.backend())
            .finish()
    }
}

/// Render a decoded value for display.
///
/// A top-level byte buffer is a raw text payload and is emitted as text.
/// Everything else, a top-level string included, is emitted as compact JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        other => other.to_json_string(),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bytes::Bytes;
    use themetoken_compress::{
        Backend, CompressionError, FilterCommand, ProcessCompressor, ZstdCompressor,
    };
    use themetoken_pack::PackError;
    use themetoken_transport::TransportError;

    use super::*;
    use crate::error::CodecError;

    fn zstd_codec() -> TokenCodec {
        TokenCodec::new(Arc::new(ZstdCompressor::default()))
    }

    /// Drops the last byte of whatever it "decompresses".
    struct TruncatingCompressor;

    #[async_trait]
    impl Compressor for TruncatingCompressor {
        async fn compress(&self, input: &[u8]) -> themetoken_compress::Result<Bytes> {
            Ok(Bytes::copy_from_slice(input))
        }

        async fn decompress(&self, input: &[u8]) -> themetoken_compress::Result<Bytes> {
            Ok(Bytes::copy_from_slice(&input[..input.len().saturating_sub(1)]))
        }

        fn name(&self) -> &'static str {
            "truncating"
        }
    }

    #[tokio::test]
    async fn hello_roundtrips_as_plain_text() {
        let codec = zstd_codec();
        let token = codec.encode_text("hello").await.unwrap();
        assert_eq!(
            codec.decode_value(&token).await.unwrap(),
            Value::Bytes(b"hello".to_vec())
        );
        assert_eq!(codec.decode(&token).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn json_text_payload_comes_back_verbatim() {
        let codec = zstd_codec();
        let doc = r#"{"a":1,"b":[2,3]}"#;
        let token = codec.encode_text(doc).await.unwrap();
        assert_eq!(codec.decode(&token).await.unwrap(), doc);
    }

    #[tokio::test]
    async fn structured_json_roundtrips() {
        let codec = zstd_codec();
        let token = codec.encode_json(r#"{ "a": 1, "b": [2, 3] }"#).await.unwrap();
        let decoded = codec.decode(&token).await.unwrap();

        let expected: serde_json::Value = serde_json::json!({"a": 1, "b": [2, 3]});
        let actual: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(decoded, r#"{"a":1,"b":[2,3]}"#);
    }

    #[tokio::test]
    async fn top_level_string_is_requoted() {
        let codec = zstd_codec();
        let token = codec.encode_value(&Value::from("hello")).await.unwrap();
        assert_eq!(codec.decode(&token).await.unwrap(), r#""hello""#);
    }

    #[tokio::test]
    async fn token_is_url_safe() {
        let codec = zstd_codec();
        let payload: String = (0..2000).map(|i| char::from(b'!' + (i % 90) as u8)).collect();
        let token = codec.encode_text(&payload).await.unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(codec.decode(&token).await.unwrap(), payload);
    }

    #[tokio::test]
    async fn invalid_alphabet_fails_before_decompression() {
        let err = zstd_codec().decode("abc!def").await.unwrap_err();
        assert!(matches!(
            err,
            CodecError::Transport(TransportError::InvalidAlphabet { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let err = zstd_codec().encode_json("{not json").await.unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[tokio::test]
    async fn json_integer_beyond_i64_is_rejected() {
        let err = zstd_codec()
            .encode_json(r#"{"big": 18446744073709551615}"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Pack(PackError::IntegerOverflow(u64::MAX))
        ));
    }

    #[tokio::test]
    async fn truncated_decompression_result_is_not_rendered() {
        let codec = TokenCodec::new(Arc::new(TruncatingCompressor));
        let token = codec
            .encode_json(r#"{"a":1,"b":[2,3]}"#)
            .await
            .unwrap();
        let err = codec.decode(&token).await.unwrap_err();
        assert!(matches!(err, CodecError::Pack(PackError::Truncated { .. })));
    }

    #[tokio::test]
    async fn from_config_selects_backend() {
        let config = CompressionConfig {
            backend: Backend::Zstd,
            ..CompressionConfig::default()
        };
        assert_eq!(TokenCodec::from_config(&config).backend(), "zstd");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_backend_roundtrip() {
        let cat = FilterCommand::new("cat", Vec::<String>::new());
        let codec = TokenCodec::new(Arc::new(ProcessCompressor::new(
            cat.clone(),
            cat,
            std::time::Duration::from_secs(10),
        )));
        let token = codec.encode_text("hello").await.unwrap();
        assert_eq!(codec.decode(&token).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn missing_compressor_yields_spawn_failure() {
        let codec = TokenCodec::new(Arc::new(ProcessCompressor::new(
            FilterCommand::new("/nonexistent/themetoken-lzma", ["-c"]),
            FilterCommand::new("/nonexistent/themetoken-lzcat", Vec::<String>::new()),
            std::time::Duration::from_secs(5),
        )));
        let err = codec.encode_text("hello").await.unwrap_err();
        assert!(matches!(
            err,
            CodecError::Compression(CompressionError::SpawnFailed { .. })
        ));
    }
}
