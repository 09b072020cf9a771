/// Errors that can occur while decoding a text token.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The token contains characters outside the URL-safe base64 alphabet,
    /// or its length leaves an impossible bit remainder.
    #[error("invalid token alphabet: {reason}")]
    InvalidAlphabet { reason: String },
}

pub type Result<T> = std::result::Result<T, TransportError>;
