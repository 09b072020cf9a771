use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine as _};

use crate::error::{Result, TransportError};

/// URL-safe alphabet, never padded on output, padding rejected on input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Encode raw bytes as a URL-safe token.
///
/// Total over all inputs; an empty slice yields an empty token.
pub fn to_text(bytes: &[u8]) -> String {
    let token = TOKEN_ENGINE.encode(bytes);
    tracing::debug!(bytes = bytes.len(), chars = token.len(), "encoded token text");
    token
}

/// Decode a URL-safe token back into raw bytes.
///
/// Every character must belong to the URL-safe alphabet; `=` padding and
/// whitespace are rejected like any other foreign character.
pub fn from_text(token: &str) -> Result<Vec<u8>> {
    let bytes = TOKEN_ENGINE.decode(token).map_err(alphabet_error)?;
    tracing::debug!(chars = token.len(), bytes = bytes.len(), "decoded token text");
    Ok(bytes)
}

fn alphabet_error(err: DecodeError) -> TransportError {
    let reason = match err {
        DecodeError::InvalidByte(offset, byte) => {
            format!("character {:?} at offset {offset} is not URL-safe base64", byte as char)
        }
        DecodeError::InvalidLastSymbol(offset, byte) => {
            format!("trailing character {:?} at offset {offset} carries stray bits", byte as char)
        }
        DecodeError::InvalidLength => "token length leaves an incomplete byte".to_string(),
        DecodeError::InvalidPadding => "padding '=' is not part of the token alphabet".to_string(),
    };
    TransportError::InvalidAlphabet { reason }
}
