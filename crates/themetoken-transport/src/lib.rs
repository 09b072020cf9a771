//! URL-safe text transport for binary token payloads.
//!
//! Tokens are the only artifact that crosses the themetoken boundary. They use
//! the URL-safe base64 alphabet (`-` and `_` in place of `+` and `/`) with no
//! padding and no embedded metadata: a token is valid exactly when it decodes.
//!
//! This is the outermost layer of themetoken. Everything the compression stage
//! produces is handed to [`to_text`] unchanged.

pub mod codec;
pub mod error;

pub use codec::{from_text, to_text};
pub use error::{Result, TransportError};
