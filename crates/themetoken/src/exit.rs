use std::fmt;

use themetoken_compress::CompressionError;

// Exit codes follow sysexits(3) where one applies.
pub const SUCCESS: i32 = 0;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 70;

pub type CliResult<T> = Result<T, CliError>;

/// A setup failure that ends the program with `code`.
///
/// Failures of individual encode/decode requests are reported on stderr and
/// never become a `CliError`.
#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn compression_error(context: &str, err: CompressionError) -> CliError {
    match err {
        CompressionError::InvalidCommand(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn io_error(context: &str, err: std::io::Error) -> CliError {
    CliError::new(INTERNAL, format!("{context}: {err}"))
}
