use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CompressionError, Result};

/// Default bound on a single filter invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default in-process zstd level.
pub const DEFAULT_ZSTD_LEVEL: i32 = 19;

/// Default cap on in-process decompressed output: 64 MiB.
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Which compressor implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// External filter executables.
    #[default]
    Process,
    /// In-process zstd.
    Zstd,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Process => f.write_str("process"),
            Backend::Zstd => f.write_str("zstd"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(Backend::Process),
            "zstd" => Ok(Backend::Zstd),
            other => Err(format!("unknown backend {other:?} (expected process or zstd)")),
        }
    }
}

/// An external filter: reads raw bytes on stdin, writes transformed bytes on
/// stdout, exits 0 on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl FilterCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a whitespace-separated command line. No shell quoting is applied.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| CompressionError::InvalidCommand(line.to_string()))?;
        Ok(Self::new(program, parts))
    }
}

impl fmt::Display for FilterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Controls compressor selection and behavior.
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    /// Which implementation [`crate::build_compressor`] returns.
    pub backend: Backend,
    /// Upper bound on one filter invocation, from spawn to exit.
    pub timeout: Duration,
    /// Filter used to compress. Default: `lzma -c`.
    pub compress_command: FilterCommand,
    /// Filter used to decompress. Default: `lzcat`.
    pub decompress_command: FilterCommand,
    /// zstd compression level for the in-process backend.
    pub zstd_level: i32,
    /// Largest output the in-process backend will decompress to.
    pub max_decompressed_size: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Process,
            timeout: DEFAULT_TIMEOUT,
            compress_command: FilterCommand::new("lzma", ["-c"]),
            decompress_command: FilterCommand::new("lzcat", Vec::<String>::new()),
            zstd_level: DEFAULT_ZSTD_LEVEL,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }
}
