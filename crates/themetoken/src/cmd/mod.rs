use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use themetoken::compress::{Backend, CompressionConfig, FilterCommand};

use crate::exit::{compression_error, CliResult};
use crate::output::OutputFormat;

pub mod envinfo;
pub mod request;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version information.
    Version(VersionArgs),
    /// Print build, backend, and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, codec: &CodecArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, codec, format),
    }
}

/// Compression backend selection.
#[derive(Args, Debug)]
pub struct CodecArgs {
    /// Compression backend: external filter processes or in-process zstd.
    #[arg(long, value_name = "BACKEND", default_value = "process", env = "THEMETOKEN_BACKEND")]
    pub backend: Backend,
    /// Filter command used to compress (process backend).
    #[arg(
        long,
        value_name = "COMMAND",
        default_value = "lzma -c",
        env = "THEMETOKEN_COMPRESS_CMD"
    )]
    pub compress_cmd: String,
    /// Filter command used to decompress (process backend).
    #[arg(
        long,
        value_name = "COMMAND",
        default_value = "lzcat",
        env = "THEMETOKEN_DECOMPRESS_CMD"
    )]
    pub decompress_cmd: String,
    /// Maximum time one filter invocation may take (e.g. 30s, 500ms).
    #[arg(
        long,
        value_name = "DURATION",
        default_value = "30s",
        value_parser = parse_duration,
        env = "THEMETOKEN_TIMEOUT"
    )]
    pub timeout: Duration,
    /// Compression level (zstd backend).
    #[arg(long, value_name = "LEVEL", default_value_t = 19)]
    pub zstd_level: i32,
}

impl CodecArgs {
    pub fn to_config(&self) -> CliResult<CompressionConfig> {
        let compress_command = FilterCommand::parse(&self.compress_cmd)
            .map_err(|err| compression_error("--compress-cmd", err))?;
        let decompress_command = FilterCommand::parse(&self.decompress_cmd)
            .map_err(|err| compression_error("--decompress-cmd", err))?;
        Ok(CompressionConfig {
            backend: self.backend,
            timeout: self.timeout,
            compress_command,
            decompress_command,
            zstd_level: self.zstd_level,
            ..CompressionConfig::default()
        })
    }
}

/// Requests, each repeatable. They run in command-line order.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Decode a token and print its payload.
    #[arg(short = 'd', long = "decode", value_name = "TOKEN", allow_hyphen_values = true)]
    pub decode: Vec<String>,
    /// Encode a text payload verbatim.
    #[arg(short = 'e', long = "encode", value_name = "PAYLOAD", allow_hyphen_values = true)]
    pub encode: Vec<String>,
    /// Encode a JSON document as a structured value.
    #[arg(short = 'j', long = "json", value_name = "DOCUMENT", allow_hyphen_values = true)]
    pub json: Vec<String>,
    /// Generate a theme token from a sixteen-color scheme file.
    #[arg(short = 't', long = "theme", value_name = "FILE")]
    pub theme: Vec<PathBuf>,
    /// Title for generated themes. Default: the scheme's name or file stem.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}

pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration value: {input}"))?;

    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn codec_args_to_config() {
        let args = CodecArgs {
            backend: Backend::Process,
            compress_cmd: "xz --format=lzma -c".to_string(),
            decompress_cmd: "xz -dc".to_string(),
            timeout: Duration::from_secs(2),
            zstd_level: 3,
        };
        let config = args.to_config().expect("config should build");
        assert_eq!(config.compress_command.program, "xz");
        assert_eq!(config.decompress_command.args, vec!["-dc"]);
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn empty_filter_command_is_usage_error() {
        let args = CodecArgs {
            backend: Backend::Process,
            compress_cmd: " ".to_string(),
            decompress_cmd: "lzcat".to_string(),
            timeout: Duration::from_secs(2),
            zstd_level: 3,
        };
        let err = args.to_config().expect_err("empty command should fail");
        assert_eq!(err.code, crate::exit::USAGE);
    }
}
