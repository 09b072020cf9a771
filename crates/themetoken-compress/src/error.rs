use std::time::Duration;

/// Errors that can occur while compressing or decompressing.
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    /// The filter executable could not be started.
    #[error("failed to start {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    /// The filter exited unsuccessfully. `exit_code` is `None` when it was
    /// terminated by a signal.
    #[error("{program} exited with {}: {stderr}", describe_exit(.exit_code))]
    ProcessFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The filter did not finish within the configured bound.
    #[error("{program} did not finish within {after:?}")]
    Timeout { program: String, after: Duration },

    /// Reading from or writing to the filter's pipes failed.
    #[error("pipe I/O error talking to {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },

    /// The in-process codec rejected its input.
    #[error("compression codec error: {reason}")]
    Codec { reason: String },

    /// A filter command line is empty.
    #[error("invalid filter command: {0:?}")]
    InvalidCommand(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
