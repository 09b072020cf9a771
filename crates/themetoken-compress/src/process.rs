use std::io::{self, ErrorKind};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::config::{CompressionConfig, FilterCommand};
use crate::error::{CompressionError, Result};
use crate::traits::Compressor;

/// Compressor backed by external filter executables.
///
/// Every call spawns a fresh child with all three standard streams piped. The
/// input is written from one future while stdout and stderr are drained by
/// two others, so a filter that starts emitting output before it has read all
/// of its input can never wedge on a full pipe buffer.
#[derive(Debug, Clone)]
pub struct ProcessCompressor {
    compress: FilterCommand,
    decompress: FilterCommand,
    timeout: Duration,
}

impl ProcessCompressor {
    pub fn new(compress: FilterCommand, decompress: FilterCommand, timeout: Duration) -> Self {
        Self {
            compress,
            decompress,
            timeout,
        }
    }

    pub fn from_config(config: &CompressionConfig) -> Self {
        Self::new(
            config.compress_command.clone(),
            config.decompress_command.clone(),
            config.timeout,
        )
    }

    /// Run `filter` over `input` and collect its stdout.
    pub async fn run_filter(&self, filter: &FilterCommand, input: &[u8]) -> Result<Bytes> {
        let program = filter.program.clone();
        tracing::debug!(command = %filter, input = input.len(), "spawning filter");

        // kill_on_drop reaps the child on every early return below.
        let mut child = Command::new(&filter.program)
            .args(&filter.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| CompressionError::SpawnFailed {
                program: program.clone(),
                reason: err.to_string(),
            })?;

        let (mut stdin, mut stdout, mut stderr) =
            match (child.stdin.take(), child.stdout.take(), child.stderr.take()) {
                (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
                _ => {
                    return Err(CompressionError::Io {
                        program,
                        source: io::Error::other("child pipes were not captured"),
                    })
                }
            };

        let write_input = async move {
            let written = match stdin.write_all(input).await {
                Ok(()) => stdin.flush().await,
                Err(err) => Err(err),
            };
            // Dropping stdin closes the pipe and signals end of input.
            drop(stdin);
            match written {
                // The filter stopped reading; its exit status decides the outcome.
                Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };
        let read_output = async move {
            let mut out = Vec::new();
            stdout.read_to_end(&mut out).await.map(|_| out)
        };
        let read_errors = async move {
            let mut out = Vec::new();
            stderr.read_to_end(&mut out).await.map(|_| out)
        };

        let exchange = async {
            let (written, output, errors) = tokio::join!(write_input, read_output, read_errors);
            let status = child.wait().await;
            (written, output, errors, status)
        };
        let outcome = tokio::time::timeout(self.timeout, exchange).await;

        let (written, output, errors, status) = match outcome {
            Ok(parts) => parts,
            Err(_) => {
                tracing::warn!(command = %filter, timeout = ?self.timeout, "filter timed out, killing");
                if let Err(err) = child.kill().await {
                    tracing::debug!(error = %err, "failed to kill timed out filter");
                }
                return Err(CompressionError::Timeout {
                    program,
                    after: self.timeout,
                });
            }
        };

        let io_err = |source: io::Error| CompressionError::Io {
            program: program.clone(),
            source,
        };
        let status = status.map_err(io_err)?;
        if !status.success() {
            let stderr = errors
                .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
                .unwrap_or_default();
            tracing::debug!(command = %filter, code = ?status.code(), %stderr, "filter failed");
            return Err(CompressionError::ProcessFailed {
                program,
                exit_code: status.code(),
                stderr,
            });
        }
        written.map_err(io_err)?;
        let output = output.map_err(io_err)?;

        tracing::debug!(command = %filter, output = output.len(), "filter finished");
        Ok(Bytes::from(output))
    }
}

#[async_trait]
impl Compressor for ProcessCompressor {
    async fn compress(&self, input: &[u8]) -> Result<Bytes> {
        self.run_filter(&self.compress, input).await
    }

    async fn decompress(&self, input: &[u8]) -> Result<Bytes> {
        self.run_filter(&self.decompress, input).await
    }

    fn name(&self) -> &'static str {
        "process"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> FilterCommand {
        FilterCommand::new("sh", ["-c", script])
    }

    fn identity() -> ProcessCompressor {
        ProcessCompressor::new(
            FilterCommand::new("cat", Vec::<String>::new()),
            FilterCommand::new("cat", Vec::<String>::new()),
            Duration::from_secs(10),
        )
    }

    #[tokio::test]
    async fn roundtrip_through_identity_filter() {
        let compressor = identity();
        let compressed = compressor.compress(b"hello").await.unwrap();
        let restored = compressor.decompress(&compressed).await.unwrap();
        assert_eq!(restored.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn empty_input() {
        let out = identity().compress(&[]).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn large_payload_does_not_deadlock() {
        let payload = vec![b'x'; 4 * 1024 * 1024];
        let compressor = identity();
        let compressed = compressor.compress(&payload).await.unwrap();
        let restored = compressor.decompress(&compressed).await.unwrap();
        assert_eq!(restored.len(), payload.len());
        assert!(restored.iter().all(|b| *b == b'x'));
    }

    #[tokio::test]
    async fn stderr_is_drained_alongside_stdout() {
        // Writes more than a pipe buffer to stderr before echoing stdin.
        let compressor = ProcessCompressor::new(
            sh("head -c 200000 /dev/zero >&2; cat"),
            sh("cat"),
            Duration::from_secs(10),
        );
        let payload = vec![7u8; 300_000];
        let out = compressor.compress(&payload).await.unwrap();
        assert_eq!(out.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn missing_executable_is_spawn_failure() {
        let compressor = ProcessCompressor::new(
            FilterCommand::new("/nonexistent/themetoken-filter", Vec::<String>::new()),
            FilterCommand::new("cat", Vec::<String>::new()),
            Duration::from_secs(5),
        );
        let err = compressor.compress(b"data").await.unwrap_err();
        match err {
            CompressionError::SpawnFailed { program, reason } => {
                assert_eq!(program, "/nonexistent/themetoken-filter");
                assert!(!reason.is_empty());
            }
            other => panic!("expected SpawnFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_zero_exit_reports_code_and_stderr() {
        let compressor = ProcessCompressor::new(
            sh("cat >/dev/null; echo partial; echo boom >&2; exit 3"),
            sh("cat"),
            Duration::from_secs(5),
        );
        let err = compressor.compress(b"data").await.unwrap_err();
        match err {
            CompressionError::ProcessFailed {
                program,
                exit_code,
                stderr,
            } => {
                assert_eq!(program, "sh");
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected ProcessFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn filter_exiting_before_reading_input_is_judged_by_status() {
        let compressor =
            ProcessCompressor::new(sh("exit 0"), sh("exit 1"), Duration::from_secs(5));
        let payload = vec![0u8; 1024 * 1024];

        let out = compressor.compress(&payload).await.unwrap();
        assert!(out.is_empty());

        let err = compressor.decompress(&payload).await.unwrap_err();
        assert!(matches!(
            err,
            CompressionError::ProcessFailed {
                exit_code: Some(1),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unresponsive_filter_times_out() {
        let compressor = ProcessCompressor::new(
            FilterCommand::new("sleep", ["5"]),
            FilterCommand::new("cat", Vec::<String>::new()),
            Duration::from_millis(200),
        );
        let started = std::time::Instant::now();
        let err = compressor.compress(b"data").await.unwrap_err();
        assert!(matches!(err, CompressionError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let compressor = identity();
        let (a, b) = tokio::join!(compressor.compress(b"first"), compressor.compress(b"second"));
        assert_eq!(a.unwrap().as_ref(), b"first");
        assert_eq!(b.unwrap().as_ref(), b"second");
    }
}
