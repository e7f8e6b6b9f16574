//! Image builder backends
//!
//! Provides the `ImageBuilder` seam and a backend for the podman and
//! docker CLIs.

mod builder;
mod engine;

pub use builder::ImageBuilder;
pub use engine::EngineBuilder;

use crate::config::schema::BuilderConfig;
use crate::error::{PylayerError, PylayerResult};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Max number of output lines to include in build error messages.
const BUILD_ERROR_TAIL_LINES: usize = 50;

/// Create the image builder selected by the configuration
pub fn create_builder(config: &BuilderConfig) -> Box<dyn ImageBuilder> {
    Box::new(EngineBuilder::new(config.engine))
}

/// Extract the useful tail of build output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `BUILD_ERROR_TAIL_LINES`
/// lines so error messages are actionable without being overwhelming.
pub(crate) fn build_error_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let start = lines.len().saturating_sub(BUILD_ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Stream stdout+stderr from a child process, calling `on_output` for each line.
///
/// Returns all collected output lines for error reporting.
pub(crate) async fn stream_child_output(
    child: &mut tokio::process::Child,
    on_output: &(dyn Fn(String) + Send + Sync),
) -> PylayerResult<Vec<String>> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| PylayerError::Internal("child stderr not piped".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| PylayerError::Internal("child stdout not piped".to_string()))?;

    let mut stderr_reader = BufReader::new(stderr).split(b'\n');
    let mut stdout_reader = BufReader::new(stdout).split(b'\n');

    let mut all_output = Vec::new();
    let mut stderr_done = false;
    let mut stdout_done = false;

    // Both pipes are drained to EOF; a stalled pipe would block the child
    while !stderr_done || !stdout_done {
        tokio::select! {
            segment = stderr_reader.next_segment(), if !stderr_done => {
                match segment {
                    Ok(Some(bytes)) => {
                        let line = decode_line(&bytes);
                        on_output(line.clone());
                        all_output.push(line);
                    }
                    _ => stderr_done = true,
                }
            }
            segment = stdout_reader.next_segment(), if !stdout_done => {
                match segment {
                    Ok(Some(bytes)) => {
                        let line = decode_line(&bytes);
                        on_output(line.clone());
                        all_output.push(line);
                    }
                    _ => stdout_done = true,
                }
            }
        }
    }

    Ok(all_output)
}

/// Builder output is not guaranteed to be UTF-8 (pip echoes package metadata as-is)
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
