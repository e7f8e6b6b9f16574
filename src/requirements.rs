//! Requirements file parsing
//!
//! The input is a flat dependency list whose first entry declares the
//! Python version:
//!
//! ```text
//! python_version==3.12
//! # web stack
//! flask==3.0.2
//! gunicorn
//! ```
//!
//! Blank lines and `#` comments are skipped. Everything else is an opaque
//! dependency token handed verbatim to the installer.

use crate::error::{PylayerError, PylayerResult};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// Key of the mandatory runtime declaration line
const RUNTIME_KEY: &str = "python_version";

/// A parsed requirements file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Interpreter version selecting the base image (e.g. "3.12")
    pub runtime_version: String,

    /// Dependency tokens in file order, duplicates removed
    pub entries: Vec<String>,
}

impl DependencySpec {
    /// Read and parse a requirements file
    pub async fn load(path: &Path) -> PylayerResult<Self> {
        if !path.is_file() {
            return Err(PylayerError::RequirementsNotFound(path.to_path_buf()));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PylayerError::io(format!("reading {}", path.display()), e))?;

        Self::parse(&content, path)
    }

    /// Parse requirements content. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> PylayerResult<Self> {
        let mut lines = content.lines().filter_map(significant);

        let first = lines
            .next()
            .ok_or_else(|| PylayerError::MissingRuntimeVersion {
                path: path.to_path_buf(),
            })?;
        let runtime_version = parse_runtime_line(first, path)?;

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for token in lines {
            if seen.insert(token) {
                entries.push(token.to_string());
            } else {
                warn!("Duplicate dependency {} in {}, ignoring", token, path.display());
            }
        }

        debug!(
            "Parsed {}: python {}, {} dependencies",
            path.display(),
            runtime_version,
            entries.len()
        );

        Ok(Self {
            runtime_version,
            entries,
        })
    }
}

/// Strip comments and whitespace. Returns None for lines with no token.
fn significant(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    // Inline comments need leading whitespace so URL fragments survive
    let line = match line.find(" #").or_else(|| line.find("\t#")) {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    };
    Some(line)
}

/// Parse `python_version==<version>`
fn parse_runtime_line(line: &str, path: &Path) -> PylayerResult<String> {
    let missing = || PylayerError::MissingRuntimeVersion {
        path: path.to_path_buf(),
    };

    let (key, version) = line.split_once("==").ok_or_else(missing)?;
    if key.trim() != RUNTIME_KEY {
        return Err(missing());
    }

    let version = version.trim();
    if version.is_empty() {
        return Err(PylayerError::InvalidRuntimeVersion {
            path: path.to_path_buf(),
            reason: "version is empty".to_string(),
        });
    }

    // The version becomes an image tag and a cache file name
    if !version.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(PylayerError::InvalidRuntimeVersion {
            path: path.to_path_buf(),
            reason: format!("'{}' must start with a letter or digit", version),
        });
    }
    if let Some(bad) = version
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(PylayerError::InvalidRuntimeVersion {
            path: path.to_path_buf(),
            reason: format!("unexpected character '{}' in '{}'", bad, version),
        });
    }

    Ok(version.to_string())
}
