//! Batch file output.
//!
//! Each batch becomes one JSON array written to
//! `<output_dir>/bacefook-events-<created_at>.json`. Batches generated within
//! the same millisecond share a timestamp; later ones get a numeric suffix
//! instead of overwriting an earlier file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use bacefook_types::ConnectionEvent;
use tracing::info;

use crate::error::GeneratorError;

/// Prefix of every batch file name.
const FILE_PREFIX: &str = "bacefook-events-";

/// Upper bound on `-N` suffixes tried for one timestamp.
const MAX_SUFFIX: u32 = 10_000;

/// Writes batches as JSON files into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchWriter {
    /// Destination directory, created on first write.
    output_dir: PathBuf,
    /// Pretty-print the JSON.
    pretty: bool,
}

impl BatchWriter {
    /// Create a writer targeting `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            pretty,
        }
    }

    /// File name for a batch stamped `created_at`, with an optional
    /// collision suffix.
    pub fn file_name(created_at: &str, suffix: Option<u32>) -> String {
        suffix.map_or_else(
            || format!("{FILE_PREFIX}{created_at}.json"),
            |n| format!("{FILE_PREFIX}{created_at}-{n}.json"),
        )
    }

    /// Write one batch and return the path of the new file.
    pub fn write(&self, events: &[ConnectionEvent]) -> Result<PathBuf, GeneratorError> {
        let created_at = events
            .first()
            .map(ConnectionEvent::created_at)
            .ok_or(GeneratorError::EmptyBatch)?;

        fs::create_dir_all(&self.output_dir).map_err(|source| GeneratorError::Output {
            path: self.output_dir.clone(),
            source,
        })?;

        let (path, file) = self.create_unique(created_at)?;
        let mut out = BufWriter::new(file);
        self.encode(&mut out, events, &path)?;
        out.write_all(b"\n")
            .and_then(|()| out.flush())
            .map_err(|source| GeneratorError::Output {
                path: path.clone(),
                source,
            })?;

        info!(
            events = events.len(),
            path = %path.display(),
            "Wrote batch"
        );
        Ok(path)
    }

    /// Serialize `events` into `out`. I/O failures are reported against
    /// `path`; anything else is a serialization error.
    fn encode<W: Write>(
        &self,
        out: W,
        events: &[ConnectionEvent],
        path: &Path,
    ) -> Result<(), GeneratorError> {
        let encoded = if self.pretty {
            serde_json::to_writer_pretty(out, events)
        } else {
            serde_json::to_writer(out, events)
        };
        encoded.map_err(|err| {
            if err.is_io() {
                GeneratorError::Output {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(err),
                }
            } else {
                GeneratorError::from(err)
            }
        })
    }

    /// Create a file that does not exist yet for `created_at`.
    fn create_unique(&self, created_at: &str) -> Result<(PathBuf, File), GeneratorError> {
        let candidates = core::iter::once(None).chain((1..=MAX_SUFFIX).map(Some));
        let mut last_path = self.output_dir.clone();
        for suffix in candidates {
            let path = self.output_dir.join(Self::file_name(created_at, suffix));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => last_path = path,
                Err(source) => return Err(GeneratorError::Output { path, source }),
            }
        }
        Err(GeneratorError::Output {
            path: last_path,
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                "no free file name for this timestamp",
            ),
        })
    }
}
