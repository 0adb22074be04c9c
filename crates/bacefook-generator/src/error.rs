//! Error types for the generator binary.
//!
//! [`GeneratorError`] wraps every failure mode of the driver so that `main`
//! has a single error type to report.

use std::path::PathBuf;

/// Top-level error for the generator binary.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// The simulator rejected a user count.
    #[error("{source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: bacefook_core::SimulationError,
    },

    /// Writing a batch file failed.
    #[error("failed to write {path}: {source}")]
    Output {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Serializing a batch failed.
    #[error("failed to serialize batch: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Reading the trigger input or writing the prompt failed.
    #[error("terminal I/O error: {source}")]
    Terminal {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A batch contained no events, so it has no timestamp to name a file.
    #[error("refusing to write an empty batch")]
    EmptyBatch,
}
