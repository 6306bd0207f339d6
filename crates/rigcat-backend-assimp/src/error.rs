//! Error types for the Assimp backend.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Assimp backend operations.
pub type AssimpResult<T> = Result<T, AssimpError>;

/// Errors that can occur while driving the assimp command-line tool.
#[derive(Debug, Error)]
pub enum AssimpError {
    /// Assimp executable not found.
    #[error("assimp executable not found. Ensure assimp is installed and in PATH, or set ASSIMP_PATH environment variable")]
    AssimpNotFound,

    /// Failed to spawn the assimp process.
    #[error("Failed to spawn assimp process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Assimp process timed out.
    #[error("assimp {command} timed out after {timeout_secs} seconds")]
    Timeout {
        command: &'static str,
        timeout_secs: u64,
    },

    /// Assimp process exited with non-zero status.
    #[error("assimp {command} exited with status {exit_code}: {stderr}")]
    ProcessFailed {
        command: &'static str,
        exit_code: i32,
        stderr: String,
    },

    /// The tool reported success but the expected file is missing.
    #[error("Expected output file not found: {path}")]
    OutputNotFound { path: PathBuf },

    /// Failed to read a scene dump written by assimp.
    #[error("Failed to read scene dump from {path}: {source}")]
    ReadDumpFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssimpError {
    /// Creates a new process failed error.
    pub fn process_failed(
        command: &'static str,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ProcessFailed {
            command,
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            AssimpError::AssimpNotFound => "ASSIMP_001",
            AssimpError::SpawnFailed(_) => "ASSIMP_002",
            AssimpError::Timeout { .. } => "ASSIMP_003",
            AssimpError::ProcessFailed { .. } => "ASSIMP_004",
            AssimpError::OutputNotFound { .. } => "ASSIMP_005",
            AssimpError::ReadDumpFailed { .. } => "ASSIMP_006",
            AssimpError::Io(_) => "ASSIMP_007",
        }
    }
}
