//! Error types for the batch decompiler.
//!
//! Every variant except [`Error::InvalidInput`] and [`Error::CurrentExe`] is
//! scoped to a single work item; the converter records it against that item
//! and moves on to the next one.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for conversion operations.
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Input Errors ====================
    #[error("input path is neither a file nor a directory: {}", path.display())]
    InvalidInput { path: PathBuf },

    #[error("failed to locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),

    #[error("failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    // ==================== I/O Errors ====================
    #[error("failed to open file '{}': {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy '{}' to '{}': {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ==================== Decompiler Errors ====================
    #[error("failed to launch decompiler '{}': {source}", program.display())]
    DecompilerSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to collect decompiler output for '{}': {source}", path.display())]
    DecompilerIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decompiler failed on '{}' with {}", path.display(), describe_exit(*exit_code))]
    DecompilerFailed {
        path: PathBuf,
        exit_code: Option<i32>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
}

/// A specialized Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

impl Error {
    /// Returns true if this error only affects the work item it was raised for.
    ///
    /// Invalid input and a missing executable directory stop the whole batch;
    /// everything else is logged against one file.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::InvalidInput { .. } | Error::CurrentExe(_))
    }

    /// Returns the captured decompiler streams, if this is a decompiler failure.
    pub fn diagnostics(&self) -> Option<(&[u8], &[u8])> {
        match self {
            Error::DecompilerFailed { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }

    /// Creates a file open error.
    #[inline]
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    #[inline]
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileWrite {
            path: path.into(),
            source,
        }
    }
}
