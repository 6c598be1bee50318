// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("Parse failed at line {line}, column {column}: {message}")]
    ParseFailure {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("File too large: {size} bytes (limit {limit})")]
    SizeLimitExceeded { size: u64, limit: u64 },

    #[error("{provider} generation failed: {message}")]
    GenerationFailure { provider: String, message: String },

    #[error("Rewrite failed for {path}: {message}")]
    RewriteFailure { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Not a Python file: {0}")]
    UnsupportedFile(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;

impl DocError {
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    pub(crate) fn generation(provider: &str, message: impl Into<String>) -> Self {
        Self::GenerationFailure {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn rewrite(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::RewriteFailure {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to DocError::Io with unknown path.
impl From<std::io::Error> for DocError {
    fn from(source: std::io::Error) -> Self {
        DocError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for DocError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map(PathBuf::from).unwrap_or_default();
        match e.into_io_error() {
            Some(source) => DocError::Io { source, path },
            None => DocError::Io {
                source: std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"),
                path,
            },
        }
    }
}

impl From<glob::PatternError> for DocError {
    fn from(e: glob::PatternError) -> Self {
        DocError::ConfigInvalid(format!("bad glob pattern: {e}"))
    }
}
