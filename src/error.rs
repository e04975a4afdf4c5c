// Error types shared by every module. Command handlers wrap these in
// `anyhow::Error` with extra context; tests downcast back to `Error` to
// check which condition fired.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing argument <{0}>")]
    MissingArgument(&'static str),
    #[error("invalid date format '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid API key: expected {expected} characters, got {actual}")]
    InvalidApiKey { expected: usize, actual: usize },
    #[error("missing API key, set APOD_API_KEY")]
    MissingApiKey,
    #[error("invalid number '{0}', expected an integer between 1 and 100")]
    InvalidNumber(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("fetch error: {status}: {body}")]
    Fetch {
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    },
    #[error("response too large: more than {limit} bytes")]
    ResponseTooLarge { limit: usize },
    #[error("failed to read response body: {0}")]
    ReadBody(io::Error),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("failed to open directory {}: {source}", path.display())]
    OpenDir { path: PathBuf, source: io::Error },
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl Error {
    /// Classify an I/O failure on `path` into the filesystem variants.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}
