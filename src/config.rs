// Configuration is read from the environment once per invocation and never
// written back.

use crate::error::{Error, Result};
use std::path::PathBuf;

pub const API_KEY_VAR: &str = "APOD_API_KEY";
pub const APODS_PATH_VAR: &str = "APODS_PATH";
pub const API_URL_VAR: &str = "APOD_API_URL";
pub const MAX_RESPONSE_VAR: &str = "APOD_MAX_RESPONSE_BYTES";

pub const DEFAULT_API_URL: &str = "https://api.nasa.gov/planetary/apod";
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Only checked by commands that talk to the remote API.
    pub api_key: Option<String>,
    pub apods_path: PathBuf,
    pub api_url: String,
    pub max_response_bytes: usize,
}

impl Config {
    /// Build the configuration from the process environment. `APODS_PATH`
    /// falls back to the current working directory.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let apods_path = match var(APODS_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => std::env::current_dir()
                .map_err(|e| Error::Config(format!("cannot resolve current directory: {e}")))?,
        };

        let max_response_bytes = match var(MAX_RESPONSE_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!("{MAX_RESPONSE_VAR} must be a byte count, got '{raw}'"))
            })?,
            None => DEFAULT_MAX_RESPONSE_BYTES,
        };

        Ok(Self {
            api_key: var(API_KEY_VAR),
            apods_path,
            api_url: var(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.into()),
            max_response_bytes,
        })
    }
}
