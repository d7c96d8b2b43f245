// Runtime configuration.
// Resolves the API base URL and log file location from the environment.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{BlogError, Result};

/// Default API serving the posts and comments.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

/// Environment variable overriding the API base URL.
pub const API_URL_VAR: &str = "BLOGEM_API_URL";

/// Environment variable overriding the log file path.
pub const LOG_PATH_VAR: &str = "BLOGEM_LOG";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "blogem=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the blog API, without trailing slash.
    pub api_url: String,
    /// Where tracing output is written. `None` disables logging.
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_path: default_log_path(),
        }
    }
}

impl Config {
    /// Build a config from `BLOGEM_API_URL` and `BLOGEM_LOG`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            config.api_url = normalize_url(&url)?;
        }

        if let Some(path) = lookup(LOG_PATH_VAR) {
            config.log_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        Ok(config)
    }
}

/// Default log file (~/.cache/blogem/blogem.log on Linux).
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "blogem").map(|dirs| dirs.cache_dir().join("blogem.log"))
}

fn normalize_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(BlogError::Config(format!(
            "{} must be an http(s) URL, got {:?}",
            API_URL_VAR, url
        )));
    }
    Ok(trimmed.to_string())
}
