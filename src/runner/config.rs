//! Configuration structures and defaults for the task runner.

use crate::downloader::DEFAULT_CHUNK_SIZE;

use reqwest::header::HeaderMap;
use std::env::current_dir;
use std::path::PathBuf;

/// Number of workers a runner starts with unless told otherwise.
pub const DEFAULT_WORKERS: usize = 5;

/// Configuration structure for the task runner.
#[derive(Clone)]
pub struct RunnerConfig {
    /// Base directory downloads are written to. Created on first use.
    pub directory: PathBuf,
    /// Number of workers, which is the number of simultaneous downloads.
    pub workers: usize,
    /// Bytes read and written per step of a download.
    pub chunk_size: usize,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
}

impl std::fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("directory", &self.directory)
            .field("workers", &self.workers)
            .field("chunk_size", &self.chunk_size)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy.is_some())
            .finish()
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            headers: None,
            proxy: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.workers, 5);
        assert_eq!(config.chunk_size, 1024);
        assert!(config.headers.is_none());
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_debug_lists_fields() {
        let debug_str = format!("{:?}", RunnerConfig::default());
        assert!(debug_str.contains("RunnerConfig"));
        assert!(debug_str.contains("chunk_size"));
        assert!(debug_str.contains("proxy: false"));
    }
}
