//! Builder pattern implementation for creating [`TaskRunner`] instances.
//!
//! # Examples
//!
//! ## Basic Builder Usage
//!
//! ```rust
//! use fetchpool::progress::NoopReporter;
//! use fetchpool::RunnerBuilder;
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fetchpool::Error> {
//! let runner = RunnerBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .workers(5)
//!     .chunk_size(8192)
//!     .build(NoopReporter)?;
//! assert_eq!(runner.workers(), 5);
//! runner.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Headers
//!
//! ```rust
//! use fetchpool::progress::NoopReporter;
//! use fetchpool::RunnerBuilder;
//! use reqwest::header::{HeaderValue, USER_AGENT};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fetchpool::Error> {
//! let runner = RunnerBuilder::new()
//!     .header(USER_AGENT, HeaderValue::from_static("MyApp/1.0"))
//!     .build(NoopReporter)?;
//! # runner.shutdown().await;
//! # Ok(())
//! # }
//! ```

use super::{config::RunnerConfig, runner::TaskRunner};
use crate::downloader::Downloader;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::progress::Reporter;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{path::PathBuf, sync::Arc};

/// A builder used to create a [`TaskRunner`].
#[derive(Debug, Default)]
pub struct RunnerBuilder {
    config: RunnerConfig,
}

impl RunnerBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        RunnerBuilder::default()
    }

    /// Sets the directory where to store the downloads.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the number of workers, which bounds simultaneous downloads.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the number of bytes read and written per step.
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Route every request through a proxy.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be
    /// merged into a single one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Get the configuration collected so far.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Create the [`TaskRunner`] and start its workers.
    ///
    /// Must be called from within a Tokio runtime. Fails when the worker count
    /// or the chunk size is zero, or when the HTTP client cannot be built.
    pub fn build<R>(self, reporter: R) -> Result<TaskRunner>
    where
        R: Reporter + 'static,
    {
        if self.config.workers == 0 {
            return Err(Error::InvalidConfig(
                "the worker count must be at least 1".into(),
            ));
        }
        if self.config.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "the chunk size must be at least 1 byte".into(),
            ));
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(Error::Internal(
                "a task runner must be built inside a Tokio runtime".into(),
            ));
        }

        let client = create_http_client(HttpClientConfig {
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
        })?;
        let downloader = Downloader::new(client, self.config.chunk_size, Arc::new(reporter));

        Ok(TaskRunner::start(self.config, downloader))
    }
}
