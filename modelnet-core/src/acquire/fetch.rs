//! Archive fetchers
//!
//! Blocking HTTP(S) client using reqwest, plus a local copier for
//! `file://` URLs and mirrored archives.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{ModelNetError, Result};

/// Downloads an archive to a destination file
pub trait Fetcher: Send + Sync {
    /// Fetch `url` into `dest`, returning the number of bytes written
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpFetcherConfig {
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 600,
        }
    }
}

/// HTTP(S) fetcher using a blocking reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new(config: &HttpFetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ModelNetError::Config {
                reason: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("Downloading {} to {}", url, dest.display());

        let mut resp = self.client.get(url).send().map_err(|e| ModelNetError::Download {
            url: url.into(),
            reason: e.to_string(),
        })?;

        if !resp.status().is_success() {
            return Err(ModelNetError::Download {
                url: url.into(),
                reason: format!("status {}", resp.status()),
            });
        }

        let mut file = File::create(dest)?;
        let written = resp.copy_to(&mut file).map_err(|e| ModelNetError::Download {
            url: url.into(),
            reason: format!("Failed to read body: {}", e),
        })?;
        file.flush()?;

        debug!("Downloaded {} bytes from {}", written, url);
        Ok(written)
    }
}

/// Copies archives from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFetcher;

impl LocalFetcher {
    /// Resolve a `file://` URL or plain path to a filesystem path
    pub fn source_path(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

impl Fetcher for LocalFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let src = Self::source_path(url);
        info!("Copying {} to {}", src.display(), dest.display());
        std::fs::copy(&src, dest).map_err(|e| ModelNetError::Download {
            url: url.into(),
            reason: e.to_string(),
        })
    }
}

/// Pick a fetcher by URL scheme
pub fn fetcher_for_url(url: &str, config: &HttpFetcherConfig) -> Result<Box<dyn Fetcher>> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(Box::new(HttpFetcher::new(config)?))
    } else if url.starts_with("file://") || !url.contains("://") {
        Ok(Box::new(LocalFetcher))
    } else {
        Err(ModelNetError::Download {
            url: url.into(),
            reason: "unsupported URL scheme".into(),
        })
    }
}
