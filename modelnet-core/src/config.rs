//! Loader configuration
//!
//! Environment-driven settings resolved into [`ModelNet40Options`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::acquire::HttpFetcherConfig;
use crate::catalog::DatasetDescriptor;
use crate::data::ModelNet40Options;
use crate::error::{ModelNetError, Result};

/// Settings for locating and loading the dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Base storage directory
    pub root: PathBuf,
    /// Load the training split (otherwise the evaluation split)
    pub train: bool,
    /// Fetch the archive when the files on disk do not verify
    pub download: bool,
    /// Archive URL override (e.g. a mirror)
    pub url: Option<String>,
    /// JSON descriptor replacing the published layout
    pub descriptor: Option<PathBuf>,
    /// HTTP timeouts
    pub http: HttpFetcherConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            train: true,
            download: false,
            url: None,
            descriptor: None,
            http: HttpFetcherConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Read `MODELNET_*` environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(root) = lookup("MODELNET_ROOT") {
            config.root = PathBuf::from(root);
        }
        if let Some(train) = lookup("MODELNET_TRAIN") {
            config.train = parse_bool("MODELNET_TRAIN", &train)?;
        }
        if let Some(download) = lookup("MODELNET_DOWNLOAD") {
            config.download = parse_bool("MODELNET_DOWNLOAD", &download)?;
        }
        config.url = lookup("MODELNET_URL");
        config.descriptor = lookup("MODELNET_DESCRIPTOR").map(PathBuf::from);
        if let Some(secs) = lookup("MODELNET_CONNECT_TIMEOUT_SECS") {
            config.http.connect_timeout_secs = parse_secs("MODELNET_CONNECT_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("MODELNET_REQUEST_TIMEOUT_SECS") {
            config.http.request_timeout_secs = parse_secs("MODELNET_REQUEST_TIMEOUT_SECS", &secs)?;
        }

        Ok(config)
    }

    /// The descriptor this configuration selects
    pub fn load_descriptor(&self) -> Result<DatasetDescriptor> {
        let mut descriptor = match &self.descriptor {
            Some(path) => DatasetDescriptor::from_json_file(path)?,
            None => DatasetDescriptor::modelnet40(),
        };
        if let Some(url) = &self.url {
            descriptor.url = url.clone();
        }
        Ok(descriptor)
    }

    /// Resolve into dataset construction options
    pub fn options(&self) -> Result<ModelNet40Options> {
        Ok(ModelNet40Options::new(self.root.clone())
            .train(self.train)
            .download(self.download)
            .descriptor(self.load_descriptor()?)
            .http(self.http.clone()))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ModelNetError::Config {
            reason: format!("{} must be a boolean, got '{}'", key, other),
        }),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| ModelNetError::Config {
        reason: format!("{} must be a whole number of seconds, got '{}'", key, value),
    })
}
