//! Content checksums for shard files
//!
//! MD5 for the published digests, CRC32C for re-packed shards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ModelNetError, Result};

/// Files are hashed in chunks of this size
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Expected or computed content digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Checksum {
    /// Lowercase hex MD5 digest
    Md5(String),
    /// CRC32C value
    Crc32c(u32),
}

impl Checksum {
    /// Compute a checksum of the same kind as `self` over the file at `path`
    pub fn compute_like(&self, path: &Path) -> Result<Checksum> {
        match self {
            Checksum::Md5(_) => md5_file(path),
            Checksum::Crc32c(_) => crc32c_file(path),
        }
    }

    /// Check a file against this expected value
    pub fn matches_file(&self, path: &Path) -> Result<bool> {
        Ok(self.compute_like(path)? == *self)
    }
}

/// MD5 digest of a file
pub fn md5_file(path: &Path) -> Result<Checksum> {
    let mut ctx = md5::Context::new();
    for_each_chunk(path, |chunk| ctx.consume(chunk))?;
    Ok(Checksum::Md5(format!("{:x}", ctx.compute())))
}

/// CRC32C of a file
pub fn crc32c_file(path: &Path) -> Result<Checksum> {
    let mut crc = 0u32;
    for_each_chunk(path, |chunk| crc = crc32c::crc32c_append(crc, chunk))?;
    Ok(Checksum::Crc32c(crc))
}

fn for_each_chunk(path: &Path, mut f: impl FnMut(&[u8])) -> Result<()> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        f(&buf[..n]);
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checksum::Md5(hex) => write!(f, "md5:{}", hex),
            Checksum::Crc32c(crc) => write!(f, "crc32c:{:08x}", crc),
        }
    }
}

impl FromStr for Checksum {
    type Err = ModelNetError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ModelNetError::InvalidChecksum { value: s.to_string() };
        let is_hex = |v: &str, len: usize| v.len() == len && v.chars().all(|c| c.is_ascii_hexdigit());

        let (kind, value) = match s.split_once(':') {
            Some((kind, value)) => (kind, value),
            None => ("md5", s),
        };
        match kind.to_ascii_lowercase().as_str() {
            "md5" if is_hex(value, 32) => Ok(Checksum::Md5(value.to_ascii_lowercase())),
            "crc32c" if is_hex(value, 8) => {
                u32::from_str_radix(value, 16).map(Checksum::Crc32c).map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Checksum {
    type Error = ModelNetError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Checksum> for String {
    fn from(value: Checksum) -> Self {
        value.to_string()
    }
}
