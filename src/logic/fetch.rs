// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Retrieve raw image bytes for catalog records.
//!
//! Locations come in three shapes:
//! - absolute `http(s)://` URLs, fetched over the network;
//! - `file://` URLs, read from disk;
//! - anything else, resolved against the configured asset root (a base URL
//!   or a local directory).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Bytes of one fetched image plus the content type the server reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Why a single image could not be retrieved. Always recoverable for the
/// archive as a whole.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid image location '{0}'")]
    InvalidLocation(String),
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can turn an image location into bytes.
///
/// Implementations are shared between worker threads.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, location: &str) -> Result<FetchedImage, FetchError>;
}

/// Where relative locations are resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetRoot {
    Url(Url),
    Dir(PathBuf),
}

impl AssetRoot {
    /// Interpret a configured root: http(s) URLs stay URLs, everything else is a directory.
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                // Without a trailing slash `join` would replace the last segment.
                if url.path().ends_with('/') {
                    AssetRoot::Url(url)
                } else {
                    let mut with_slash = url.clone();
                    with_slash.set_path(&format!("{}/", url.path()));
                    AssetRoot::Url(with_slash)
                }
            }
            _ => AssetRoot::Dir(PathBuf::from(raw)),
        }
    }
}

impl fmt::Display for AssetRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRoot::Url(url) => write!(f, "{url}"),
            AssetRoot::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Resolved form of a location, before any I/O happens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    Remote(Url),
    Local(PathBuf),
}

/// Default [`ImageSource`]: blocking HTTP for URLs, the filesystem for paths.
pub struct AssetSource {
    root: AssetRoot,
    client: reqwest::blocking::Client,
}

impl AssetSource {
    /// Build a source with a per-request timeout.
    pub fn new(root: AssetRoot, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("emojipack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { root, client })
    }

    /// Map a location string to a URL or a local path.
    pub fn resolve(&self, location: &str) -> Result<Resolved, FetchError> {
        resolve_location(&self.root, location)
    }

    fn fetch_remote(&self, url: Url) -> Result<FetchedImage, FetchError> {
        let url_text = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Http {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_text,
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
        let bytes = response.bytes().map_err(|source| FetchError::Http {
            url: url_text,
            source,
        })?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

impl ImageSource for AssetSource {
    fn fetch(&self, location: &str) -> Result<FetchedImage, FetchError> {
        match self.resolve(location)? {
            Resolved::Remote(url) => self.fetch_remote(url),
            Resolved::Local(path) => read_local(&path),
        }
    }
}

/// Resolve `location` against `root` without touching the network or disk.
pub fn resolve_location(root: &AssetRoot, location: &str) -> Result<Resolved, FetchError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(FetchError::InvalidLocation(location.to_string()));
    }

    if let Ok(url) = Url::parse(location) {
        return match url.scheme() {
            "http" | "https" => Ok(Resolved::Remote(url)),
            "file" => url
                .to_file_path()
                .map(Resolved::Local)
                .map_err(|_| FetchError::InvalidLocation(location.to_string())),
            // Windows drive letters parse as a one-letter scheme.
            scheme if scheme.len() == 1 => Ok(Resolved::Local(PathBuf::from(location))),
            _ => Err(FetchError::InvalidLocation(location.to_string())),
        };
    }

    match root {
        AssetRoot::Url(base) => base
            .join(location.trim_start_matches('/'))
            .map(Resolved::Remote)
            .map_err(|_| FetchError::InvalidLocation(location.to_string())),
        AssetRoot::Dir(dir) => Ok(Resolved::Local(
            dir.join(location.trim_start_matches(['/', '\\'])),
        )),
    }
}

/// Read a local image, guessing the content type from its extension.
fn read_local(path: &Path) -> Result<FetchedImage, FetchError> {
    let bytes = fs::read(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content_type = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string());
    Ok(FetchedImage {
        bytes,
        content_type,
    })
}
