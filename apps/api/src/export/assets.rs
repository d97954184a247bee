//! Badge asset retrieval for the rich-document export.
//!
//! The DOCX header embeds one institutional badge. Where it comes from is configuration:
//! an `http(s)://` location is fetched with reqwest, anything else is read from disk.
//! Whatever the source, the bytes must decode as a raster image before they are accepted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::export::ExportError;

#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Raw bytes of the badge resource.
    async fn fetch(&self) -> Result<Vec<u8>, ExportError>;

    /// Human-readable location, used in errors and logs.
    fn describe(&self) -> String;
}

/// Fetches the badge over HTTP. No retries.
pub struct HttpAssetSource {
    client: Client,
    url: String,
}

impl HttpAssetSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self) -> Result<Vec<u8>, ExportError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ExportError::AssetFetch(format!("{}: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::AssetFetch(format!(
                "{} returned {status}",
                self.url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExportError::AssetFetch(format!("{}: {e}", self.url)))?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the badge from the local filesystem.
pub struct FsAssetSource {
    path: PathBuf,
}

impl FsAssetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AssetSource for FsAssetSource {
    async fn fetch(&self) -> Result<Vec<u8>, ExportError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| ExportError::AssetFetch(format!("{}: {e}", self.path.display())))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Picks the source implementation for a configured location.
pub fn asset_source_for(
    location: &str,
    timeout: Duration,
) -> Result<Arc<dyn AssetSource>, reqwest::Error> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpAssetSource::new(location, timeout)?))
    } else {
        Ok(Arc::new(FsAssetSource::new(location)))
    }
}

/// Fetches the badge once and checks that it is a decodable image.
pub async fn fetch_badge(source: &dyn AssetSource) -> Result<Vec<u8>, ExportError> {
    let bytes = source.fetch().await?;
    image::load_from_memory(&bytes).map_err(|e| {
        ExportError::AssetFetch(format!("{} is not a decodable image: {e}", source.describe()))
    })?;
    debug!(source = %source.describe(), bytes = bytes.len(), "Badge asset fetched");
    Ok(bytes)
}

/// In-memory source for tests.
#[cfg(test)]
pub(crate) struct MemoryAssetSource(pub Option<Vec<u8>>);

#[cfg(test)]
#[async_trait]
impl AssetSource for MemoryAssetSource {
    async fn fetch(&self) -> Result<Vec<u8>, ExportError> {
        self.0
            .clone()
            .ok_or_else(|| ExportError::AssetFetch("memory: no badge".to_string()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
