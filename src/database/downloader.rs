//! Transport trait for fetching release files from the source host

#[cfg(test)]
use mockall::automock;

use reqwest::StatusCode;

use crate::database::error::DownloadError;

/// Result of a completed HTTP exchange
///
/// Non-OK responses carry an empty payload; check [`Download::is_success`]
/// before trusting `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download<T> {
    pub status: StatusCode,
    pub content: T,
}

impl<T> Download<T> {
    pub fn new(status: StatusCode, content: T) -> Self {
        Self { status, content }
    }

    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }
}

impl<T: Default> Download<T> {
    /// A response with the given status and no payload
    pub fn failed(status: StatusCode) -> Self {
        Self::new(status, T::default())
    }
}

/// Trait for fetching text and binary files by URL
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait FileDownloader: Send + Sync {
    /// Fetches a UTF-8 text file
    ///
    /// # Returns
    /// * `Ok(Download)` - Any HTTP response, with the body only when the status is OK
    /// * `Err(DownloadError)` - If no response was received
    async fn download_text(&self, url: &str) -> Result<Download<String>, DownloadError>;

    /// Fetches a binary file
    async fn download_bytes(&self, url: &str) -> Result<Download<Vec<u8>>, DownloadError>;
}
