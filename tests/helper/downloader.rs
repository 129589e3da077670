//! Downloader test double

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use injection_db::database::downloader::{Download, FileDownloader};
use injection_db::database::error::DownloadError;

/// Serves fixed responses by URL; unknown URLs answer 404
#[derive(Default)]
pub struct StaticDownloader {
    texts: HashMap<String, String>,
    binaries: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl StaticDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: &str, body: impl Into<String>) -> Self {
        self.texts.insert(url.to_string(), body.into());
        self
    }

    pub fn with_binary(mut self, url: &str, body: Vec<u8>) -> Self {
        self.binaries.insert(url.to_string(), body);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }
}

#[async_trait]
impl FileDownloader for StaticDownloader {
    async fn download_text(&self, url: &str) -> Result<Download<String>, DownloadError> {
        self.record(url);
        Ok(match self.texts.get(url) {
            Some(body) => Download::new(StatusCode::OK, body.clone()),
            None => Download::failed(StatusCode::NOT_FOUND),
        })
    }

    async fn download_bytes(&self, url: &str) -> Result<Download<Vec<u8>>, DownloadError> {
        self.record(url);
        Ok(match self.binaries.get(url) {
            Some(body) => Download::new(StatusCode::OK, body.clone()),
            None => Download::failed(StatusCode::NOT_FOUND),
        })
    }
}
