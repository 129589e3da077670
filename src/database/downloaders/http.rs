//! HTTP implementation of the file downloader

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::database::downloader::{Download, FileDownloader};
use crate::database::error::DownloadError;

const USER_AGENT: &str = "injection-db";

/// Downloader backed by a shared reqwest client
///
/// No retries or caching; timeouts are whatever the client was built with.
pub struct HttpFileDownloader {
    client: reqwest::Client,
}

impl HttpFileDownloader {
    pub fn new() -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }
}

#[async_trait::async_trait]
impl FileDownloader for HttpFileDownloader {
    async fn download_text(&self, url: &str) -> Result<Download<String>, DownloadError> {
        let response = self.send(url).await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Source host returned status {}: {}", status, url);
            return Ok(Download::failed(status));
        }

        let content = response.text().await.map_err(|e| DownloadError::Read {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Download::new(status, content))
    }

    async fn download_bytes(&self, url: &str) -> Result<Download<Vec<u8>>, DownloadError> {
        let response = self.send(url).await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Source host returned status {}: {}", status, url);
            return Ok(Download::failed(status));
        }

        let content = response.bytes().await.map_err(|e| DownloadError::Read {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!("Downloaded {} bytes from {}", content.len(), url);
        Ok(Download::new(status, content.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn download_text_returns_body_for_ok_response() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/db/latest.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"DbVersion": 99, "ApiVersion": 1}"#)
            .create_async()
            .await;

        let downloader = HttpFileDownloader::new().unwrap();
        let result = downloader
            .download_text(&format!("{}/db/latest.json", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_success());
        assert_eq!(result.content, r#"{"DbVersion": 99, "ApiVersion": 1}"#);
    }

    #[tokio::test]
    async fn download_text_returns_empty_content_for_not_found() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/db/latest.json")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let downloader = HttpFileDownloader::new().unwrap();
        let result = downloader
            .download_text(&format!("{}/db/latest.json", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.status, StatusCode::NOT_FOUND);
        assert!(!result.is_success());
        assert!(result.content.is_empty());
    }

    #[tokio::test]
    async fn download_bytes_returns_raw_body() {
        let mut server = Server::new_async().await;
        let body: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0x00, 0xff];

        let mock = server
            .mock("GET", "/db/99.zip")
            .with_status(200)
            .with_header("content-type", "application/zip")
            .with_body(body.clone())
            .create_async()
            .await;

        let downloader = HttpFileDownloader::new().unwrap();
        let result = downloader
            .download_bytes(&format!("{}/db/99.zip", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_success());
        assert_eq!(result.content, body);
    }

    #[tokio::test]
    async fn download_bytes_treats_non_ok_success_status_as_failure() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/db/99.zip")
            .with_status(204)
            .create_async()
            .await;

        let downloader = HttpFileDownloader::new().unwrap();
        let result = downloader
            .download_bytes(&format!("{}/db/99.zip", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.status, StatusCode::NO_CONTENT);
        assert!(result.content.is_empty());
    }
}
