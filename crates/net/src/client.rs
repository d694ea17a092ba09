//! HTTP client with connection pooling

use evoke_errors::{Error, NetworkError, Result};
use futures::StreamExt;
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // 5 minutes for large tarballs
            connect_timeout: Duration::from_secs(30),
            user_agent: format!("evoke/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ConnectionRefused(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&NetConfig::default())
    }

    /// Execute a GET request and require a success status.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` naming the URL on timeout, connection failure
    /// or a non-success HTTP status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(&e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }
        Ok(response)
    }

    /// Download a URL into a local file, streaming the body to disk.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` on request failure and I/O errors when the
    /// destination cannot be written.
    pub async fn download_file(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.get(url).await?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| NetworkError::DownloadFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;
            tokio::io::AsyncWriteExt::write_all(&mut file, &chunk).await?;
        }
        tokio::io::AsyncWriteExt::flush(&mut file).await?;

        Ok(())
    }

    /// Get the underlying reqwest client for advanced usage
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

fn classify_error(error: &reqwest::Error, url: &str) -> Error {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
        .into()
    } else if error.is_connect() {
        NetworkError::ConnectionRefused(error.to_string()).into()
    } else if error.is_builder() {
        NetworkError::InvalidUrl(url.to_string()).into()
    } else {
        NetworkError::DownloadFailed {
            url: url.to_string(),
            message: error.to_string(),
        }
        .into()
    }
}

/// Local file name for a URL: its final path segment.
#[must_use]
pub fn file_name_for_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
