//! HTTP resource provider for remotely stored evidence images.

use async_trait::async_trait;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;
use std::time::Duration;

/// Fetches `http://` and `https://` URLs with a shared connection pool.
///
/// Every request carries its own timeout. Non-success statuses are reported as
/// [`ResourceError::Status`]; no retries are attempted.
#[derive(Debug, Clone)]
pub struct HttpResourceProvider {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpResourceProvider {
    pub fn new(timeout: Duration) -> Result<Self, ResourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResourceError::LoadFailed {
                path: "<http client>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client, timeout })
    }

    fn map_error(&self, uri: &str, err: reqwest::Error) -> ResourceError {
        if err.is_timeout() {
            ResourceError::Timeout {
                uri: uri.to_string(),
                after: self.timeout,
            }
        } else if let Some(status) = err.status() {
            ResourceError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            }
        } else {
            ResourceError::LoadFailed {
                path: uri.to_string(),
                message: err.to_string(),
            }
        }
    }
}

fn is_http_url(uri: &str) -> bool {
    let lower = uri.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[async_trait]
impl ResourceProvider for HttpResourceProvider {
    async fn load(&self, uri: &str) -> Result<SharedResourceData, ResourceError> {
        if !is_http_url(uri) {
            return Err(ResourceError::UnsupportedUri(uri.to_string()));
        }

        log::debug!("Fetching image from {}", uri);
        let response = self
            .client
            .get(uri)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_error(uri, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResourceError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_error(uri, e))?;
        Ok(Arc::new(bytes.to_vec()))
    }

    fn name(&self) -> &'static str {
        "HttpResourceProvider"
    }
}
