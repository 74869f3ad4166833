//! Object-store gateway client.
//!
//! Talks to an HTTP gateway in front of the image bucket:
//! - `POST {base}/upload-urls` returns `{ "upload_url": ... }`
//! - `GET {base}/blobs/{id}` returns `{ "url": ... }`, or 404 for unknown blobs
//! - `DELETE {base}/blobs/{id}` removes a blob; 404 counts as already gone

use std::time::Duration;

use async_trait::async_trait;
use domain::blob::{BlobError, BlobStore};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::ObjectStoreConfig;

#[derive(Debug, Deserialize)]
struct UploadUrlBody {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct BlobUrlBody {
    url: String,
}

/// `BlobStore` backed by the object-store gateway.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout_ms: u64,
}

impl HttpBlobStore {
    pub fn new(config: &ObjectStoreConfig) -> Result<Self, BlobError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| BlobError::Request(e.to_string()))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| BlobError::Request(format!("invalid base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BlobError::Request(format!(
                "invalid base URL: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    /// `{base}/{segments...}`, each segment percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of a blob, or `None` for ids that cannot name a single segment.
    fn blob_url(&self, storage_id: &str) -> Option<Url> {
        if matches!(storage_id, "" | "." | "..") {
            return None;
        }
        Some(self.endpoint(&["blobs", storage_id]))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }

    fn request_error(&self, e: reqwest::Error) -> BlobError {
        if e.is_timeout() {
            BlobError::Request(format!("timed out after {}ms", self.timeout_ms))
        } else {
            BlobError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn generate_upload_url(&self) -> Result<String, BlobError> {
        let url = self.endpoint(&["upload-urls"]);
        debug!(url = %url, "Requesting upload URL");

        let response = self
            .authorized(self.client.post(url))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlobError::UnexpectedResponse(format!("HTTP {}", status)));
        }

        let body: UploadUrlBody = response
            .json()
            .await
            .map_err(|e| BlobError::UnexpectedResponse(e.to_string()))?;
        Ok(body.upload_url)
    }

    async fn get_url(&self, storage_id: &str) -> Result<Option<String>, BlobError> {
        let Some(url) = self.blob_url(storage_id) else {
            return Ok(None);
        };
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: BlobUrlBody = response
                    .json()
                    .await
                    .map_err(|e| BlobError::UnexpectedResponse(e.to_string()))?;
                Ok(Some(body.url))
            }
            status => Err(BlobError::UnexpectedResponse(format!("HTTP {}", status))),
        }
    }

    async fn delete(&self, storage_id: &str) -> Result<(), BlobError> {
        let Some(url) = self.blob_url(storage_id) else {
            return Ok(());
        };
        let response = self
            .authorized(self.client.delete(url))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(BlobError::UnexpectedResponse(format!("HTTP {}", status))),
        }
    }
}
