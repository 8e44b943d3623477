//! Google Cloud Storage client
//!
//! Uploads photos through the JSON API media endpoint using a bearer token
//! from the shared service-account credential.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::GoogleAuth;
use crate::config::StorageConfig;
use crate::error::StorageError;

use super::types::{ObjectNamer, StoredImage, IMAGE_CONTENT_TYPE};

/// Object storage backend
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file under a freshly generated name
    async fn upload(&self, local_path: &Path) -> Result<StoredImage, StorageError>;
}

/// Google Cloud Storage client bound to one bucket
#[derive(Clone)]
pub struct GcsClient {
    http: reqwest::Client,
    auth: Arc<GoogleAuth>,
    bucket: String,
    upload_base_url: String,
    public_base_url: String,
    namer: Arc<ObjectNamer>,
}

impl GcsClient {
    pub fn new(config: &StorageConfig, auth: Arc<GoogleAuth>, http: reqwest::Client) -> Self {
        Self {
            http,
            auth,
            bucket: config.bucket.clone(),
            upload_base_url: config.upload_base_url.clone(),
            public_base_url: config.public_base_url.clone(),
            namer: Arc::new(ObjectNamer::new()),
        }
    }
}

/// JSON API media upload endpoint for one object
fn insert_url(upload_base_url: &str, bucket: &str, object_name: &str) -> String {
    format!(
        "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
        upload_base_url,
        urlencoding::encode(bucket),
        urlencoding::encode(object_name)
    )
}

#[async_trait]
impl ObjectStore for GcsClient {
    async fn upload(&self, local_path: &Path) -> Result<StoredImage, StorageError> {
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|source| StorageError::LocalRead {
                path: local_path.display().to_string(),
                source,
            })?;

        let token = self.auth.access_token().await?;
        let object_name = self.namer.next_name();
        let size = data.len();

        let response = self
            .http
            .post(insert_url(&self.upload_base_url, &self.bucket, &object_name))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, IMAGE_CONTENT_TYPE)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("Failed to upload {}: {}", object_name, e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                object: object_name,
                status,
                body,
            });
        }

        tracing::debug!(
            bucket = %self.bucket,
            object = %object_name,
            size,
            "Stored image"
        );

        Ok(StoredImage::new(&self.public_base_url, &self.bucket, object_name))
    }
}
