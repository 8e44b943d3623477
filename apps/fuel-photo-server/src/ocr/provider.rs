//! OCR Providers
//!
//! Defines the recognizer trait and the Cloud Vision implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::GoogleAuth;

use super::types::{AnnotateRequest, AnnotateResponse, OcrError, RecognitionResult};

/// Reads text from a publicly reachable image
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image_url: &str) -> Result<RecognitionResult, OcrError>;
}

/// Google Cloud Vision text detection
pub struct GoogleVisionProvider {
    http: reqwest::Client,
    auth: Arc<GoogleAuth>,
    base_url: String,
}

impl GoogleVisionProvider {
    pub fn new(base_url: &str, auth: Arc<GoogleAuth>, http: reqwest::Client) -> Self {
        Self {
            http,
            auth,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.base_url)
    }
}

#[async_trait]
impl TextRecognizer for GoogleVisionProvider {
    async fn recognize(&self, image_url: &str) -> Result<RecognitionResult, OcrError> {
        let token = self.auth.access_token().await?;

        let response = self
            .http
            .post(self.annotate_url())
            .bearer_auth(token)
            .json(&AnnotateRequest::text_detection(image_url))
            .send()
            .await
            .map_err(|e| OcrError::Request(format!("Failed to call Vision: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api { status, body });
        }

        let annotated: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = annotated.into_text(image_url)?;

        tracing::debug!(url = %image_url, chars = text.chars().count(), "Text detected");

        Ok(RecognitionResult {
            text,
            image_url: image_url.to_string(),
        })
    }
}
