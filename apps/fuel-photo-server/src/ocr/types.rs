//! OCR Types
//!
//! Result type returned to clients plus the Cloud Vision wire format.

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Text read from one stored photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// Whole-image text, empty when nothing was detected
    pub text: String,
    /// Public URL the text was read from
    pub image_url: String,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Vision request failed: {0}")]
    Request(String),

    #[error("Vision API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Vision could not annotate {image_url} (code {code}): {message}")]
    Annotation {
        image_url: String,
        code: i32,
        message: String,
    },

    #[error("Unexpected Vision response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Cloud Vision wire format (images:annotate)
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct AnnotateRequest<'a> {
    pub requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnnotateImageRequest<'a> {
    pub image: VisionImage<'a>,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VisionImage<'a> {
    pub source: ImageSource<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageSource<'a> {
    pub image_uri: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl<'a> AnnotateRequest<'a> {
    /// Single TEXT_DETECTION request against a public image URL
    pub fn text_detection(image_uri: &'a str) -> Self {
        Self {
            requests: vec![AnnotateImageRequest {
                image: VisionImage {
                    source: ImageSource { image_uri },
                },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateImageResponse {
    #[serde(default)]
    pub text_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    pub error: Option<RpcStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntityAnnotation {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl AnnotateResponse {
    /// Whole-image text of the first response.
    ///
    /// Vision lists the full text first, then one entry per word; only the
    /// first is kept. No annotations means no text, not an error.
    pub fn into_text(self, image_url: &str) -> Result<String, OcrError> {
        let response = self.responses.into_iter().next().ok_or_else(|| {
            OcrError::InvalidResponse("no per-image response in annotate result".to_string())
        })?;

        if let Some(status) = response.error {
            return Err(OcrError::Annotation {
                image_url: image_url.to_string(),
                code: status.code,
                message: status.message,
            });
        }

        Ok(response
            .text_annotations
            .into_iter()
            .next()
            .map(|annotation| annotation.description)
            .unwrap_or_default())
    }
}
