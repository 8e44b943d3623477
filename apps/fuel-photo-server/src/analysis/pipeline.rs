//! Photo analysis pipeline
//!
//! Each photo is uploaded and then read back through OCR. The four photos are
//! processed concurrently; the first failure cancels the others.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::ocr::{OcrError, RecognitionResult, TextRecognizer};
use crate::storage::ObjectStore;
use crate::upload::{ImageRole, PhotoSet, UploadedImage};

/// Response body of a successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub plate_info: RecognitionResult,
    pub odometer_info: RecognitionResult,
    pub fuel_pump_info: RecognitionResult,
    pub fuel_pump2_info: RecognitionResult,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Failed to store {role}: {source}")]
    Storage { role: ImageRole, source: StorageError },

    #[error("Failed to read text from {role}: {source}")]
    Ocr { role: ImageRole, source: OcrError },

    #[error("{stage} of {role} timed out")]
    Timeout {
        role: ImageRole,
        stage: &'static str,
    },
}

/// Uploads and reads the photos of one request
#[derive(Clone)]
pub struct PhotoAnalyzer {
    store: Arc<dyn ObjectStore>,
    recognizer: Arc<dyn TextRecognizer>,
    call_timeout: Duration,
}

impl PhotoAnalyzer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        recognizer: Arc<dyn TextRecognizer>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            store,
            recognizer,
            call_timeout,
        }
    }

    /// Analyze all four photos.
    ///
    /// The photo set is consumed: its temporary files are gone once this
    /// returns, whatever the outcome.
    pub async fn analyze(&self, photos: PhotoSet) -> Result<AnalysisResponse, AnalysisError> {
        let (plate_info, odometer_info, fuel_pump_info, fuel_pump2_info) = tokio::try_join!(
            self.analyze_image(&photos.plate),
            self.analyze_image(&photos.odometer),
            self.analyze_image(&photos.fuel_pump),
            self.analyze_image(&photos.fuel_pump_2),
        )?;

        Ok(AnalysisResponse {
            plate_info,
            odometer_info,
            fuel_pump_info,
            fuel_pump2_info,
        })
    }

    async fn analyze_image(&self, image: &UploadedImage) -> Result<RecognitionResult, AnalysisError> {
        let role = image.role;

        let stored = self
            .bounded(role, "upload", self.store.upload(image.path()))
            .await?
            .map_err(|source| AnalysisError::Storage { role, source })?;

        let result = self
            .bounded(role, "text detection", self.recognizer.recognize(&stored.public_url))
            .await?
            .map_err(|source| AnalysisError::Ocr { role, source })?;

        tracing::info!(
            role = %role,
            object = %stored.object_name,
            chars = result.text.chars().count(),
            "Image analyzed"
        );

        Ok(result)
    }

    async fn bounded<F: Future>(
        &self,
        role: ImageRole,
        stage: &'static str,
        call: F,
    ) -> Result<F::Output, AnalysisError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| AnalysisError::Timeout { role, stage })
    }
}
