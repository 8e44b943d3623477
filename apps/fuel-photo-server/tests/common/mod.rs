//! Shared fixtures: an in-memory bucket, a scripted OCR service and a stub of
//! the Google endpoints.

#![allow(dead_code)]

pub mod google_stub;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tempfile::TempDir;

use fuel_photo_server::analysis::PhotoAnalyzer;
use fuel_photo_server::config::Config;
use fuel_photo_server::error::StorageError;
use fuel_photo_server::ocr::{OcrError, RecognitionResult, TextRecognizer};
use fuel_photo_server::state::AppState;
use fuel_photo_server::storage::{ObjectNamer, ObjectStore, StoredImage};

pub const BUCKET: &str = "arquivo-pdf-e-xml";
pub const PUBLIC_BASE: &str = "https://storage.googleapis.com";

/// SOI/APP0 header followed by filler; content is never inspected
pub fn fake_jpeg(fill: u8) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    bytes.extend(std::iter::repeat(fill).take(128));
    bytes.extend([0xFF, 0xD9]);
    bytes
}

/// Bucket kept in memory
#[derive(Default)]
pub struct MemoryBucket {
    namer: ObjectNamer,
    pub objects: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail: bool,
}

impl MemoryBucket {
    /// Bucket that refuses every upload
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryBucket {
    async fn upload(&self, local_path: &Path) -> Result<StoredImage, StorageError> {
        if self.fail {
            return Err(StorageError::Rejected {
                object: "image_0.jpg".to_string(),
                status: 403,
                body: "caller does not have storage.objects.create access".to_string(),
            });
        }

        let data = tokio::fs::read(local_path)
            .await
            .map_err(|source| StorageError::LocalRead {
                path: local_path.display().to_string(),
                source,
            })?;
        let stored = StoredImage::new(PUBLIC_BASE, BUCKET, self.namer.next_name());
        self.objects
            .lock()
            .unwrap()
            .push((stored.object_name.clone(), data));
        Ok(stored)
    }
}

/// OCR service answering with a fixed text
pub struct ScriptedVision {
    pub text: String,
    pub fail: bool,
}

impl ScriptedVision {
    pub fn blank() -> Self {
        Self {
            text: String::new(),
            fail: false,
        }
    }

    pub fn reading(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            text: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl TextRecognizer for ScriptedVision {
    async fn recognize(&self, image_url: &str) -> Result<RecognitionResult, OcrError> {
        if self.fail {
            return Err(OcrError::Api {
                status: 500,
                body: "internal".to_string(),
            });
        }
        Ok(RecognitionResult {
            text: self.text.clone(),
            image_url: image_url.to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub bucket: Arc<MemoryBucket>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn new(bucket: MemoryBucket, vision: ScriptedVision) -> Self {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.upload.temp_dir = temp_dir.path().join("uploads");

        let bucket = Arc::new(bucket);
        let analyzer = PhotoAnalyzer::new(bucket.clone(), Arc::new(vision), Duration::from_secs(5));
        let router = fuel_photo_server::app(AppState::new(config, analyzer));

        Self {
            router,
            bucket,
            temp_dir,
        }
    }

    /// Files left behind in the upload directory
    pub fn leftover_files(&self) -> usize {
        match std::fs::read_dir(self.temp_dir.path().join("uploads")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}
