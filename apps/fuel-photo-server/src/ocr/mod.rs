//! OCR Module
//!
//! Reads the text of stored photos through Google Cloud Vision.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fuel_photo_server::ocr::{GoogleVisionProvider, TextRecognizer};
//!
//! let vision = GoogleVisionProvider::new("https://vision.googleapis.com", auth, http);
//! let result = vision
//!     .recognize("https://storage.googleapis.com/arquivo-pdf-e-xml/image_1700000000000.jpg")
//!     .await?;
//! println!("{} -> {}", result.image_url, result.text);
//! ```

mod provider;
mod types;

pub use provider::{GoogleVisionProvider, TextRecognizer};
pub use types::{OcrError, RecognitionResult};
