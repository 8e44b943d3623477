//! Photo analysis
//!
//! Ties storage and OCR together for one request's photo set.

mod pipeline;

pub use pipeline::{AnalysisError, AnalysisResponse, PhotoAnalyzer};
