//! Storage module for Google Cloud Storage
//!
//! Photos are written once and never overwritten or deleted here.

mod gcs_client;
mod types;

pub use gcs_client::{GcsClient, ObjectStore};
pub use types::*;
