//! Photo Upload Module
//!
//! Receives the four photos of an analysis request:
//! - Named multipart fields mapped to image roles
//! - Each field streamed to its own temporary file
//! - Temporary files removed when the owning value is dropped

pub mod multipart;
pub mod temp_file;
pub mod types;

pub use multipart::read_photo_set;
pub use temp_file::TempImage;
pub use types::*;
