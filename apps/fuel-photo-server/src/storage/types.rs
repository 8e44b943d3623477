//! Storage types

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Content type every stored photo is uploaded with
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// A photo written to the bucket
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub object_name: String,
    pub bucket: String,
    pub public_url: String,
}

impl StoredImage {
    pub fn new(public_base_url: &str, bucket: &str, object_name: String) -> Self {
        Self {
            public_url: public_url(public_base_url, bucket, &object_name),
            bucket: bucket.to_string(),
            object_name,
        }
    }
}

/// Canonical public URL of an object: `<base>/<bucket>/<object>`
pub fn public_url(public_base_url: &str, bucket: &str, object_name: &str) -> String {
    format!(
        "{}/{}/{}",
        public_base_url.trim_end_matches('/'),
        bucket,
        object_name
    )
}

/// Generates `image_<epochMillis>.jpg` object names.
///
/// The millisecond stamp never repeats within one namer: when two names are
/// requested in the same millisecond the second one is bumped forward.
#[derive(Debug, Default)]
pub struct ObjectNamer {
    last_millis: AtomicI64,
}

impl ObjectNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&self) -> String {
        format!("image_{}.jpg", self.next_millis(Utc::now().timestamp_millis()))
    }

    fn next_millis(&self, now: i64) -> i64 {
        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}
