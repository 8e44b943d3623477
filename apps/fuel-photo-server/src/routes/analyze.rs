//! Photo analysis route
//!
//! Endpoint:
//! - POST /analyze-photos - Store four photos and return the text read from each
//!
//! The body is `multipart/form-data` with one file in each of `plateImage`,
//! `odometerImage`, `fuelPumpImage` and `fuelPumpImage2`.

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};

use crate::analysis::AnalysisResponse;
use crate::error::Result;
use crate::state::AppState;
use crate::upload::{read_photo_set, UploadError};

/// Create the analysis router
pub fn router(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/analyze-photos", post(analyze_photos))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// POST /analyze-photos
async fn analyze_photos(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>> {
    let multipart = multipart.map_err(UploadError::from)?;
    let photos = read_photo_set(multipart, &state.config().upload.temp_dir).await?;

    tracing::debug!(
        bytes = photos.images().iter().map(|image| image.size).sum::<u64>(),
        "Photo set received"
    );

    let response = state.analyzer().analyze(photos).await?;

    Ok(Json(response))
}
