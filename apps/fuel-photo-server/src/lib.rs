//! Fuel Photo Server Library
//!
//! Stores refuelling photos (plate, odometer, two fuel pumps) in Google Cloud
//! Storage and reads them back with Cloud Vision text detection.
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `upload`: Multipart intake into request-scoped temporary files
//! - `storage`: Cloud Storage uploads
//! - `ocr`: Cloud Vision text detection
//! - `analysis`: Concurrent upload-then-read pipeline per photo

pub mod analysis;
pub mod auth;
pub mod config;
pub mod error;
pub mod ocr;
pub mod routes;
pub mod state;
pub mod storage;
pub mod upload;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use analysis::PhotoAnalyzer;
use auth::{AuthError, GoogleAuth};
use config::Config;
use ocr::GoogleVisionProvider;
use state::AppState;
use storage::GcsClient;

/// Build the HTTP application
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/health", routes::health::router())
        .merge(routes::analyze::router(state.config().upload.max_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Wire the Google clients into application state
pub async fn build_state(config: Config) -> Result<AppState, AuthError> {
    let http = reqwest::Client::new();
    let auth = Arc::new(GoogleAuth::from_key_file(&config.google.key_file, http.clone()).await?);

    let store = GcsClient::new(&config.storage, auth.clone(), http.clone());
    let vision = GoogleVisionProvider::new(&config.google.vision_base_url, auth, http);

    let analyzer = PhotoAnalyzer::new(
        Arc::new(store),
        Arc::new(vision),
        config.upload.call_timeout(),
    );

    Ok(AppState::new(config, analyzer))
}
