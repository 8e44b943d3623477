//! Error types for the fuel photo server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::auth::AuthError;
use crate::upload::UploadError;

/// Message returned for every server-side failure. Details stay in the logs.
pub const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro ao processar as imagens.";

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Cloud Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Failed to read local file {path}: {source}")]
    LocalRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Storage rejected upload of {object} ({status}): {body}")]
    Rejected {
        object: String,
        status: u16,
        body: String,
    },
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upload(e) => e.status_code(),
            AppError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            tracing::warn!("Rejected request: {}", self);
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
