//! Google Cloud authentication
//!
//! Turns a service-account key file into OAuth2 bearer tokens shared by the
//! storage and OCR clients.

mod service_account;

pub use service_account::{
    AssertionClaims, AuthError, GoogleAuth, ServiceAccountKey, CLOUD_PLATFORM_SCOPE,
};
