//! Local stand-in for the Google token, Storage and Vision endpoints.
//!
//! Every request is recorded; the reply is picked by path prefix.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use fuel_photo_server::auth::{GoogleAuth, ServiceAccountKey};

pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/service_account.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/service_account.pub.pem");
pub const CLIENT_EMAIL: &str = "ocr@frota-demo.iam.gserviceaccount.com";
pub const KEY_ID: &str = "test-key";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct Reply {
    path_prefix: &'static str,
    status: StatusCode,
    body: String,
}

struct StubState {
    replies: Vec<Reply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct GoogleStub {
    pub base_url: String,
    state: Arc<StubState>,
}

pub struct GoogleStubBuilder {
    replies: Vec<Reply>,
}

impl GoogleStubBuilder {
    pub fn reply(mut self, path_prefix: &'static str, status: StatusCode, body: serde_json::Value) -> Self {
        self.replies.push(Reply {
            path_prefix,
            status,
            body: body.to_string(),
        });
        self
    }

    /// Token endpoint handing out `token` for an hour
    pub fn token(self, token: &str) -> Self {
        self.reply(
            "/token",
            StatusCode::OK,
            serde_json::json!({
                "access_token": token,
                "expires_in": 3600,
                "token_type": "Bearer"
            }),
        )
    }

    pub async fn start(self) -> GoogleStub {
        let state = Arc::new(StubState {
            replies: self.replies,
            requests: Mutex::default(),
        });

        let router = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        GoogleStub {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

impl GoogleStub {
    pub fn builder() -> GoogleStubBuilder {
        GoogleStubBuilder { replies: Vec::new() }
    }

    pub fn token_uri(&self) -> String {
        format!("{}/token", self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path_prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(path_prefix))
            .collect()
    }

    /// Credential whose token endpoint is this stub
    pub fn auth(&self) -> Arc<GoogleAuth> {
        let key = ServiceAccountKey::from_json(
            &serde_json::json!({
                "type": "service_account",
                "project_id": "frota-demo",
                "private_key_id": KEY_ID,
                "private_key": PRIVATE_KEY_PEM,
                "client_email": CLIENT_EMAIL,
                "token_uri": self.token_uri(),
            })
            .to_string(),
        )
        .unwrap();
        Arc::new(GoogleAuth::new(key, http_client()).unwrap())
    }
}

/// HTTP client that ignores any proxy configured in the environment
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn handle(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    match state.replies.iter().find(|r| path.starts_with(r.path_prefix)) {
        Some(reply) => (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            reply.body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
