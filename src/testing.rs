//! In-process backend used by client tests.
//!
//! Binds an axum server to an ephemeral local port, records every request
//! it receives and answers with canned replies per path.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Canned response
#[derive(Debug, Clone)]
pub enum Reply {
    Json(StatusCode, Value),
    Text(StatusCode, String),
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Reply::Json(status, body)
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Reply::Text(status, body.to_string())
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(status, body) => (status, Json(body)).into_response(),
            Reply::Text(status, body) => (status, body).into_response(),
        }
    }
}

/// A request as seen by the backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

struct Shared {
    replies: HashMap<String, Reply>,
    fallback: Option<Reply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockBackend {
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl MockBackend {
    /// Answer every path with `reply`
    pub async fn start(reply: Reply) -> Self {
        Self::spawn(HashMap::new(), Some(reply)).await
    }

    /// Answer listed paths only; anything else gets 404 `{"detail": "Not Found"}`
    pub async fn with_routes(routes: Vec<(&str, Reply)>) -> Self {
        let replies = routes
            .into_iter()
            .map(|(path, reply)| (path.to_string(), reply))
            .collect();
        Self::spawn(replies, None).await
    }

    async fn spawn(replies: HashMap<String, Reply>, fallback: Option<Reply>) -> Self {
        let shared = Arc::new(Shared {
            replies,
            fallback,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(record)
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, shared }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.shared.requests.lock().unwrap().len()
    }
}

async fn record(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    shared.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    shared
        .replies
        .get(uri.path())
        .or(shared.fallback.as_ref())
        .cloned()
        .unwrap_or_else(|| Reply::json(StatusCode::NOT_FOUND, json!({"detail": "Not Found"})))
        .into_response()
}
