//! Prediction API HTTP client

use super::dto::{ChatRequest, Credentials, PredictionRequest};
use super::error::{ApiError, ApiResult};
use crate::reports::ReportFile;
use crate::session::{Session, SessionError};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Demo account accepted without contacting the backend
pub const DEMO_EMAIL: &str = "test@example.com";
/// Password of the demo account
pub const DEMO_PASSWORD: &str = "123456789";
/// Token handed out for the demo account
pub const DEMO_TOKEN: &str = "mock_jwt_token_for_testing";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds; `None` keeps the reqwest default
    pub request_timeout_ms: Option<u64>,
    /// Accept the demo account locally. Test-only seam, not authentication.
    pub demo_login: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: None,
            demo_login: true,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Body of an outgoing request
enum RequestBody {
    Json(Value),
    Multipart(Form),
}

/// Client for the prediction API
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    session: Session,
}

impl ApiClient {
    /// Create a client that authenticates with `session`
    pub fn new(mut config: ClientConfig, session: Session) -> ApiResult<Self> {
        let mut builder = Client::builder().user_agent(concat!("oncoscope/", env!("CARGO_PKG_VERSION")));
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build().map_err(ApiError::transport)?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            config,
            session,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session consulted on every request
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Log in and return the raw response body.
    ///
    /// The token is not persisted here; see
    /// [`LoginReply`](crate::responses::LoginReply) for extracting it.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<Value> {
        if self.config.demo_login
            && credentials.email == DEMO_EMAIL
            && credentials.password == DEMO_PASSWORD
        {
            tracing::warn!("Demo credentials accepted locally; no request sent");
            return Ok(json!({ "token": DEMO_TOKEN }));
        }

        self.request(Method::POST, "/login", Self::json_body(credentials)?)
            .await
    }

    /// Remove the stored token.
    ///
    /// Requests already in flight keep the token they were sent with.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.clear()?;
        tracing::info!("Session token removed");
        Ok(())
    }

    /// Submit features for a risk prediction
    pub async fn predict(&self, features: &PredictionRequest) -> ApiResult<Value> {
        self.request(Method::POST, "/predict", Self::json_body(features)?)
            .await
    }

    /// Ask the assistant a question
    pub async fn chat(&self, payload: &ChatRequest) -> ApiResult<Value> {
        self.request(Method::POST, "/chat", Self::json_body(payload)?)
            .await
    }

    /// Upload a report file as multipart field `file`.
    ///
    /// Files over the upload limit fail without a network call.
    pub async fn upload_report(&self, file: &ReportFile) -> ApiResult<Value> {
        file.check_size().map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.content_type())
            .map_err(ApiError::transport)?;
        let form = Form::new().part("file", part);

        self.request(Method::POST, "/upload", RequestBody::Multipart(form))
            .await
    }

    fn json_body<T: Serialize>(body: &T) -> ApiResult<RequestBody> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::RequestFailed(format!("Failed to encode request: {}", e)))
    }

    /// Send one request and decode the JSON response.
    ///
    /// Single attempt. Multipart bodies get their Content-Type (with
    /// boundary) from reqwest.
    async fn request(&self, method: Method, endpoint: &str, body: RequestBody) -> ApiResult<Value> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let token = self.session.token();

        tracing::debug!(
            method = %method,
            path = %endpoint,
            authenticated = token.is_some(),
            "Sending API request"
        );

        let mut builder = self.http.request(method, &url);
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }
        builder = match body {
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path = %endpoint, error = %e, "API request failed");
            ApiError::transport(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::transport)?;

        if !status.is_success() {
            let err = ApiError::from_status(status, &bytes);
            tracing::warn!(
                path = %endpoint,
                status = status.as_u16(),
                error = %err,
                "API returned error status"
            );
            return Err(err);
        }

        serde_json::from_slice(&bytes).map_err(ApiError::decode)
    }
}
