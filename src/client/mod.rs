//! Prediction API Client
//!
//! REST client for the cancer-risk prediction backend.
//!
//! ## Endpoints
//!
//! - `POST /login` - Exchange credentials for a bearer token
//! - `POST /predict` - Risk prediction from five clinical features
//! - `POST /chat` - AI assistant question, optionally about an uploaded image
//! - `POST /upload` - Multipart report upload for analysis
//!
//! Every call is a single attempt. The token from the client's
//! [`Session`](crate::session::Session) is attached as a bearer credential
//! when present, and every failure surfaces as [`ApiError::RequestFailed`].

mod dto;
mod error;
mod http;

pub use dto::{ChatRequest, Credentials, PredictionRequest, Sex};
pub use error::{ApiError, ApiResult};
pub use http::{ApiClient, ClientConfig, DEMO_EMAIL, DEMO_PASSWORD, DEMO_TOKEN};
