//! # Oncoscope
//!
//! Client library for the early cancer-risk prediction API: login,
//! risk prediction, AI chat and medical report upload.
//!
//! ## Modules
//!
//! - [`client`]: HTTP client for the four backend operations
//! - [`session`]: Bearer token storage passed to the client
//! - [`responses`]: Normalization of loosely-shaped response payloads
//! - [`prediction`]: Form coercion for the prediction features
//! - [`chat`]: In-memory conversation with the assistant
//! - [`reports`]: Report files and the analyzed-report list
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oncoscope::{ApiClient, ClientConfig, Credentials, LoginReply, Prediction, Session};
//! use oncoscope::prediction::PredictionForm;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::in_memory();
//!     let client = ApiClient::new(ClientConfig::default(), session.clone())?;
//!
//!     let login = client.login(&Credentials::new("test@example.com", "123456789")).await?;
//!     if let Some(token) = LoginReply::from_value(&login).token() {
//!         session.set_token(token)?;
//!     }
//!
//!     let form = PredictionForm {
//!         diagnosis_age: "45".into(),
//!         mutation_count: "12".into(),
//!         samples_per_patient: "1".into(),
//!         tmb_nonsynonymous: "3.2".into(),
//!         sex: "Male".into(),
//!     };
//!     let payload = client.predict(&form.into_request()?).await?;
//!     let prediction = Prediction::from_value(&payload);
//!
//!     println!("{} ({})", prediction.display, prediction.risk.color());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod prediction;
pub mod reports;
pub mod responses;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export top-level types for convenience
pub use client::{
    ApiClient, ApiError, ApiResult, ChatRequest, ClientConfig, Credentials, PredictionRequest, Sex,
};

pub use session::{FileTokenStore, MemoryTokenStore, Session, SessionError, TokenStore};

pub use responses::{ChatReply, LoginReply, Prediction, ReportAnalysis, Reply, RiskLevel};

pub use chat::{ChatMessage, Conversation, Sender};

pub use reports::{AnalyzedReport, ReportError, ReportFile, ReportKind, ReportShelf};

pub use prediction::{FormError, PredictionForm};

pub use config::{Config, ConfigError, LoggingConfig};
