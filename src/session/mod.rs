//! Session Token Storage
//!
//! Holds the bearer token issued at login. The [`Session`] handle is passed
//! to [`ApiClient`](crate::client::ApiClient) at construction and read on
//! every outgoing request.
//!
//! ## Stores
//!
//! - [`MemoryTokenStore`]: process-local, lost on exit
//! - [`FileTokenStore`]: JSON file keyed by [`TOKEN_KEY`], survives restarts

mod store;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Shared handle over a token store
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Wrap an existing store
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Session backed by process memory
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Session backed by a JSON file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileTokenStore::new(path))
    }

    /// Current token, if any.
    ///
    /// A store that cannot be read is treated as holding no token; the
    /// request then goes out unauthenticated.
    pub fn token(&self) -> Option<String> {
        match self.store.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Persist a token, replacing any previous one
    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.store.set(token)
    }

    /// Remove the token
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }

    /// Whether a token is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Errors from token stores
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Corrupt session file {path:?}: {error}")]
    Corrupt { path: PathBuf, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_session_lifecycle() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.set_token("abc").unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));

        let clone = session.clone();
        clone.clear().unwrap();
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::in_memory();
        session.set_token("secret-token").unwrap();

        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("authenticated: true"));
    }

    #[test]
    fn test_unreadable_store_reads_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let session = Session::file(&path);
        assert_eq!(session.token(), None);
    }
}
