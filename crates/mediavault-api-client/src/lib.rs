//! Session-aware HTTP client for the mediavault backend.
//!
//! Provides a single client with bearer auth read from the session store on
//! every request, envelope-aware error classification, central 401 handling
//! with loop-free login redirects, and domain methods (login, batch upload,
//! providers, lists, stats). The CLI uses this client directly.

pub mod api;
pub mod batch;
pub mod guard;
pub mod navigator;
pub mod session;
pub mod storage;
pub mod uploader;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use mediavault_core::models::ErrorEnvelope;
use mediavault_core::{ClientConfig, VaultError};

use crate::navigator::Navigator;
use crate::storage::StateStore;

/// HTTP client for the mediavault backend.
///
/// Cloning is cheap; clones share the session store and navigator, so a 401
/// observed by any clone invalidates the session for all of them.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    session: SessionStore,
    navigator: Arc<Navigator>,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        session: SessionStore,
        navigator: Arc<Navigator>,
    ) -> Result<Self, VaultError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VaultError::Internal {
                message: "Failed to create HTTP client".to_string(),
                source: e.into(),
            })?;

        Ok(Self {
            client,
            config,
            session,
            navigator,
        })
    }

    /// Create a client from the environment (MEDIAVAULT_API_URL or API_URL),
    /// restoring any persisted session from the default state directory.
    pub fn from_env() -> Result<Self, VaultError> {
        let config = ClientConfig::from_env();
        let session = SessionStore::new(StateStore::open_default()?);
        session.restore();
        let navigator = Arc::new(Navigator::new(config.base_path.clone()));
        Self::new(config, session, navigator)
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Attach the bearer token if one is present. The token is read from the
    /// session store here, per request, so mutations are always visible.
    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET request with optional query parameters. Deserializes the JSON body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, VaultError> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request);

        if !query.is_empty() {
            request = request.query(query);
        }

        self.execute(request).await
    }

    /// POST a JSON body and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, VaultError> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);
        self.execute(request).await
    }

    /// POST a multipart form with an upload-length deadline.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, VaultError> {
        let url = self.build_url(path);
        let request = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(Duration::from_secs(self.config.upload_timeout_secs));
        let request = self.apply_auth(request);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, VaultError> {
        let response = request.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(self.handle_unauthorized(response).await);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaultError::Server {
                status_code: status.as_u16(),
                message: envelope_message(&body)
                    .unwrap_or_else(|| fallback_message(status.as_u16(), &body)),
            });
        }

        response.json::<T>().await.map_err(|e| VaultError::Server {
            status_code: status.as_u16(),
            message: format!("Failed to parse response body: {}", e),
        })
    }

    /// Central 401 handler: clears the session and records a single login
    /// redirect, then re-surfaces the failure so the calling operation can
    /// still show a contextual message.
    async fn handle_unauthorized(&self, response: reqwest::Response) -> VaultError {
        self.session.logout();
        self.navigator.handle_unauthorized();

        let body = response.text().await.unwrap_or_default();
        let message =
            envelope_message(&body).unwrap_or_else(|| "Session is no longer valid".to_string());
        VaultError::SessionExpired(message)
    }
}

/// Extract the backend's human-readable message from an error envelope body,
/// so downstream callers never see transport-layer wording.
fn envelope_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|env| env.message)
        .filter(|m| !m.is_empty())
}

fn fallback_message(status_code: u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP {}", status_code)
    } else {
        body.trim().to_string()
    }
}

/// Classify a response-less transport failure: a client-side deadline is a
/// timeout, everything else without a response is a network failure.
fn classify_transport_error(e: reqwest::Error) -> VaultError {
    if e.is_timeout() {
        VaultError::Timeout(e.to_string())
    } else {
        VaultError::Network(e.to_string())
    }
}

// Re-export the pieces callers use most.
pub use batch::{encode, BatchField, EncodedBatch, FieldValue};
pub use guard::{decide, NavDecision, RouteTarget};
pub use navigator::{login_redirect, PendingRedirect};
pub use session::SessionStore;
pub use uploader::ClientUploader;
