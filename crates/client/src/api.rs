//! REST API client for the notes server.
//!
//! Wraps the session, catalog and note endpoints using [`reqwest`]. The
//! underlying client keeps a cookie store so the server-side session set
//! by `/login` or `/signup` is sent on every later request.

use std::time::Duration;

use serde::Deserialize;

use brewnote_core::models::{Cafe, Coffee, Credentials, Note, NotePayload, User};
use brewnote_core::types::DbId;

use crate::config::ClientConfig;

/// HTTP client for one notes server.
#[derive(Debug, Clone)]
pub struct BrewnoteApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Brewnote API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's `error` message, or the raw body if it had none.
        message: String,
    },
}

impl ApiError {
    /// The text to show a user: the server's own message when there is one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Request(e) => e.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Error body shape used by every server endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl BrewnoteApi {
    /// Build a client from configuration, with a cookie store and the
    /// configured request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- session ----

    /// `GET /check_session`. A 401 means nobody is signed in.
    pub async fn check_session(&self) -> Result<Option<User>, ApiError> {
        let response = self.client.get(self.url("/check_session")).send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Self::parse_response(response).await.map(Some)
    }

    /// `POST /login`.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `POST /signup`.
    pub async fn signup(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url("/signup"))
            .json(credentials)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `DELETE /logout`.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.client.delete(self.url("/logout")).send().await?;
        Self::check_status(response).await
    }

    /// Where to send the browser for the GitHub OAuth hand-off.
    pub fn github_auth_url(&self) -> String {
        self.url("/auth/github")
    }

    // ---- catalog ----

    /// `GET /cafes`.
    pub async fn list_cafes(&self) -> Result<Vec<Cafe>, ApiError> {
        let response = self.client.get(self.url("/cafes")).send().await?;
        Self::parse_response(response).await
    }

    /// `GET /coffees`.
    pub async fn list_coffees(&self) -> Result<Vec<Coffee>, ApiError> {
        let response = self.client.get(self.url("/coffees")).send().await?;
        Self::parse_response(response).await
    }

    // ---- notes ----

    /// `GET /notes`: the signed-in user's notes.
    pub async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        let response = self.client.get(self.url("/notes")).send().await?;
        Self::parse_response(response).await
    }

    /// `POST /notes`.
    pub async fn create_note(&self, payload: &NotePayload) -> Result<Note, ApiError> {
        let response = self
            .client
            .post(self.url("/notes"))
            .json(payload)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `PATCH /notes/{id}`.
    pub async fn update_note(&self, id: DbId, payload: &NotePayload) -> Result<Note, ApiError> {
        let response = self
            .client
            .patch(self.note_url(id))
            .json(payload)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `DELETE /notes/{id}`.
    pub async fn delete_note(&self, id: DbId) -> Result<(), ApiError> {
        let response = self.client.delete(self.note_url(id)).send().await?;
        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn note_url(&self, id: DbId) -> String {
        format!("{}/notes/{}", self.api_url, id)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] carrying the
    /// server's error message on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Pull the `error` field out of a server error body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
