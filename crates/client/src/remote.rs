//! [`BrewnoteApi`] as the core's identity, catalog and note collaborators.

use async_trait::async_trait;

use brewnote_core::auth_form::AuthMode;
use brewnote_core::collaborators::{CatalogSource, IdentityProvider, NoteStore};
use brewnote_core::error::CoreError;
use brewnote_core::models::{Cafe, Coffee, Credentials, Note, NotePayload, User};
use brewnote_core::types::DbId;

use crate::api::{ApiError, BrewnoteApi};

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        if let ApiError::Request(e) = &err {
            if e.is_decode() {
                return CoreError::Internal(format!("Unexpected response body: {e}"));
            }
        }
        match err.status() {
            Some(401 | 403) => CoreError::Unauthorized(err.user_message()),
            Some(422) => CoreError::Validation(err.user_message()),
            _ => CoreError::Remote(err.to_string()),
        }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for BrewnoteApi {
    async fn current_user(&self) -> Result<Option<User>, CoreError> {
        Ok(self.check_session().await?)
    }
}

#[async_trait(?Send)]
impl CatalogSource for BrewnoteApi {
    async fn cafes(&self) -> Result<Vec<Cafe>, CoreError> {
        Ok(self.list_cafes().await?)
    }

    async fn coffees(&self) -> Result<Vec<Coffee>, CoreError> {
        Ok(self.list_coffees().await?)
    }
}

#[async_trait(?Send)]
impl NoteStore for BrewnoteApi {
    async fn create_note(&self, payload: &NotePayload) -> Result<Note, CoreError> {
        Ok(BrewnoteApi::create_note(self, payload).await?)
    }

    async fn update_note(&self, id: DbId, payload: &NotePayload) -> Result<Note, CoreError> {
        Ok(BrewnoteApi::update_note(self, id, payload).await?)
    }
}

/// Perform the login or sign-up the auth form asked for.
pub async fn authenticate(
    api: &BrewnoteApi,
    mode: AuthMode,
    credentials: &Credentials,
) -> Result<User, ApiError> {
    tracing::info!(username = %credentials.username, ?mode, "Authenticating");
    match mode {
        AuthMode::SignIn => api.login(credentials).await,
        AuthMode::SignUp => api.signup(credentials).await,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn api_error(status: u16, message: &str) -> ApiError {
        ApiError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn unauthorized_keeps_server_message() {
        let err = CoreError::from(api_error(401, "Invalid username or password"));
        assert_matches!(err, CoreError::Unauthorized(msg) if msg == "Invalid username or password");
    }

    #[test]
    fn unprocessable_maps_to_validation() {
        let err = CoreError::from(api_error(422, "Username already exists"));
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn other_statuses_are_remote() {
        let err = CoreError::from(api_error(500, "Failed to create account"));
        assert_matches!(err, CoreError::Remote(msg) if msg.contains("500"));

        let err = CoreError::from(api_error(404, "Note not found"));
        assert_matches!(err, CoreError::Remote(_));
    }
}
