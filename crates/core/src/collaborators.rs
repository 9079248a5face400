//! Interfaces to the systems the core consumes but does not own.
//!
//! The HTTP implementations live in `brewnote-client`; tests use in-memory
//! fakes. All async methods are object-safe via [`async_trait`] so the
//! state machines can take `&dyn` collaborators. The futures are not
//! `Send`: every workflow runs on one logical task.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{Cafe, Coffee, Note, NotePayload, User};
use crate::types::DbId;

/// Answers "who is the current user, if any?".
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// `Ok(None)` means no session. Callers treat `Err` the same way.
    async fn current_user(&self) -> Result<Option<User>, CoreError>;
}

/// Read interface over the cafe/coffee catalog.
#[async_trait(?Send)]
pub trait CatalogSource {
    async fn cafes(&self) -> Result<Vec<Cafe>, CoreError>;
    async fn coffees(&self) -> Result<Vec<Coffee>, CoreError>;
}

/// Write interface for notes.
#[async_trait(?Send)]
pub trait NoteStore {
    async fn create_note(&self, payload: &NotePayload) -> Result<Note, CoreError>;
    async fn update_note(&self, id: DbId, payload: &NotePayload) -> Result<Note, CoreError>;
}

/// Moves the surrounding application to another screen.
pub trait Navigator {
    fn navigate_to(&self, path: &str);
}
