//! Brewnote client core.
//!
//! Pure workflow logic for the coffee-tasting-note client: the session
//! gate, the sign-in/sign-up form, and the note editor with its cascading
//! cafe → coffee selection. Network access goes through the traits in
//! [`collaborators`]; the HTTP implementations live in `brewnote-client`.

pub mod auth_form;
pub mod catalog;
pub mod collaborators;
pub mod error;
pub mod models;
pub mod note_editor;
pub mod session_gate;
pub mod types;
pub mod validation;
