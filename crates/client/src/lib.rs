//! `brewnote-client` library crate.
//!
//! HTTP implementations of the `brewnote-core` collaborators plus client
//! configuration. The `brewnote` binary entrypoint lives in `main.rs`.

pub mod api;
pub mod config;
pub mod remote;

pub use api::{ApiError, BrewnoteApi};
pub use config::{ClientConfig, ConfigError, LoginSettings, NoteSettings};
