//! Records exchanged with the notes server.
//!
//! The core reads [`Cafe`], [`Coffee`] and [`User`] records but never
//! mutates them. [`Note`] is the server-confirmed shape of a tasting note;
//! the in-progress form state lives in [`crate::note_editor`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// An authenticated account. Only its presence matters to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_oauth_user: bool,
}

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

/// A venue serving coffees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cafe {
    pub id: DbId,
    pub name: String,
    pub location: String,
}

impl Cafe {
    /// Option label shown in the cafe picker, e.g. `"Blue Bottle - Oakland"`.
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.name, self.location)
    }
}

/// A coffee product belonging to exactly one [`Cafe`].
///
/// The server may send the owning cafe either as a flat `cafe_id` or as a
/// nested `cafe` object; both decode into [`Coffee::cafe_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CoffeeRecord")]
pub struct Coffee {
    pub id: DbId,
    pub name: String,
    pub cafe_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Wire shape accepted when decoding a [`Coffee`].
#[derive(Deserialize)]
struct CoffeeRecord {
    id: DbId,
    name: String,
    #[serde(default)]
    cafe_id: Option<DbId>,
    #[serde(default)]
    cafe: Option<CafeRef>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct CafeRef {
    id: DbId,
}

impl TryFrom<CoffeeRecord> for Coffee {
    type Error = String;

    fn try_from(record: CoffeeRecord) -> Result<Self, Self::Error> {
        let cafe_id = record
            .cafe_id
            .or(record.cafe.map(|c| c.id))
            .ok_or_else(|| format!("Coffee {} has neither cafe_id nor cafe", record.id))?;
        Ok(Self {
            id: record.id,
            name: record.name,
            cafe_id,
            description: record.description,
        })
    }
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// A persisted tasting note as confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: DbId,
    pub coffee_id: DbId,
    pub rating: i32,
    pub comment: String,
    /// The rated coffee, when the server embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coffee: Option<Coffee>,
}

/// Body of a note create or update request.
///
/// The same shape is sent for both; an update is addressed by the note id
/// in the request path instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
    pub rating: i32,
    pub comment: String,
    pub coffee_id: DbId,
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Username and password gathered by the auth screen.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
