//! Field rules for the note form.
//!
//! Each field has one predicate returning the first rule it breaks, and
//! [`validate`] composes them into a [`FieldErrors`] for submit gating.

use serde::Serialize;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single broken rule. `Display` is the message shown under the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    #[error("Rating must be at least 1")]
    RatingTooLow,
    #[error("Rating must be at most 5")]
    RatingTooHigh,
    #[error("Must enter a comment")]
    CommentMissing,
    #[error("Comment should be less than 500 characters")]
    CommentTooLong,
    #[error("Must select a coffee")]
    CoffeeMissing,
    /// The chosen coffee is not offered by the selected cafe.
    #[error("Selected coffee is not available at this cafe")]
    CoffeeUnavailable,
}

/// The note form fields that carry validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteField {
    CoffeeId,
    Rating,
    Comment,
}

impl NoteField {
    /// Display order of the fields on the form.
    pub const ALL: [NoteField; 3] = [NoteField::CoffeeId, NoteField::Rating, NoteField::Comment];
}

/// Per-field outcome of [`validate`]; `None` means the field passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub coffee_id: Option<FieldError>,
    pub rating: Option<FieldError>,
    pub comment: Option<FieldError>,
}

impl FieldErrors {
    pub fn get(&self, field: NoteField) -> Option<FieldError> {
        match field {
            NoteField::CoffeeId => self.coffee_id,
            NoteField::Rating => self.rating,
            NoteField::Comment => self.comment,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coffee_id.is_none() && self.rating.is_none() && self.comment.is_none()
    }

    /// First failing field in form order.
    pub fn first(&self) -> Option<(NoteField, FieldError)> {
        NoteField::ALL
            .into_iter()
            .find_map(|field| self.get(field).map(|err| (field, err)))
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

pub fn check_rating(rating: i32) -> Result<i32, FieldError> {
    if rating < MIN_RATING {
        Err(FieldError::RatingTooLow)
    } else if rating > MAX_RATING {
        Err(FieldError::RatingTooHigh)
    } else {
        Ok(rating)
    }
}

/// Length is counted in characters, not bytes.
pub fn check_comment(comment: &str) -> Result<(), FieldError> {
    if comment.is_empty() {
        return Err(FieldError::CommentMissing);
    }
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(FieldError::CommentTooLong);
    }
    Ok(())
}

pub fn check_coffee(coffee_id: Option<DbId>) -> Result<DbId, FieldError> {
    coffee_id.ok_or(FieldError::CoffeeMissing)
}

/// Evaluate every field rule.
pub fn validate(coffee_id: Option<DbId>, rating: i32, comment: &str) -> FieldErrors {
    FieldErrors {
        coffee_id: check_coffee(coffee_id).err(),
        rating: check_rating(rating).err(),
        comment: check_comment(comment).err(),
    }
}

// ---------------------------------------------------------------------------
// Rating labels
// ---------------------------------------------------------------------------

/// Human label for a rating value; empty for anything outside 1..=5.
pub fn rating_label(rating: i32) -> &'static str {
    match rating {
        1 => "Poor",
        2 => "Fair",
        3 => "Good",
        4 => "Very Good",
        5 => "Excellent",
        _ => "",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
