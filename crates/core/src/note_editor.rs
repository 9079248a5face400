//! Note authoring form: cascading cafe → coffee selection, per-field
//! validation, and create/update submission.
//!
//! [`NoteEditor`] is an explicit state machine. Every mutation recomputes
//! the field errors through [`validation::validate`]; nothing is derived
//! lazily. Submission is split into [`NoteEditor::begin_submit`] and
//! [`NoteEditor::finish_submit`] so an event loop can hold the request in
//! flight between them, with [`NoteEditor::submit`] combining both for
//! callers that simply await the store.
//!
//! On top of the per-field rules, the editor checks the selected coffee
//! against the catalog: a coffee not served by the selected cafe (or any
//! coffee with no cafe selected) fails with
//! [`FieldError::CoffeeUnavailable`].

use std::fmt;

use crate::catalog::{Catalog, CoffeeOptions};
use crate::collaborators::{Navigator, NoteStore};
use crate::error::CoreError;
use crate::models::{Note, NotePayload};
use crate::types::DbId;
use crate::validation::{self, FieldError, FieldErrors, NoteField};

/// Rating a fresh draft starts with.
pub const DEFAULT_RATING: i32 = 3;

/// Where the "can't find your cafe or coffee?" affordance leads.
pub const ADD_CATALOG_ENTRY_PATH: &str = "/cafes";

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// The in-memory, not yet persisted note values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub coffee_id: Option<DbId>,
    pub rating: i32,
    pub comment: String,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            coffee_id: None,
            rating: DEFAULT_RATING,
            comment: String::new(),
        }
    }
}

impl NoteDraft {
    /// Seed a draft from a persisted note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            coffee_id: Some(note.coffee_id),
            rating: note.rating,
            comment: note.comment.clone(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        validation::validate(self.coffee_id, self.rating, &self.comment)
    }

    /// Build the wire payload, or return every failing field.
    pub fn to_payload(&self) -> Result<NotePayload, FieldErrors> {
        match (
            validation::check_coffee(self.coffee_id),
            validation::check_rating(self.rating),
            validation::check_comment(&self.comment),
        ) {
            (Ok(coffee_id), Ok(rating), Ok(())) => Ok(NotePayload {
                rating,
                comment: self.comment.clone(),
                coffee_id,
            }),
            _ => Err(self.validate()),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission types
// ---------------------------------------------------------------------------

/// Which persistence path this editor instance uses. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update { note_id: DbId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Editing,
    /// A create/update request is in flight; further submits are refused.
    Submitting,
}

/// A validated request ready to hand to a [`NoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub mode: SubmitMode,
    pub payload: NotePayload,
}

/// Why a submit attempt was refused without contacting the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitBlocked {
    #[error("Note has invalid fields")]
    Invalid(FieldErrors),
    #[error("A save is already in progress")]
    InFlight,
}

/// Result of a request that reached the store.
#[derive(Debug)]
pub enum SubmitOutcome {
    Saved(Note),
    /// The store failed; the draft is untouched so the user can retry.
    Failed(CoreError),
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Hooks the editor invokes outward.
pub struct EditorCallbacks {
    on_note_added: Box<dyn FnMut(&Note)>,
    on_cancel: Option<Box<dyn FnMut()>>,
}

impl EditorCallbacks {
    pub fn new(on_note_added: impl FnMut(&Note) + 'static) -> Self {
        Self {
            on_note_added: Box::new(on_note_added),
            on_cancel: None,
        }
    }

    /// Supply a close hook. It runs on cancel and after every successful save.
    pub fn with_cancel(mut self, on_cancel: impl FnMut() + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }
}

impl fmt::Debug for EditorCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorCallbacks")
            .field("has_cancel", &self.on_cancel.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Touched {
    coffee_id: bool,
    rating: bool,
    comment: bool,
}

impl Touched {
    fn mark(&mut self, field: NoteField) {
        match field {
            NoteField::CoffeeId => self.coffee_id = true,
            NoteField::Rating => self.rating = true,
            NoteField::Comment => self.comment = true,
        }
    }

    fn get(self, field: NoteField) -> bool {
        match field {
            NoteField::CoffeeId => self.coffee_id,
            NoteField::Rating => self.rating,
            NoteField::Comment => self.comment,
        }
    }
}

/// Form state for creating or editing one note.
#[derive(Debug)]
pub struct NoteEditor<'c> {
    catalog: &'c Catalog,
    mode: SubmitMode,
    selected_cafe: Option<DbId>,
    draft: NoteDraft,
    errors: FieldErrors,
    touched: Touched,
    submit_attempted: bool,
    phase: EditorPhase,
    callbacks: EditorCallbacks,
}

impl<'c> NoteEditor<'c> {
    /// Open the editor. Supplying `existing` selects the update path for
    /// the lifetime of this instance.
    pub fn new(catalog: &'c Catalog, existing: Option<&Note>, callbacks: EditorCallbacks) -> Self {
        let (mode, draft, selected_cafe) = match existing {
            Some(note) => {
                let cafe = note
                    .coffee
                    .as_ref()
                    .map(|c| c.cafe_id)
                    .or_else(|| catalog.coffee(note.coffee_id).map(|c| c.cafe_id));
                (
                    SubmitMode::Update { note_id: note.id },
                    NoteDraft::from_note(note),
                    cafe,
                )
            }
            None => (SubmitMode::Create, NoteDraft::default(), None),
        };
        let mut editor = Self {
            catalog,
            mode,
            selected_cafe,
            draft,
            errors: FieldErrors::default(),
            touched: Touched::default(),
            submit_attempted: false,
            phase: EditorPhase::Editing,
            callbacks,
        };
        editor.revalidate();
        editor
    }

    // ---- read accessors ----

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn mode(&self) -> SubmitMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, SubmitMode::Update { .. })
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn selected_cafe(&self) -> Option<DbId> {
        self.selected_cafe
    }

    pub fn coffee_options(&self) -> CoffeeOptions<'c> {
        self.catalog.coffee_options(self.selected_cafe)
    }

    /// All current rule failures, whether or not they are shown yet.
    pub fn errors(&self) -> FieldErrors {
        self.errors
    }

    /// The message to show under `field`: only once the field was touched
    /// or a submit was attempted.
    pub fn visible_error(&self, field: NoteField) -> Option<validation::FieldError> {
        if self.submit_attempted || self.touched.get(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn rating_label(&self) -> &'static str {
        validation::rating_label(self.draft.rating)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Note"
        } else {
            "Add Note"
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase == EditorPhase::Editing
    }

    pub fn has_cancel(&self) -> bool {
        self.callbacks.on_cancel.is_some()
    }

    // ---- mutations ----

    /// Pick a cafe. Always clears the coffee, even if it would still match.
    pub fn select_cafe(&mut self, cafe_id: DbId) -> Result<(), CoreError> {
        if self.catalog.cafe(cafe_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "cafe",
                id: cafe_id,
            });
        }
        self.selected_cafe = Some(cafe_id);
        self.draft.coffee_id = None;
        self.revalidate();
        Ok(())
    }

    /// Pick a coffee from the selected cafe's offerings.
    pub fn select_coffee(&mut self, coffee_id: DbId) -> Result<(), CoreError> {
        let Some(cafe_id) = self.selected_cafe else {
            return Err(CoreError::Validation(
                "Choose a cafe before selecting a coffee".to_string(),
            ));
        };
        if !self.catalog.coffees_at(cafe_id).any(|c| c.id == coffee_id) {
            return Err(CoreError::Validation(format!(
                "Coffee {coffee_id} is not served by cafe {cafe_id}"
            )));
        }
        self.draft.coffee_id = Some(coffee_id);
        self.touched.mark(NoteField::CoffeeId);
        self.revalidate();
        Ok(())
    }

    pub fn set_rating(&mut self, rating: i32) {
        self.draft.rating = rating;
        self.touched.mark(NoteField::Rating);
        self.revalidate();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.draft.comment = comment.into();
        self.touched.mark(NoteField::Comment);
        self.revalidate();
    }

    /// The field lost focus.
    pub fn blur(&mut self, field: NoteField) {
        self.touched.mark(field);
    }

    /// Follow the "can't find your cafe or coffee? add one" affordance.
    pub fn request_new_catalog_entry(&self, navigator: &dyn Navigator) {
        navigator.navigate_to(ADD_CATALOG_ENTRY_PATH);
    }

    /// Run the close hook, if one was supplied.
    pub fn cancel(&mut self) {
        if let Some(on_cancel) = self.callbacks.on_cancel.as_mut() {
            on_cancel();
        }
    }

    // ---- submission ----

    /// Validate everything and, if it passes, enter [`EditorPhase::Submitting`].
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SubmitBlocked> {
        if self.phase == EditorPhase::Submitting {
            return Err(SubmitBlocked::InFlight);
        }
        self.submit_attempted = true;
        self.revalidate();

        if let Some((field, err)) = self.errors.first() {
            tracing::debug!(?field, error = %err, "Note submit blocked by validation");
            return Err(SubmitBlocked::Invalid(self.errors));
        }
        let payload = self.draft.to_payload().map_err(SubmitBlocked::Invalid)?;

        self.phase = EditorPhase::Submitting;
        Ok(SubmitRequest {
            mode: self.mode,
            payload,
        })
    }

    /// Apply the store's answer to a request from [`Self::begin_submit`].
    ///
    /// Returns `None` and leaves the editor alone when no request is in
    /// flight.
    pub fn finish_submit(&mut self, result: Result<Note, CoreError>) -> Option<SubmitOutcome> {
        if self.phase != EditorPhase::Submitting {
            tracing::warn!(mode = ?self.mode, "Ignoring store result with no request in flight");
            return None;
        }
        Some(self.apply_result(result))
    }

    /// Validate, send to `store` on the path fixed at construction, and
    /// apply the result.
    pub async fn submit(&mut self, store: &dyn NoteStore) -> Result<SubmitOutcome, SubmitBlocked> {
        let request = self.begin_submit()?;
        let result = match request.mode {
            SubmitMode::Create => store.create_note(&request.payload).await,
            SubmitMode::Update { note_id } => store.update_note(note_id, &request.payload).await,
        };
        Ok(self.apply_result(result))
    }

    // ---- private helpers ----

    fn apply_result(&mut self, result: Result<Note, CoreError>) -> SubmitOutcome {
        self.phase = EditorPhase::Editing;
        match result {
            Ok(note) => {
                tracing::info!(note_id = note.id, mode = ?self.mode, "Note saved");
                (self.callbacks.on_note_added)(&note);
                if self.mode == SubmitMode::Create {
                    self.reset();
                }
                self.cancel();
                SubmitOutcome::Saved(note)
            }
            Err(e) => {
                tracing::error!(error = %e, mode = ?self.mode, "Error saving note");
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn revalidate(&mut self) {
        let mut errors = self.draft.validate();
        if errors.coffee_id.is_none() && !self.coffee_served_at_selected_cafe() {
            errors.coffee_id = Some(FieldError::CoffeeUnavailable);
        }
        self.errors = errors;
    }

    fn coffee_served_at_selected_cafe(&self) -> bool {
        match (self.draft.coffee_id, self.selected_cafe) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(coffee_id), Some(cafe_id)) => {
                self.catalog.coffees_at(cafe_id).any(|c| c.id == coffee_id)
            }
        }
    }

    /// Back to a fresh draft. The cafe picker keeps its selection.
    fn reset(&mut self) {
        self.draft = NoteDraft::default();
        self.touched = Touched::default();
        self.submit_attempted = false;
        self.revalidate();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
