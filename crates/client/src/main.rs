//! `brewnote` -- headless driver for the tasting-note workflow.
//!
//! Resolves the session, signs in through the auth form when credentials
//! are configured, loads the catalog, and optionally authors one note
//! through the note editor.
//!
//! # Environment variables
//!
//! | Variable                        | Required | Default                 | Description                          |
//! |---------------------------------|----------|-------------------------|--------------------------------------|
//! | `BREWNOTE_API_URL`              | no       | `http://localhost:5555` | Notes server base URL                |
//! | `BREWNOTE_REQUEST_TIMEOUT_SECS` | no       | `30`                    | Per-request timeout                  |
//! | `BREWNOTE_USERNAME`             | no       | --                      | Sign in with this user               |
//! | `BREWNOTE_PASSWORD`             | no       | --                      | Password for `BREWNOTE_USERNAME`     |
//! | `BREWNOTE_SIGNUP`               | no       | `false`                 | Create the account instead           |
//! | `BREWNOTE_NOTE_COMMENT`         | no       | --                      | Author a note with this comment      |
//! | `BREWNOTE_NOTE_CAFE_ID`         | with note| --                      | Cafe to select                       |
//! | `BREWNOTE_NOTE_COFFEE_ID`       | with note| --                      | Coffee to select                     |
//! | `BREWNOTE_NOTE_RATING`          | with note| --                      | Rating 1-5                           |
//! | `BREWNOTE_NOTE_ID`              | no       | --                      | Edit this note instead of creating   |

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brewnote_client::remote::authenticate;
use brewnote_client::{BrewnoteApi, ClientConfig, LoginSettings, NoteSettings};
use brewnote_core::auth_form::{AuthCallbacks, AuthForm, AuthMode};
use brewnote_core::catalog::Catalog;
use brewnote_core::collaborators::Navigator;
use brewnote_core::models::{Credentials, Note};
use brewnote_core::note_editor::{EditorCallbacks, NoteEditor, SubmitBlocked, SubmitOutcome};
use brewnote_core::session_gate::{SessionGate, View};
use brewnote_core::validation::NoteField;

/// There is no browser to move; navigation requests are logged.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::info!(path, "Navigate");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brewnote=info,brewnote_client=info,brewnote_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, "Starting brewnote");

    let api = BrewnoteApi::new(&config)?;
    let mut gate = SessionGate::new();

    if gate.resolve(&api).await == View::AuthScreen {
        match LoginSettings::from_env()? {
            Some(login) => sign_in(&api, &mut gate, login).await,
            None => {
                tracing::warn!(
                    github_url = %api.github_auth_url(),
                    "Not signed in; set BREWNOTE_USERNAME and BREWNOTE_PASSWORD or use GitHub",
                );
            }
        }
    }

    let Some(user) = gate.user() else {
        return Ok(());
    };
    tracing::info!(user_id = user.id, username = %user.username, "Authenticated shell");

    let catalog = Catalog::load(&api).await?;
    for cafe in catalog.cafes() {
        tracing::info!(
            cafe_id = cafe.id,
            coffees = catalog.coffees_at(cafe.id).count(),
            "{}",
            cafe.display_label(),
        );
    }

    if let Some(settings) = NoteSettings::from_env()? {
        author_note(&api, &catalog, settings).await?;
    }

    Ok(())
}

/// Type the configured credentials into the auth form and act on the
/// intent it reports.
async fn sign_in(api: &BrewnoteApi, gate: &mut SessionGate, login: LoginSettings) {
    let intent: Rc<RefCell<Option<(AuthMode, Credentials)>>> = Rc::new(RefCell::new(None));
    let (on_login, on_signup) = (Rc::clone(&intent), Rc::clone(&intent));
    let github_url = api.github_auth_url();

    let mut form = AuthForm::new(AuthCallbacks::new(
        move |c| *on_login.borrow_mut() = Some((AuthMode::SignIn, c)),
        move |c| *on_signup.borrow_mut() = Some((AuthMode::SignUp, c)),
        move || tracing::info!(url = %github_url, "Continue with GitHub"),
    ));

    if login.sign_up {
        form.toggle_mode();
    }
    form.set_username(login.username);
    form.set_password(login.password);

    if let Err(blocked) = form.submit() {
        tracing::warn!(error = %blocked, "Auth form refused to submit");
        return;
    }
    let Some((mode, credentials)) = intent.borrow_mut().take() else {
        return;
    };

    form.set_loading(true);
    let result = authenticate(api, mode, &credentials).await;
    form.set_loading(false);

    match result {
        Ok(user) => gate.sign_in(user),
        Err(e) => {
            form.show_error(e.user_message());
            tracing::error!(
                error = %e,
                banner = form.error().unwrap_or_default(),
                "Authentication failed"
            );
        }
    }
}

/// Drive a note editor through cascading selection and submission.
async fn author_note(
    api: &BrewnoteApi,
    catalog: &Catalog,
    settings: NoteSettings,
) -> anyhow::Result<()> {
    let existing = match settings.note_id {
        Some(id) => {
            let notes = api.list_notes().await?;
            let Some(note) = notes.into_iter().find(|n| n.id == id) else {
                tracing::error!(note_id = id, "Note not found among your notes");
                return Ok(());
            };
            Some(note)
        }
        None => None,
    };

    let callbacks = EditorCallbacks::new(|note: &Note| {
        tracing::info!(note_id = note.id, rating = note.rating, "Note added");
    })
    .with_cancel(|| tracing::debug!("Editor closed"));
    let mut editor = NoteEditor::new(catalog, existing.as_ref(), callbacks);

    let needs_selection = editor.selected_cafe() != Some(settings.cafe_id)
        || editor.draft().coffee_id != Some(settings.coffee_id);
    if needs_selection {
        if let Err(e) = editor
            .select_cafe(settings.cafe_id)
            .and_then(|()| editor.select_coffee(settings.coffee_id))
        {
            tracing::error!(error = %e, "Could not select cafe and coffee");
            editor.request_new_catalog_entry(&LogNavigator);
            return Ok(());
        }
    }
    editor.set_rating(settings.rating);
    editor.set_comment(settings.comment);
    tracing::info!(
        rating = settings.rating,
        label = editor.rating_label(),
        action = editor.submit_label(),
        "Submitting note",
    );

    match editor.submit(api).await {
        Ok(SubmitOutcome::Saved(note)) => {
            tracing::info!(note_id = note.id, "Saved");
        }
        // Already logged by the editor; the draft is intact for a retry.
        Ok(SubmitOutcome::Failed(_)) => {}
        Err(SubmitBlocked::Invalid(_)) => {
            for field in NoteField::ALL {
                if let Some(err) = editor.visible_error(field) {
                    tracing::warn!(?field, "{err}");
                }
            }
        }
        Err(SubmitBlocked::InFlight) => {
            tracing::warn!("A save is already in progress");
        }
    }

    Ok(())
}
