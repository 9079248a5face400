//! HTTP-level tests for [`BrewnoteApi`] against a `wiremock` server.

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use brewnote_client::{ApiError, BrewnoteApi, ClientConfig};
use brewnote_core::catalog::Catalog;
use brewnote_core::error::CoreError;
use brewnote_core::models::{Credentials, NotePayload};
use brewnote_core::note_editor::{EditorCallbacks, NoteEditor, SubmitOutcome};
use brewnote_core::session_gate::{SessionGate, View};

fn client_for(server: &MockServer) -> BrewnoteApi {
    let config = ClientConfig {
        api_url: server.uri(),
        request_timeout_secs: 5,
    };
    BrewnoteApi::new(&config).unwrap()
}

fn creds() -> Credentials {
    Credentials {
        username: "ada".to_string(),
        password: "pw".to_string(),
    }
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cafes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Blue Bottle", "location": "Oakland" }
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/coffees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 10,
                "name": "Ethiopia",
                "cafe": { "id": 1, "name": "Blue Bottle", "location": "Oakland" }
            }
        ])))
        .mount(server)
        .await;
}

// -- session -----------------------------------------------------------------

/// A 401 from `/check_session` means "no user", which the gate turns into
/// the auth screen.
#[tokio::test]
async fn unauthorized_session_shows_auth_screen() {
    let server = MockServer::start().await;
    let api = client_for(&server);

    Mock::given(method("GET"))
        .and(path("/check_session"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "User not signed in" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    assert_eq!(api.check_session().await.unwrap(), None);

    let mut gate = SessionGate::new();
    assert_eq!(gate.resolve(&api).await, View::AuthScreen);
}

/// The server's error message survives for the auth banner.
#[tokio::test]
async fn login_failure_carries_server_message() {
    let server = MockServer::start().await;
    let api = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "ada", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": "Invalid username or password" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = api.login(&creds()).await.unwrap_err();
    assert_matches!(err, ApiError::Api { status: 401, .. });
    assert_eq!(err.user_message(), "Invalid username or password");
}

#[tokio::test]
async fn signup_then_logout_returns_to_auth_screen() {
    let server = MockServer::start().await;
    let api = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "username": "ada", "is_oauth_user": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Logged out" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut gate = SessionGate::new();
    gate.sign_in(api.signup(&creds()).await.unwrap());
    assert_matches!(gate.view(), View::Shell(user) if user.id == 5 && user.username == "ada");

    api.logout().await.unwrap();
    gate.sign_out();
    assert_eq!(gate.view(), View::AuthScreen);
}

// -- catalog -----------------------------------------------------------------

/// Catalog loads through the trait, decoding nested cafe references.
#[tokio::test]
async fn catalog_loads_nested_cafe_references() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let api = client_for(&server);

    let catalog = Catalog::load(&api).await.unwrap();
    assert_eq!(catalog.cafes().len(), 1);
    assert_eq!(catalog.coffees_at(1).map(|c| c.id).collect::<Vec<_>>(), vec![10]);
}

// -- notes -------------------------------------------------------------------

/// The editor posts the draft to `/notes` on the create path.
#[tokio::test]
async fn editor_create_posts_payload() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(body_json(json!({
            "rating": 4, "comment": "Bright and fruity", "coffee_id": 10
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77, "rating": 4, "comment": "Bright and fruity", "coffee_id": 10, "user_id": 5
        })))
        .expect(1)
        .mount(&server)
        .await;
    let api = client_for(&server);

    let catalog = Catalog::load(&api).await.unwrap();
    let mut editor = NoteEditor::new(&catalog, None, EditorCallbacks::new(|_| {}));
    editor.select_cafe(1).unwrap();
    editor.select_coffee(10).unwrap();
    editor.set_rating(4);
    editor.set_comment("Bright and fruity");

    let outcome = editor.submit(&api).await.unwrap();
    assert_matches!(outcome, SubmitOutcome::Saved(note) if note.id == 77);
}

#[tokio::test]
async fn update_and_delete_address_note_id() {
    let server = MockServer::start().await;
    let payload = NotePayload {
        rating: 5,
        comment: "Even better".to_string(),
        coffee_id: 10,
    };
    Mock::given(method("PATCH"))
        .and(path("/notes/77"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 77, "rating": 5, "comment": "Even better", "coffee_id": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/notes/77"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "Note deleted successfully" })),
        )
        .mount(&server)
        .await;
    let api = client_for(&server);

    let note = api.update_note(77, &payload).await.unwrap();
    assert_eq!(note.rating, 5);
    api.delete_note(77).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let seen: Vec<(String, String)> = requests
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("PATCH".to_string(), "/notes/77".to_string()),
            ("DELETE".to_string(), "/notes/77".to_string()),
        ]
    );
}

/// A missing note surfaces as a remote error carrying the server message.
#[tokio::test]
async fn missing_note_maps_to_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/notes/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Note not found" })))
        .mount(&server)
        .await;
    let api = client_for(&server);

    let payload = NotePayload {
        rating: 3,
        comment: "x".to_string(),
        coffee_id: 10,
    };
    let err = CoreError::from(api.update_note(1, &payload).await.unwrap_err());
    assert_matches!(err, CoreError::Remote(msg) if msg.contains("Note not found"));
}

/// A body that does not decode as the expected shape is an internal error.
#[tokio::test]
async fn undecodable_body_maps_to_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;
    let api = client_for(&server);

    let err = CoreError::from(api.list_notes().await.unwrap_err());
    assert_matches!(err, CoreError::Internal(_));
}
