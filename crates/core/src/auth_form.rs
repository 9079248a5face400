//! Credential-gathering form shown to signed-out users.
//!
//! The form never authenticates anyone itself. It reports intent through
//! [`AuthCallbacks`] and displays whatever error string the parent hands
//! back via [`AuthForm::show_error`].

use std::fmt;

use crate::models::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Create Account",
        }
    }

    /// Label of the link that switches to the other mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign up",
            Self::SignUp => "Sign in",
        }
    }

    pub fn toggle_prompt(self) -> &'static str {
        match self {
            Self::SignIn => "Don't have an account?",
            Self::SignUp => "Already have an account?",
        }
    }
}

/// Why [`AuthForm::submit`] did not invoke a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthBlocked {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("An authentication request is already in progress")]
    Loading,
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Hooks through which the form reports user intent.
pub struct AuthCallbacks {
    on_login: Box<dyn FnMut(Credentials)>,
    on_signup: Box<dyn FnMut(Credentials)>,
    on_github_auth: Box<dyn FnMut()>,
    on_clear_error: Option<Box<dyn FnMut()>>,
}

impl AuthCallbacks {
    pub fn new(
        on_login: impl FnMut(Credentials) + 'static,
        on_signup: impl FnMut(Credentials) + 'static,
        on_github_auth: impl FnMut() + 'static,
    ) -> Self {
        Self {
            on_login: Box::new(on_login),
            on_signup: Box::new(on_signup),
            on_github_auth: Box::new(on_github_auth),
            on_clear_error: None,
        }
    }

    pub fn with_clear_error(mut self, on_clear_error: impl FnMut() + 'static) -> Self {
        self.on_clear_error = Some(Box::new(on_clear_error));
        self
    }
}

impl fmt::Debug for AuthCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCallbacks")
            .field("has_clear_error", &self.on_clear_error.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AuthForm {
    username: String,
    password: String,
    mode: AuthMode,
    password_visible: bool,
    error: Option<String>,
    loading: bool,
    callbacks: AuthCallbacks,
}

impl AuthForm {
    pub fn new(callbacks: AuthCallbacks) -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            mode: AuthMode::SignIn,
            password_visible: false,
            error: None,
            loading: false,
            callbacks,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn password_visible(&self) -> bool {
        self.password_visible
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submit is enabled only with both fields filled and nothing in flight.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.username.is_empty() && !self.password.is_empty()
    }

    /// Ignored while loading, as are [`Self::set_password`] and
    /// [`Self::toggle_mode`].
    pub fn set_username(&mut self, username: impl Into<String>) {
        if self.loading {
            return;
        }
        self.username = username.into();
        self.clear_error();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        if self.loading {
            return;
        }
        self.password = password.into();
        self.clear_error();
    }

    /// Switch between sign-in and sign-up. Both fields are emptied.
    pub fn toggle_mode(&mut self) {
        if self.loading {
            return;
        }
        self.mode = self.mode.toggled();
        self.username.clear();
        self.password.clear();
        self.clear_error();
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password_visible = !self.password_visible;
    }

    /// Display an error supplied by the identity collaborator, verbatim.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Report the gathered credentials through `on_login` or `on_signup`.
    pub fn submit(&mut self) -> Result<AuthMode, AuthBlocked> {
        if self.loading {
            return Err(AuthBlocked::Loading);
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AuthBlocked::MissingCredentials);
        }
        let credentials = Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        match self.mode {
            AuthMode::SignIn => (self.callbacks.on_login)(credentials),
            AuthMode::SignUp => (self.callbacks.on_signup)(credentials),
        }
        Ok(self.mode)
    }

    /// Hand off to the external OAuth flow. Returns `false` while loading.
    pub fn github_auth(&mut self) -> bool {
        if self.loading {
            return false;
        }
        (self.callbacks.on_github_auth)();
        true
    }

    fn clear_error(&mut self) {
        self.error = None;
        if let Some(on_clear_error) = self.callbacks.on_clear_error.as_mut() {
            on_clear_error();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Login(Credentials),
        Signup(Credentials),
        GitHub,
        ClearError,
    }

    fn form() -> (AuthForm, Rc<RefCell<Vec<Event>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let (e1, e2, e3, e4) = (
            Rc::clone(&events),
            Rc::clone(&events),
            Rc::clone(&events),
            Rc::clone(&events),
        );
        let callbacks = AuthCallbacks::new(
            move |c| e1.borrow_mut().push(Event::Login(c)),
            move |c| e2.borrow_mut().push(Event::Signup(c)),
            move || e3.borrow_mut().push(Event::GitHub),
        )
        .with_clear_error(move || e4.borrow_mut().push(Event::ClearError));
        (AuthForm::new(callbacks), events)
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    // -- submit --------------------------------------------------------------

    #[test]
    fn sign_in_submit_reports_login() {
        let (mut form, events) = form();
        form.set_username("ada");
        form.set_password("pw");
        events.borrow_mut().clear();

        assert_eq!(form.submit(), Ok(AuthMode::SignIn));
        assert_eq!(events.borrow().as_slice(), &[Event::Login(creds("ada", "pw"))]);
    }

    #[test]
    fn sign_up_submit_reports_signup() {
        let (mut form, events) = form();
        form.toggle_mode();
        form.set_username("ada");
        form.set_password("pw");
        events.borrow_mut().clear();

        assert_eq!(form.submit(), Ok(AuthMode::SignUp));
        assert_eq!(events.borrow().as_slice(), &[Event::Signup(creds("ada", "pw"))]);
        assert_eq!(form.mode().submit_label(), "Create Account");
    }

    #[test]
    fn submit_requires_both_fields() {
        let (mut form, events) = form();
        form.set_username("ada");
        events.borrow_mut().clear();

        assert!(!form.can_submit());
        assert_eq!(form.submit(), Err(AuthBlocked::MissingCredentials));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn loading_blocks_submit_and_github() {
        let (mut form, events) = form();
        form.set_username("ada");
        form.set_password("pw");
        form.set_loading(true);
        events.borrow_mut().clear();

        assert!(!form.can_submit());
        assert_eq!(form.submit(), Err(AuthBlocked::Loading));
        assert!(!form.github_auth());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn loading_freezes_fields_and_mode() {
        let (mut form, events) = form();
        form.set_username("ada");
        form.set_password("pw");
        form.set_loading(true);
        events.borrow_mut().clear();

        form.set_username("mallory");
        form.set_password("other");
        form.toggle_mode();

        assert_eq!(form.username(), "ada");
        assert_eq!(form.password(), "pw");
        assert_eq!(form.mode(), AuthMode::SignIn);
        assert!(events.borrow().is_empty());

        form.set_loading(false);
        form.set_username("grace");
        assert_eq!(form.username(), "grace");
    }

    #[test]
    fn github_button_delegates() {
        let (mut form, events) = form();
        assert!(form.github_auth());
        assert_eq!(events.borrow().as_slice(), &[Event::GitHub]);
    }

    // -- error clearing ------------------------------------------------------

    #[test]
    fn editing_clears_error() {
        let (mut form, events) = form();
        form.show_error("Invalid username or password");
        assert_eq!(form.error(), Some("Invalid username or password"));

        form.set_password("x");
        assert_eq!(form.error(), None);
        assert_eq!(events.borrow().as_slice(), &[Event::ClearError]);
    }

    #[test]
    fn toggling_mode_resets_fields_and_error() {
        let (mut form, events) = form();
        form.set_username("ada");
        form.set_password("secret");
        form.show_error("Username already exists");
        events.borrow_mut().clear();

        form.toggle_mode();

        assert_eq!(form.mode(), AuthMode::SignUp);
        assert_eq!(form.username(), "");
        assert_eq!(form.password(), "");
        assert_eq!(form.error(), None);
        assert_eq!(events.borrow().as_slice(), &[Event::ClearError]);

        form.toggle_mode();
        assert_eq!(form.mode(), AuthMode::SignIn);
    }

    #[test]
    fn visibility_toggle_is_presentation_only() {
        let (mut form, events) = form();
        form.toggle_password_visibility();
        assert!(form.password_visible());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn mode_labels() {
        assert_eq!(AuthMode::SignIn.submit_label(), "Sign In");
        assert_eq!(AuthMode::SignIn.toggle_label(), "Sign up");
        assert_eq!(AuthMode::SignUp.toggle_prompt(), "Already have an account?");
    }
}
