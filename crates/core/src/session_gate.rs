//! Top-level view decision: auth screen or authenticated shell.
//!
//! | From              | Event                        | To                |
//! |-------------------|------------------------------|-------------------|
//! | `Unresolved`      | identity query returns user  | `Authenticated`   |
//! | `Unresolved`      | returns no user, or fails    | `Unauthenticated` |
//! | any               | [`SessionGate::sign_in`]     | `Authenticated`   |
//! | any               | [`SessionGate::sign_out`]    | `Unauthenticated` |
//!
//! The identity query is issued at most once per gate, with no retry.

use crate::collaborators::IdentityProvider;
use crate::models::User;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Unresolved,
    Authenticated(User),
    Unauthenticated,
}

/// What the application should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    /// The identity check has not answered yet; render nothing.
    Pending,
    AuthScreen,
    Shell(&'a User),
}

#[derive(Debug, Default)]
pub struct SessionGate {
    state: GateState,
    queried: bool,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            GateState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn view(&self) -> View<'_> {
        match &self.state {
            GateState::Unresolved => View::Pending,
            GateState::Authenticated(user) => View::Shell(user),
            GateState::Unauthenticated => View::AuthScreen,
        }
    }

    /// Ask `identity` who the current user is. Only the first call on an
    /// unresolved gate queries; later calls return the current view.
    pub async fn resolve(&mut self, identity: &dyn IdentityProvider) -> View<'_> {
        if self.queried || self.state != GateState::Unresolved {
            return self.view();
        }
        self.queried = true;

        self.state = match identity.current_user().await {
            Ok(Some(user)) => {
                tracing::info!(user_id = user.id, "Session resolved");
                GateState::Authenticated(user)
            }
            Ok(None) => {
                tracing::info!("No active session");
                GateState::Unauthenticated
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed, treating as signed out");
                GateState::Unauthenticated
            }
        };
        self.view()
    }

    /// A login or sign-up performed by the surrounding app succeeded.
    pub fn sign_in(&mut self, user: User) {
        tracing::info!(user_id = user.id, "Signed in");
        self.state = GateState::Authenticated(user);
    }

    pub fn sign_out(&mut self) {
        tracing::info!("Signed out");
        self.state = GateState::Unauthenticated;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::error::CoreError;

    enum Answer {
        User,
        Nobody,
        Fail,
    }

    struct FakeIdentity {
        answer: Answer,
        calls: Cell<u32>,
    }

    impl FakeIdentity {
        fn new(answer: Answer) -> Self {
            Self {
                answer,
                calls: Cell::new(0),
            }
        }
    }

    fn ada() -> User {
        User {
            id: 1,
            username: "ada".to_string(),
            email: None,
            avatar_url: None,
            is_oauth_user: false,
        }
    }

    #[async_trait(?Send)]
    impl IdentityProvider for FakeIdentity {
        async fn current_user(&self) -> Result<Option<User>, CoreError> {
            self.calls.set(self.calls.get() + 1);
            match self.answer {
                Answer::User => Ok(Some(ada())),
                Answer::Nobody => Ok(None),
                Answer::Fail => Err(CoreError::Remote("connection refused".to_string())),
            }
        }
    }

    #[test]
    fn starts_pending() {
        assert_eq!(SessionGate::new().view(), View::Pending);
    }

    #[tokio::test]
    async fn user_present_shows_shell() {
        let identity = FakeIdentity::new(Answer::User);
        let mut gate = SessionGate::new();
        assert_matches!(gate.resolve(&identity).await, View::Shell(u) if u.username == "ada");
        assert_eq!(gate.user(), Some(&ada()));
    }

    #[tokio::test]
    async fn no_user_shows_auth_screen() {
        let identity = FakeIdentity::new(Answer::Nobody);
        let mut gate = SessionGate::new();
        assert_eq!(gate.resolve(&identity).await, View::AuthScreen);
    }

    #[tokio::test]
    async fn failure_is_treated_as_no_user() {
        let identity = FakeIdentity::new(Answer::Fail);
        let mut gate = SessionGate::new();
        assert_eq!(gate.resolve(&identity).await, View::AuthScreen);
        assert_eq!(gate.state(), &GateState::Unauthenticated);
    }

    #[tokio::test]
    async fn query_runs_exactly_once() {
        let identity = FakeIdentity::new(Answer::Nobody);
        let mut gate = SessionGate::new();
        gate.resolve(&identity).await;
        gate.resolve(&identity).await;
        assert_eq!(identity.calls.get(), 1);
    }

    #[tokio::test]
    async fn explicit_transitions_after_resolution() {
        let identity = FakeIdentity::new(Answer::Nobody);
        let mut gate = SessionGate::new();
        gate.resolve(&identity).await;

        gate.sign_in(ada());
        assert_matches!(gate.view(), View::Shell(_));

        gate.sign_out();
        assert_eq!(gate.view(), View::AuthScreen);

        // A later resolve does not query again.
        gate.resolve(&identity).await;
        assert_eq!(identity.calls.get(), 1);
    }
}
