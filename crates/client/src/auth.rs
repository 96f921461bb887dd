//! Authentication session.
//!
//! The session is either anonymous or holds a token together with the user
//! it belongs to; one is never stored without the other. Every transition
//! is mirrored to the store and announced through the session's
//! [`Notifier`], so observers such as the header account badge can refresh
//! without holding a reference to whoever triggered the change.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cohort_core::{AuthToken, User};
use thiserror::Error;

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::notify::{Notifier, Subscription};
use crate::storage::{KeyValueStore, keys, load_json, save_json};

/// Why a login attempt left the session unchanged.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The token was empty or whitespace only.
    #[error("login rejected: empty token")]
    EmptyToken,

    /// The user record could not be serialized for storage.
    #[error("login aborted: user record not serializable: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The token did not read back from the store as written.
    #[error("login aborted: stored token failed verification")]
    VerificationFailed,
}

#[derive(Debug, Clone, Default)]
enum Session {
    #[default]
    Anonymous,
    Authenticated { token: AuthToken, user: User },
}

/// Authentication session manager.
pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
    session: Mutex<Session>,
    notifier: Notifier,
}

impl AuthSession {
    /// Restore the session from `store`.
    ///
    /// Starts authenticated only if a non-blank token and a parsable user
    /// are both stored. Otherwise any partial leftovers are deleted and the
    /// session starts anonymous.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let session = restore(store.as_ref());
        Self {
            store,
            session: Mutex::new(session),
            notifier: Notifier::new(),
        }
    }

    /// Sign in with `token` for `user`.
    ///
    /// Nothing changes and no notification is sent if the token is blank,
    /// if the user cannot be serialized, or if the token does not read back
    /// from the store exactly as written. Every failure is also logged, so
    /// callers that treat login as fire-and-forget may ignore the result.
    ///
    /// # Errors
    ///
    /// Returns the [`LoginError`] describing why the session was left as it
    /// was.
    pub fn login(&self, token: &str, user: User) -> Result<(), LoginError> {
        let Ok(token) = AuthToken::parse(token) else {
            tracing::error!("Login rejected: empty token");
            return Err(LoginError::EmptyToken);
        };

        {
            let mut session = self.session();

            let user_json = serde_json::to_string(&user).map_err(|e| {
                tracing::error!(error = %e, user_id = %user.id, "Login aborted: user not serializable");
                LoginError::Serialize(e)
            })?;

            self.store.write(keys::AUTH_TOKEN, token.expose());
            self.store.write(keys::AUTH_USER, &user_json);

            if self.store.read(keys::AUTH_TOKEN).as_deref() != Some(token.expose()) {
                tracing::error!(user_id = %user.id, "Login aborted: stored token failed verification");
                self.restore_persisted(&session);
                return Err(LoginError::VerificationFailed);
            }

            tracing::info!(user_id = %user.id, "Logged in");
            set_sentry_user(&user.id, user.email.as_deref());
            add_breadcrumb("auth", "Logged in", None);
            *session = Session::Authenticated { token, user };
        }

        self.notifier.publish();
        Ok(())
    }

    /// Sign out, forgetting the persisted token and user.
    pub fn logout(&self) {
        {
            let mut session = self.session();
            self.store.delete(keys::AUTH_TOKEN);
            self.store.delete(keys::AUTH_USER);
            if let Session::Authenticated { user, .. } = &*session {
                tracing::info!(user_id = %user.id, "Logged out");
            }
            *session = Session::Anonymous;
        }
        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        self.notifier.publish();
    }

    /// Whether the store currently holds a token.
    ///
    /// Reads the store on every call instead of trusting in-memory state,
    /// so removal of the token by anything else is seen immediately.
    #[must_use]
    pub fn check_auth(&self) -> bool {
        self.store
            .read(keys::AUTH_TOKEN)
            .is_some_and(|token| AuthToken::parse(token).is_ok())
    }

    /// In-memory authentication state.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(*self.session(), Session::Authenticated { .. })
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        match &*self.session() {
            Session::Authenticated { user, .. } => Some(user.clone()),
            Session::Anonymous => None,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        match &*self.session() {
            Session::Authenticated { token, .. } => Some(token.clone()),
            Session::Anonymous => None,
        }
    }

    /// Replace the signed-in user's record, e.g. after a profile edit.
    ///
    /// Returns `false` and changes nothing when signed out.
    pub fn update_user(&self, user: User) -> bool {
        {
            let mut session = self.session();
            let Session::Authenticated { user: current, .. } = &mut *session else {
                tracing::warn!("Ignoring profile update while signed out");
                return false;
            };
            if let Err(e) = save_json(self.store.as_ref(), keys::AUTH_USER, &user) {
                tracing::warn!(error = %e, "Profile update not persisted");
                return false;
            }
            tracing::info!(user_id = %user.id, "Profile updated");
            *current = user;
        }
        self.notifier.publish();
        true
    }

    /// Re-read the store, publishing if authentication state changed.
    pub fn reload(&self) {
        let changed = {
            let mut session = self.session();
            let fresh = restore(self.store.as_ref());
            let changed = token_of(&session) != token_of(&fresh);
            *session = fresh;
            changed
        };
        if changed {
            self.notifier.publish();
        }
    }

    /// Observe login, logout and profile changes.
    pub fn subscribe(&self, handler: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.notifier.subscribe(handler)
    }

    /// The channel this session publishes on.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        // Session is swapped whole, never left half-written.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Put the store back in line with `session` after an aborted login.
    fn restore_persisted(&self, session: &Session) {
        match session {
            Session::Anonymous => {
                self.store.delete(keys::AUTH_TOKEN);
                self.store.delete(keys::AUTH_USER);
            }
            Session::Authenticated { token, user } => {
                self.store.write(keys::AUTH_TOKEN, token.expose());
                if let Err(e) = save_json(self.store.as_ref(), keys::AUTH_USER, user) {
                    tracing::warn!(error = %e, "Could not restore stored user");
                }
            }
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("session", &*self.session())
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

fn token_of(session: &Session) -> Option<&str> {
    match session {
        Session::Authenticated { token, .. } => Some(token.expose()),
        Session::Anonymous => None,
    }
}

fn restore(store: &dyn KeyValueStore) -> Session {
    let token = store
        .read(keys::AUTH_TOKEN)
        .and_then(|raw| AuthToken::parse(raw).ok());
    let user: Option<User> = load_json(store, keys::AUTH_USER);

    match (token, user) {
        (Some(token), Some(user)) => {
            tracing::debug!(user_id = %user.id, "Restored session");
            Session::Authenticated { token, user }
        }
        (token, user) => {
            if token.is_some() || user.is_some() {
                tracing::warn!("Clearing partial stored session");
            }
            store.delete(keys::AUTH_TOKEN);
            store.delete(keys::AUTH_USER);
            Session::Anonymous
        }
    }
}
