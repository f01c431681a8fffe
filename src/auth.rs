//! Authentication state and its side effects on the chat surface.
//!
//! [`AuthController`] owns the tri-state authentication flag and the signed-in
//! user. It never reaches into the app directly; side effects go through the
//! [`AuthHost`] trait so the transcript reset and input-focus behavior stay
//! testable. Focus after authenticating is requested twice: once immediately,
//! and once deferred to the next event-loop pass so the input wins over any
//! widget that grabbed focus during the same update.

use std::fmt;
use std::path::PathBuf;

use log::info;

use credential_store::User;

/// Surface the controller acts on.
pub trait AuthHost {
    /// Drop the chat transcript so the next reconcile pass reseeds it.
    fn reset_chat(&mut self);
    /// Move keyboard focus to the chat input.
    fn request_input_focus(&mut self);
}

/// Identity as reported by whatever backs [`IdentityClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub id: String,
    pub email: Option<String>,
}

/// Error returned when identity resolution fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    message: String,
}

impl IdentityError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for IdentityError {}

impl From<String> for IdentityError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for IdentityError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Source of the current identity.
pub trait IdentityClient {
    fn resolve(&mut self) -> Result<IdentityProfile, IdentityError>;
}

/// Identity backed by the credentials saved on disk.
pub struct CachedCredentialsIdentity {
    path: Option<PathBuf>,
}

impl CachedCredentialsIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Reads from an explicit credentials file instead of the default
    /// per-environment location.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl Default for CachedCredentialsIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityClient for CachedCredentialsIdentity {
    fn resolve(&mut self) -> Result<IdentityProfile, IdentityError> {
        let user = match self.path.as_deref() {
            Some(path) => credential_store::get_user_credentials_from(path),
            None => credential_store::get_user_credentials(),
        };
        match user {
            Some(user) => Ok(IdentityProfile {
                id: user.id,
                email: (!user.email.is_empty()).then_some(user.email),
            }),
            None => Err(IdentityError::new("no stored credentials")),
        }
    }
}

/// Tri-state authentication: `None` until the first signal arrives, then
/// `Some(true)` or `Some(false)`.
pub struct AuthController {
    authenticated: Option<bool>,
    user: Option<User>,
    pending_focus: bool,
}

impl AuthController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            authenticated: None,
            user: None,
            pending_focus: false,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> Option<bool> {
        self.authenticated
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Feed the environment's auth requirement. An absent requirement leaves
    /// the state unknown; a present one answers it immediately, inverted:
    /// not requiring auth means the session counts as authenticated.
    pub fn on_require_auth_changed(&mut self, host: &mut dyn AuthHost, require_auth: Option<bool>) {
        let Some(require_auth) = require_auth else {
            return;
        };
        self.set_authenticated(host, Some(!require_auth));
    }

    /// Feed the outcome of an identity check. Success authenticates and, when
    /// no user is set yet, builds one from the profile plus whatever the
    /// credential cache still knows. Failure de-authenticates and clears the
    /// user.
    pub fn on_identity_result(
        &mut self,
        host: &mut dyn AuthHost,
        result: Result<IdentityProfile, IdentityError>,
        cached: Option<&User>,
    ) {
        match result {
            Ok(profile) => {
                self.set_authenticated(host, Some(true));
                if self.user.is_none() {
                    self.user = Some(User {
                        id: profile.id,
                        name: cached.map(|user| user.name.clone()).unwrap_or_default(),
                        email: profile.email.unwrap_or_default(),
                        auth_token: cached
                            .map(|user| user.auth_token.clone())
                            .unwrap_or_default(),
                    });
                }
            }
            Err(err) => {
                info!("identity check failed: {err}");
                self.set_authenticated(host, Some(false));
                self.user = None;
            }
        }
    }

    /// A completed interactive login. Clears the transcript, focuses the
    /// input, and installs the fresh user.
    pub fn on_login_success(&mut self, host: &mut dyn AuthHost, user: User) {
        info!("login succeeded for user {}", user.id);
        host.reset_chat();
        host.request_input_focus();
        self.user = Some(user);
        self.set_authenticated(host, Some(true));
    }

    /// Fire the focus request deferred at the last transition into the
    /// authenticated state. At most one fires per transition.
    pub fn run_deferred_focus(&mut self, host: &mut dyn AuthHost) {
        if self.pending_focus {
            self.pending_focus = false;
            host.request_input_focus();
        }
    }

    /// Cancel any deferred focus, for shutdown paths.
    pub fn teardown(&mut self) {
        self.pending_focus = false;
    }

    fn set_authenticated(&mut self, host: &mut dyn AuthHost, next: Option<bool>) {
        let was_authenticated = self.authenticated == Some(true);
        self.authenticated = next;
        let is_authenticated = next == Some(true);

        if is_authenticated && !was_authenticated {
            host.request_input_focus();
            self.pending_focus = true;
        } else if !is_authenticated && was_authenticated {
            self.pending_focus = false;
        }
    }
}

impl Default for AuthController {
    fn default() -> Self {
        Self::new()
    }
}
