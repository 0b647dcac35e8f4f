//! Authentication actions on top of the shared session.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::Result;
use crate::credentials::{LoginCredentials, Registration};
use crate::model::{Role, User};
use crate::response::ResponseHandler;
use crate::session::{AuthState, SessionHandle};
use crate::traits::Backend;

/// Login, registration, logout and token revalidation.
///
/// The session itself lives in the [`SessionHandle`]; this store only drives
/// its transitions.
#[derive(Clone)]
pub struct AuthStore {
    backend: Arc<dyn Backend>,
    session: SessionHandle,
    responses: ResponseHandler,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn Backend>, session: SessionHandle, responses: ResponseHandler) -> Self {
        Self {
            backend,
            session,
            responses,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    /// True while a login or registration is in flight.
    pub fn loading(&self) -> bool {
        self.session.is_authenticating()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn user_role(&self) -> Option<Role> {
        self.session.user_role()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn is_lecturer(&self) -> bool {
        self.session.is_lecturer()
    }

    pub fn is_student(&self) -> bool {
        self.session.is_student()
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the session is cleared, whatever it held before, and the
    /// error is returned.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let _loading = self.session.raise(|s| &mut s.authenticating);
        let credentials = LoginCredentials::new(email, password);

        match self.backend.login(&credentials).await {
            Ok(payload) => {
                self.session.sign_in(payload.user.clone(), payload.token);
                Ok(payload.user)
            }
            Err(e) => {
                self.responses.inspect(&e);
                self.session.clear();
                Err(e)
            }
        }
    }

    /// Create an account and sign in as it.
    ///
    /// The registration is checked locally first; an invalid one never
    /// reaches the backend and leaves the session untouched.
    #[instrument(skip_all, fields(email = %registration.email, role = %registration.role))]
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        registration.validate()?;
        let _loading = self.session.raise(|s| &mut s.authenticating);

        match self.backend.register(registration).await {
            Ok(payload) => {
                self.session.sign_in(payload.user.clone(), payload.token);
                Ok(payload.user)
            }
            Err(e) => {
                self.responses.inspect(&e);
                self.session.clear();
                Err(e)
            }
        }
    }

    /// Tell the backend, then clear the session regardless of its answer.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.backend.logout().await {
            warn!(error = %e, "Logout request failed, clearing session anyway");
        }
        self.session.clear();
    }

    /// Revalidate the held token against the backend.
    ///
    /// Without a token this returns false without touching the network. A
    /// rejected token clears the session, unless a newer sign-in replaced it
    /// while the check was in flight.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> bool {
        let Some(token) = self.session.credential() else {
            debug!("No credential to revalidate");
            return false;
        };
        let _revalidating = self.session.raise(|s| &mut s.revalidating);

        match self.backend.current_user().await {
            Ok(user) => self.session.refresh_user(&token, user),
            Err(e) => {
                self.responses.inspect_sent(&e, &token);
                self.session.clear_if(&token);
                false
            }
        }
    }
}
