//! The authenticated session shared by the HTTP client and every store.
//!
//! A [`SessionHandle`] is created once at startup and passed explicitly to
//! whatever needs to read the credential or tear the session down. The user
//! and token live in a single `Option`, so the client can never hold one
//! without the other.

mod memory;

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::{Role, User};
use crate::sync::{self, FlagGuard};
use crate::tokens::Credential;
use crate::traits::SessionStorage;

pub use memory::MemoryStorage;

/// The signed-in identity; this is also exactly what gets persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub user: User,
    pub token: Credential,
}

/// Observable phase of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    /// No user, no token.
    Anonymous,
    /// A login or registration is in flight.
    Authenticating,
    /// User and token are set.
    Authenticated,
    /// The held token is being checked against the backend.
    Revalidating,
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    signed_in: Option<PersistedSession>,
    pub(crate) authenticating: bool,
    pub(crate) revalidating: bool,
}

/// Shared handle to the current session.
///
/// Handles are cheap to clone (they share an internal `Arc`); every clone
/// observes the same state.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHandle {
    /// An empty session backed by the given storage.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::default()),
                storage,
            }),
        }
    }

    /// An empty session that persists nowhere but memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    /// Restore whatever the storage holds.
    ///
    /// An unreadable record is logged and treated as no session; the
    /// backend decides later whether a restored token is still valid.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let handle = Self::new(storage);
        match handle.inner.storage.load() {
            Ok(Some(persisted)) => {
                debug!(user_id = %persisted.user.id, "Restored persisted session");
                sync::write(&handle.inner.state).signed_in = Some(persisted);
            }
            Ok(None) => debug!("No persisted session"),
            Err(e) => warn!(error = %e, "Ignoring unreadable persisted session"),
        }
        handle
    }

    /// The bearer token, if one is held.
    pub fn credential(&self) -> Option<Credential> {
        sync::read(&self.inner.state)
            .signed_in
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn has_credential(&self) -> bool {
        sync::read(&self.inner.state).signed_in.is_some()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        sync::read(&self.inner.state)
            .signed_in
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.has_credential()
    }

    pub fn user_role(&self) -> Option<Role> {
        sync::read(&self.inner.state)
            .signed_in
            .as_ref()
            .map(|s| s.user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.user_role() == Some(Role::Admin)
    }

    pub fn is_lecturer(&self) -> bool {
        self.user_role() == Some(Role::Lecturer)
    }

    pub fn is_student(&self) -> bool {
        self.user_role() == Some(Role::Student)
    }

    /// True while a login or registration is in flight.
    pub fn is_authenticating(&self) -> bool {
        sync::read(&self.inner.state).authenticating
    }

    pub fn state(&self) -> AuthState {
        let state = sync::read(&self.inner.state);
        if state.authenticating {
            AuthState::Authenticating
        } else if state.revalidating {
            AuthState::Revalidating
        } else if state.signed_in.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Set user and token together and persist them.
    pub fn sign_in(&self, user: User, token: Credential) {
        let persisted = PersistedSession { user, token };
        info!(user_id = %persisted.user.id, role = %persisted.user.role, "Signed in");
        sync::write(&self.inner.state).signed_in = Some(persisted.clone());
        if let Err(e) = self.inner.storage.save(&persisted) {
            warn!(error = %e, "Failed to persist session");
        }
    }

    /// Replace the user of the session still holding `token`. Returns false
    /// when that session was torn down or replaced in the meantime, in which
    /// case nothing changes.
    pub(crate) fn refresh_user(&self, token: &Credential, user: User) -> bool {
        let persisted = {
            let mut state = sync::write(&self.inner.state);
            match state.signed_in.as_mut() {
                Some(signed_in) if signed_in.token == *token => {
                    signed_in.user = user;
                    signed_in.clone()
                }
                _ => return false,
            }
        };
        if let Err(e) = self.inner.storage.save(&persisted) {
            warn!(error = %e, "Failed to persist refreshed user");
        }
        true
    }

    /// Drop user and token together and remove the persisted record.
    ///
    /// Clearing an already-empty session is a no-op apart from the storage
    /// call. Returns whether a session was actually held.
    pub fn clear(&self) -> bool {
        let had_session = sync::write(&self.inner.state).signed_in.take().is_some();
        if had_session {
            info!("Session cleared");
        }
        if let Err(e) = self.inner.storage.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        had_session
    }

    /// Clear the session only if it still holds `token`.
    ///
    /// A newer sign-in is left alone. Returns whether anything was cleared.
    pub fn clear_if(&self, token: &Credential) -> bool {
        {
            let mut state = sync::write(&self.inner.state);
            let holds_token = state.signed_in.as_ref().map(|s| s.token == *token);
            match holds_token {
                Some(true) => state.signed_in = None,
                Some(false) => {
                    debug!("Keeping session signed in with a newer credential");
                    return false;
                }
                None => return false,
            }
        }
        info!("Session cleared");
        if let Err(e) = self.inner.storage.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        true
    }

    pub(crate) fn raise(&self, flag: fn(&mut SessionState) -> &mut bool) -> FlagGuard<'_, SessionState> {
        FlagGuard::raise(&self.inner.state, flag)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("state", &self.state())
            .field("user", &self.user().map(|u| u.id))
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    fn user(role: Role) -> User {
        User {
            id: UserId(1),
            email: "ada@uni.edu".into(),
            name: "Ada Lovelace".into(),
            role,
            avatar: None,
        }
    }

    #[test]
    fn starts_anonymous() {
        let session = SessionHandle::in_memory();
        assert_eq!(session.state(), AuthState::Anonymous);
        assert!(!session.is_authenticated());
        assert!(session.credential().is_none());
        assert!(session.user_role().is_none());
    }

    #[test]
    fn sign_in_sets_user_and_token_together() {
        let session = SessionHandle::in_memory();
        session.sign_in(user(Role::Lecturer), Credential::new("t"));

        assert!(session.is_authenticated());
        assert_eq!(session.state(), AuthState::Authenticated);
        assert!(session.is_lecturer());
        assert!(!session.is_admin());
        assert!(!session.is_student());
        assert_eq!(session.credential(), Some(Credential::new("t")));
    }

    #[test]
    fn clear_is_idempotent() {
        let session = SessionHandle::in_memory();
        session.sign_in(user(Role::Student), Credential::new("t"));

        assert!(session.clear());
        assert!(!session.clear());
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn clones_share_state() {
        let session = SessionHandle::in_memory();
        let other = session.clone();
        session.sign_in(user(Role::Admin), Credential::new("t"));
        assert!(other.is_admin());
        other.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn persists_and_restores_user_and_token() {
        let storage = Arc::new(MemoryStorage::default());
        let session = SessionHandle::new(storage.clone());
        session.sign_in(user(Role::Student), Credential::new("persisted"));

        let restored = SessionHandle::restore(storage.clone());
        assert_eq!(restored.state(), AuthState::Authenticated);
        assert!(!restored.is_authenticating());
        assert_eq!(restored.credential(), Some(Credential::new("persisted")));

        restored.clear();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn refresh_user_ignores_cleared_session() {
        let session = SessionHandle::in_memory();
        assert!(!session.refresh_user(&Credential::new("t"), user(Role::Admin)));
        assert!(session.user().is_none());
    }

    #[test]
    fn refresh_user_ignores_replaced_session() {
        let session = SessionHandle::in_memory();
        session.sign_in(user(Role::Student), Credential::new("new"));

        assert!(!session.refresh_user(&Credential::new("old"), user(Role::Admin)));
        assert!(session.is_student());
    }

    #[test]
    fn clear_if_only_drops_matching_token() {
        let storage = Arc::new(MemoryStorage::default());
        let session = SessionHandle::new(storage.clone());
        session.sign_in(user(Role::Student), Credential::new("new"));

        assert!(!session.clear_if(&Credential::new("old")));
        assert!(session.is_authenticated());
        assert!(storage.load().unwrap().is_some());

        assert!(session.clear_if(&Credential::new("new")));
        assert!(!session.clear_if(&Credential::new("new")));
        assert!(!session.is_authenticated());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let session = SessionHandle::in_memory();
        session.sign_in(user(Role::Student), Credential::new("super-secret"));
        let debug = format!("{:?}", session);
        assert!(!debug.contains("super-secret"));
    }
}
