//! Top-level handling of failed backend calls.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::navigation::routes;
use crate::session::SessionHandle;
use crate::tokens::Credential;
use crate::traits::Navigator;

/// The one place where a 401 tears the session down.
///
/// Every store routes its failures through the same handler. A 401 clears
/// the session and navigates to the login route; anything else is only
/// logged. The error itself always goes back to the caller unchanged.
#[derive(Clone)]
pub struct ResponseHandler {
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

impl ResponseHandler {
    pub fn new(session: SessionHandle, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Inspect a failure. Concurrent 401s each run the teardown; both
    /// steps are idempotent.
    pub fn inspect(&self, err: &Error) {
        if err.is_unauthorized() {
            info!("Backend rejected the credential, signing out");
            self.session.clear();
            self.navigator.navigate(routes::LOGIN);
        } else {
            warn!(error = %err, "Backend call failed");
        }
    }

    /// Inspect a failure of a call made with `sent`.
    ///
    /// A 401 tears down only the session that still holds the rejected
    /// token; a session signed in since then stays.
    pub fn inspect_sent(&self, err: &Error, sent: &Credential) {
        if !err.is_unauthorized() {
            warn!(error = %err, "Backend call failed");
            return;
        }
        if self.session.clear_if(sent) || !self.session.has_credential() {
            info!("Backend rejected the credential, signing out");
            self.navigator.navigate(routes::LOGIN);
        } else {
            debug!("Backend rejected a credential that was already replaced");
        }
    }
}

impl fmt::Debug for ResponseHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHandler")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
