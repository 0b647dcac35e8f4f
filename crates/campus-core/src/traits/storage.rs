//! Session persistence trait.

use crate::Result;
use crate::session::PersistedSession;

/// Where the signed-in user and token survive restarts.
///
/// Only [`PersistedSession`] is ever written; in-flight flags are not.
pub trait SessionStorage: Send + Sync {
    /// Load the stored session, if one exists.
    fn load(&self) -> Result<Option<PersistedSession>>;

    /// Replace the stored session.
    fn save(&self, session: &PersistedSession) -> Result<()>;

    /// Remove the stored session. Removing an absent session succeeds.
    fn clear(&self) -> Result<()>;
}
