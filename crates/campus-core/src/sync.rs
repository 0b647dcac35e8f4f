//! Lock helpers shared by the session and the stores.
//!
//! Every critical section in this crate is a plain assignment or a clone,
//! so a poisoned lock still guards consistent data and is recovered.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Raises a boolean flag for as long as the guard lives.
///
/// Dropping the guard lowers the flag on every exit path of an action,
/// including early returns via `?`.
pub(crate) struct FlagGuard<'a, S> {
    state: &'a RwLock<S>,
    flag: fn(&mut S) -> &mut bool,
}

impl<'a, S> FlagGuard<'a, S> {
    pub(crate) fn raise(state: &'a RwLock<S>, flag: fn(&mut S) -> &mut bool) -> Self {
        {
            let mut guard = write(state);
            *flag(&mut guard) = true;
        }
        Self { state, flag }
    }
}

impl<S> Drop for FlagGuard<'_, S> {
    fn drop(&mut self) {
        let mut guard = write(self.state);
        *(self.flag)(&mut guard) = false;
    }
}
