//! Client-side navigation trait.

/// Moves the front end to another route.
///
/// Navigating to the route that is already current must be a no-op.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}
