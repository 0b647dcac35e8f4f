//! Routes, an in-memory router, and the route guards.

use std::sync::RwLock;

use tracing::debug;
use url::form_urlencoded;

use crate::stores::AuthStore;
use crate::sync;
use crate::traits::Navigator;

/// Well-known routes of the portal front end.
pub mod routes {
    pub const LOGIN: &str = "/login";
    pub const DASHBOARD: &str = "/dashboard";
}

/// Keeps the current route and the navigation history in memory.
#[derive(Debug)]
pub struct Router {
    history: RwLock<Vec<String>>,
}

impl Router {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: RwLock::new(vec![initial.into()]),
        }
    }

    pub fn current(&self) -> String {
        sync::read(&self.history).last().cloned().unwrap_or_default()
    }

    pub fn history(&self) -> Vec<String> {
        sync::read(&self.history).clone()
    }
}

impl Navigator for Router {
    fn navigate(&self, route: &str) {
        let mut history = sync::write(&self.history);
        if history.last().map(String::as_str) == Some(route) {
            return;
        }
        debug!(route, "Navigating");
        history.push(route.to_string());
    }
}

/// What a guard decided about a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

/// Guard for pages that need a signed-in user.
///
/// Without a token, or with one the backend no longer accepts, the user is
/// sent to the login page with the requested route preserved.
pub async fn require_auth(auth: &AuthStore, to: &str) -> GuardOutcome {
    if auth.session().has_credential() && auth.check_auth().await {
        return GuardOutcome::Allow;
    }
    GuardOutcome::Redirect(login_redirect(to))
}

/// Guard for login and registration pages.
///
/// A user who is already signed in goes to `redirect`, or the dashboard.
pub async fn guest_only(auth: &AuthStore, redirect: Option<&str>) -> GuardOutcome {
    if auth.session().has_credential() && auth.check_auth().await {
        let target = redirect.filter(|r| !r.is_empty()).unwrap_or(routes::DASHBOARD);
        return GuardOutcome::Redirect(target.to_string());
    }
    GuardOutcome::Allow
}

fn login_redirect(to: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", to)
        .finish();
    format!("{}?{}", routes::LOGIN, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, signed_in_portal};

    #[test]
    fn navigating_to_current_route_is_a_no_op() {
        let router = Router::new("/courses");
        router.navigate("/courses");
        router.navigate(routes::LOGIN);
        router.navigate(routes::LOGIN);

        assert_eq!(router.history(), vec!["/courses", routes::LOGIN]);
    }

    #[test]
    fn login_redirect_encodes_target() {
        assert_eq!(login_redirect("/courses/1"), "/login?redirect=%2Fcourses%2F1");
    }

    #[tokio::test]
    async fn protected_route_without_token_redirects_to_login() {
        let fake = FakeBackend::new();
        let (portal, _) = signed_in_portal(fake.clone());
        portal.session().clear();

        let outcome = require_auth(portal.auth(), "/grades").await;

        assert_eq!(outcome, GuardOutcome::Redirect("/login?redirect=%2Fgrades".into()));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn protected_route_with_valid_token_is_allowed() {
        let fake = FakeBackend::new();
        let (portal, _) = signed_in_portal(fake.clone());

        assert_eq!(require_auth(portal.auth(), "/grades").await, GuardOutcome::Allow);
        assert_eq!(fake.calls(), vec!["current_user"]);
    }

    #[tokio::test]
    async fn protected_route_with_rejected_token_redirects() {
        let fake = FakeBackend::new();
        let (portal, router) = signed_in_portal(fake.clone());
        fake.fail_with(401);

        let outcome = require_auth(portal.auth(), "/courses").await;

        assert_eq!(outcome, GuardOutcome::Redirect("/login?redirect=%2Fcourses".into()));
        assert!(!portal.session().is_authenticated());
        assert_eq!(router.current(), routes::LOGIN);
    }

    #[tokio::test]
    async fn guest_pages_send_signed_in_users_onward() {
        let fake = FakeBackend::new();
        let (portal, _) = signed_in_portal(fake.clone());

        assert_eq!(
            guest_only(portal.auth(), Some("/courses")).await,
            GuardOutcome::Redirect("/courses".into())
        );
        assert_eq!(
            guest_only(portal.auth(), None).await,
            GuardOutcome::Redirect(routes::DASHBOARD.into())
        );

        portal.session().clear();
        assert_eq!(guest_only(portal.auth(), None).await, GuardOutcome::Allow);
    }
}
