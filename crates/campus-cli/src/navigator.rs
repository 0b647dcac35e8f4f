//! Navigation for a terminal: the only route worth acting on is the login
//! page, which becomes a hint on stderr.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use tracing::debug;

use campus_core::navigation::routes;
use campus_core::Navigator;

#[derive(Debug, Default)]
pub struct TerminalNavigator {
    hinted: AtomicBool,
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &str) {
        if route != routes::LOGIN {
            debug!(route, "Ignoring navigation");
            return;
        }
        if !self.hinted.swap(true, Ordering::SeqCst) {
            eprintln!(
                "{} Your session has ended. Run 'campus auth login' to sign in again.",
                "!".yellow()
            );
        }
    }
}
