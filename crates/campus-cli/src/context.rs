//! Builds the portal every command runs against.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::debug;

use campus_core::{ApiUrl, Backend, Portal, SessionHandle};
use campus_http::{ClientConfig, HttpBackend};
use campus_mock::{MockBackend, MockLatency};

use crate::cli::{BackendArgs, Mode};
use crate::navigator::TerminalNavigator;
use crate::session::FileStorage;

pub struct Context {
    pub portal: Portal,
}

impl Context {
    /// Restore the saved session and pick the backend once.
    pub fn build(args: &BackendArgs) -> Result<Self> {
        let storage = FileStorage::default_location()?;
        debug!(path = %storage.path().display(), "Session file");
        let session = SessionHandle::restore(Arc::new(storage));

        let backend: Arc<dyn Backend> = match args.mode {
            Mode::Live => {
                let base = ApiUrl::new(&args.api_base).context("Invalid API base URL")?;
                let config =
                    ClientConfig::new(base).with_timeout(Duration::from_millis(args.timeout_ms));
                debug!(api = %config.base_url, "Using live backend");
                Arc::new(
                    HttpBackend::new(config, session.clone())
                        .context("Failed to create HTTP client")?,
                )
            }
            Mode::Mock => {
                let latency = if args.instant {
                    MockLatency::none()
                } else {
                    MockLatency::default()
                };
                debug!(?latency, "Using mock backend");
                Arc::new(MockBackend::new(session.clone(), latency))
            }
        };

        let navigator = Arc::new(TerminalNavigator::default());
        Ok(Self {
            portal: Portal::new(backend, session, navigator),
        })
    }

    pub fn session(&self) -> &SessionHandle {
        self.portal.session()
    }
}
