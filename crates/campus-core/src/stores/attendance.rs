//! Attendance sessions and the current user's own marks.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::Result;
use crate::error::Error;
use crate::model::{AttendanceSession, AttendanceStatus, NewSession};
use crate::response::ResponseHandler;
use crate::sync::{self, FlagGuard};
use crate::traits::Backend;
use crate::types::SessionId;

const LOAD_FAILED: &str = "Failed to load attendance sessions";
const CREATE_FAILED: &str = "Failed to create attendance session";
const END_FAILED: &str = "Failed to end session";
const MARK_FAILED: &str = "Failed to mark attendance";

#[derive(Debug, Default)]
struct AttendanceState {
    sessions: Vec<AttendanceSession>,
    marked: HashMap<SessionId, DateTime<Utc>>,
    loading: bool,
    creating_session: bool,
    error: Option<String>,
}

pub struct AttendanceStore {
    backend: Arc<dyn Backend>,
    responses: ResponseHandler,
    state: RwLock<AttendanceState>,
}

impl AttendanceStore {
    pub fn new(backend: Arc<dyn Backend>, responses: ResponseHandler) -> Self {
        Self {
            backend,
            responses,
            state: RwLock::new(AttendanceState::default()),
        }
    }

    pub fn sessions(&self) -> Vec<AttendanceSession> {
        sync::read(&self.state).sessions.clone()
    }

    pub fn active_sessions(&self) -> Vec<AttendanceSession> {
        self.with_status(AttendanceStatus::Active)
    }

    pub fn ended_sessions(&self) -> Vec<AttendanceSession> {
        self.with_status(AttendanceStatus::Ended)
    }

    fn with_status(&self, status: AttendanceStatus) -> Vec<AttendanceSession> {
        sync::read(&self.state)
            .sessions
            .iter()
            .filter(|s| s.status == status)
            .cloned()
            .collect()
    }

    pub fn loading(&self) -> bool {
        sync::read(&self.state).loading
    }

    pub fn creating_session(&self) -> bool {
        sync::read(&self.state).creating_session
    }

    pub fn error(&self) -> Option<String> {
        sync::read(&self.state).error.clone()
    }

    /// Whether the current user marked this session during this run.
    pub fn has_marked_attendance(&self, session: SessionId) -> bool {
        sync::read(&self.state).marked.contains_key(&session)
    }

    pub fn attendance_time(&self, session: SessionId) -> Option<DateTime<Utc>> {
        sync::read(&self.state).marked.get(&session).copied()
    }

    #[instrument(skip(self))]
    pub async fn fetch_sessions(&self) -> Result<()> {
        let _loading = FlagGuard::raise(&self.state, |s| &mut s.loading);
        sync::write(&self.state).error = None;

        self.reload().await.map_err(|e| self.fail(LOAD_FAILED, e))
    }

    /// Open a session; the new one goes to the front of the list.
    #[instrument(skip(self))]
    pub async fn create_session(&self, session: &NewSession) -> Result<AttendanceSession> {
        let _creating = FlagGuard::raise(&self.state, |s| &mut s.creating_session);
        sync::write(&self.state).error = None;

        let created = self
            .backend
            .create_session(session)
            .await
            .map_err(|e| self.fail(CREATE_FAILED, e))?;
        debug!(session_id = %created.id, "Session opened");
        sync::write(&self.state).sessions.insert(0, created.clone());
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn end_session(&self, session: SessionId) -> Result<()> {
        let result = async {
            self.backend.end_session(session).await?;
            self.reload().await
        }
        .await;
        result.map_err(|e| self.fail(END_FAILED, e))
    }

    /// Mark the current user present and remember when.
    #[instrument(skip(self))]
    pub async fn mark_attendance(&self, session: SessionId) -> Result<DateTime<Utc>> {
        let result = async {
            let mark = self.backend.mark_attendance(session).await?;
            sync::write(&self.state).marked.insert(session, mark.timestamp);
            self.reload().await?;
            Ok::<_, Error>(mark.timestamp)
        }
        .await;
        result.map_err(|e| self.fail(MARK_FAILED, e))
    }

    async fn reload(&self) -> Result<()> {
        let sessions = self.backend.list_sessions().await?;
        debug!(count = sessions.len(), "Fetched attendance sessions");
        sync::write(&self.state).sessions = sessions;
        Ok(())
    }

    fn fail(&self, message: &str, err: Error) -> Error {
        self.responses.inspect(&err);
        sync::write(&self.state).error = Some(message.to_string());
        err
    }
}
