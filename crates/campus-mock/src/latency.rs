//! Artificial response delays.

use std::time::Duration;

/// How long each kind of mock call takes to answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockLatency {
    /// Login and registration.
    pub auth: Duration,
    pub fetch_courses: Duration,
    pub fetch_sessions: Duration,
    pub create_session: Duration,
    pub end_session: Duration,
    pub mark_attendance: Duration,
    /// Everything else.
    pub other: Duration,
}

impl MockLatency {
    /// Answer immediately.
    pub const fn none() -> Self {
        Self {
            auth: Duration::ZERO,
            fetch_courses: Duration::ZERO,
            fetch_sessions: Duration::ZERO,
            create_session: Duration::ZERO,
            end_session: Duration::ZERO,
            mark_attendance: Duration::ZERO,
            other: Duration::ZERO,
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            auth: Duration::from_millis(1000),
            fetch_courses: Duration::from_millis(500),
            fetch_sessions: Duration::from_millis(1000),
            create_session: Duration::from_millis(1500),
            end_session: Duration::from_millis(500),
            mark_attendance: Duration::from_millis(1000),
            other: Duration::from_millis(300),
        }
    }
}
