//! Attendance sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CourseId, SessionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Active,
    Ended,
}

/// Course summary embedded in a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionCourse {
    pub title: String,
    pub lecturer: String,
}

/// When the current user marked attendance for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub timestamp: DateTime<Utc>,
}

/// A roll-call window opened by a lecturer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSession {
    pub id: SessionId,
    pub course_id: CourseId,
    pub course: SessionCourse,
    pub status: AttendanceStatus,
    pub start_time: DateTime<Utc>,
    pub require_location: bool,
    pub present_count: u32,
    pub total_students: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_marked: Option<AttendanceMark>,
}

impl AttendanceSession {
    pub fn is_active(&self) -> bool {
        self.status == AttendanceStatus::Active
    }
}

/// Input for `POST /api/attendance/sessions`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub course_id: CourseId,
    pub start_time: DateTime<Utc>,
    pub require_location: bool,
}
