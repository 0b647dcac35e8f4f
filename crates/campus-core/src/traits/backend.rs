//! Backend trait.

use async_trait::async_trait;

use crate::Result;
use crate::credentials::{LoginCredentials, Registration};
use crate::model::{
    AttendanceMark, AttendanceSession, AuthPayload, Course, CourseDraft, CourseUpdate, GradeItem,
    GradeItemDraft, GradeItemUpdate, Gradebook, NewSession, StudentGrade, User,
};
use crate::types::{CourseId, GradeItemId, SessionId};

/// The portal API as seen by the stores.
///
/// Exactly one implementation is chosen at startup: the live HTTP backend or
/// the in-memory mock. Implementations that talk to a server are expected to
/// attach the current session's credential to every call themselves.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/auth/login`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload>;

    /// `POST /api/auth/register`.
    async fn register(&self, registration: &Registration) -> Result<AuthPayload>;

    /// `POST /api/auth/logout`.
    async fn logout(&self) -> Result<()>;

    /// `GET /api/auth/me`.
    async fn current_user(&self) -> Result<User>;

    /// `GET /api/courses`.
    async fn list_courses(&self) -> Result<Vec<Course>>;

    /// `POST /api/courses`.
    async fn create_course(&self, draft: &CourseDraft) -> Result<Course>;

    /// `PUT /api/courses/{id}`.
    async fn update_course(&self, id: CourseId, update: &CourseUpdate) -> Result<Course>;

    /// `POST /api/courses/{id}/enroll`.
    async fn enroll(&self, id: CourseId) -> Result<()>;

    /// `GET /api/grades`.
    async fn list_gradebooks(&self) -> Result<Vec<Gradebook>>;

    /// `POST /api/grades/{courseId}/items`.
    async fn create_grade_item(&self, course: CourseId, draft: &GradeItemDraft)
    -> Result<GradeItem>;

    /// `PUT /api/grades/{courseId}/items/{itemId}`.
    async fn update_grade_item(
        &self,
        course: CourseId,
        item: GradeItemId,
        update: &GradeItemUpdate,
    ) -> Result<GradeItem>;

    /// `POST /api/grades/{courseId}/publish`.
    async fn publish_grades(&self, course: CourseId, grades: &[StudentGrade]) -> Result<()>;

    /// `GET /api/attendance/sessions`.
    async fn list_sessions(&self) -> Result<Vec<AttendanceSession>>;

    /// `POST /api/attendance/sessions`.
    async fn create_session(&self, session: &NewSession) -> Result<AttendanceSession>;

    /// `PUT /api/attendance/sessions/{id}/end`.
    async fn end_session(&self, id: SessionId) -> Result<()>;

    /// `POST /api/attendance/sessions/{id}/mark`.
    async fn mark_attendance(&self, id: SessionId) -> Result<AttendanceMark>;
}
