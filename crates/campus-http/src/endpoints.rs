//! REST paths and the wire shapes that differ from the domain types.

use serde::{Deserialize, Serialize};

use campus_core::model::{StudentGrade, User};
use campus_core::types::{CourseId, GradeItemId, SessionId};

pub(crate) const LOGIN: &str = "/api/auth/login";
pub(crate) const REGISTER: &str = "/api/auth/register";
pub(crate) const LOGOUT: &str = "/api/auth/logout";
pub(crate) const ME: &str = "/api/auth/me";
pub(crate) const COURSES: &str = "/api/courses";
pub(crate) const GRADES: &str = "/api/grades";
pub(crate) const SESSIONS: &str = "/api/attendance/sessions";

pub(crate) fn course(id: CourseId) -> String {
    format!("{COURSES}/{id}")
}

pub(crate) fn enroll(id: CourseId) -> String {
    format!("{COURSES}/{id}/enroll")
}

pub(crate) fn grade_items(course: CourseId) -> String {
    format!("{GRADES}/{course}/items")
}

pub(crate) fn grade_item(course: CourseId, item: GradeItemId) -> String {
    format!("{GRADES}/{course}/items/{item}")
}

pub(crate) fn publish(course: CourseId) -> String {
    format!("{GRADES}/{course}/publish")
}

pub(crate) fn end_session(id: SessionId) -> String {
    format!("{SESSIONS}/{id}/end")
}

pub(crate) fn mark(id: SessionId) -> String {
    format!("{SESSIONS}/{id}/mark")
}

/// Response from `GET /api/auth/me`.
#[derive(Debug, Deserialize)]
pub(crate) struct MeResponse {
    pub user: User,
}

/// Request body for publishing a course's grades.
#[derive(Debug, Serialize)]
pub(crate) struct PublishRequest<'a> {
    pub grades: &'a [StudentGrade],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_embed_ids() {
        assert_eq!(enroll(CourseId(3)), "/api/courses/3/enroll");
        assert_eq!(
            grade_item(CourseId(1), GradeItemId(7)),
            "/api/grades/1/items/7"
        );
        assert_eq!(end_session(SessionId(12)), "/api/attendance/sessions/12/end");
    }
}
