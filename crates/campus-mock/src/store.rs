//! In-memory state behind the mock backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::debug;

use campus_core::Result;
use campus_core::error::{Error, HttpError};
use campus_core::model::{
    AttendanceMark, AttendanceSession, AttendanceStatus, Course, CourseDraft, CourseUpdate, GradeItem,
    GradeItemDraft, GradeItemUpdate, Gradebook, NewSession, SessionCourse, StudentGrade,
};
use campus_core::types::{CourseId, GradeItemId, SessionId};

use crate::fixtures;

const NEW_SESSION_STUDENTS: u32 = 25;

fn not_found(what: &str) -> Error {
    HttpError::new(404, json!({ "message": format!("{what} not found") })).into()
}

#[derive(Debug)]
struct Fixtures {
    courses: Vec<Course>,
    gradebooks: Vec<Gradebook>,
    sessions: Vec<AttendanceSession>,
}

/// Fixture data, mutated in place by the mock's write operations.
#[derive(Debug)]
pub(crate) struct MockStore {
    data: Mutex<Fixtures>,
}

impl MockStore {
    pub(crate) fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            data: Mutex::new(Fixtures {
                courses: fixtures::courses(),
                gradebooks: fixtures::gradebooks(),
                sessions: fixtures::sessions(now),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Fixtures> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn courses(&self) -> Vec<Course> {
        self.lock().courses.clone()
    }

    pub(crate) fn gradebooks(&self) -> Vec<Gradebook> {
        self.lock().gradebooks.clone()
    }

    pub(crate) fn sessions(&self) -> Vec<AttendanceSession> {
        self.lock().sessions.clone()
    }

    pub(crate) fn create_course(&self, draft: &CourseDraft) -> Course {
        let mut data = self.lock();
        let id = data.courses.iter().map(|c| c.id.get()).max().unwrap_or(0) + 1;
        let course = draft.clone().into_course(CourseId(id));
        debug!(course_id = id, "Mock course created");
        data.courses.push(course.clone());
        course
    }

    pub(crate) fn update_course(&self, id: CourseId, update: &CourseUpdate) -> Result<Course> {
        let mut data = self.lock();
        let course = data
            .courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Course"))?;
        update.apply_to(course);
        Ok(course.clone())
    }

    pub(crate) fn enroll(&self, id: CourseId) -> Result<()> {
        let mut data = self.lock();
        let course = data
            .courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Course"))?;
        if !course.has_available_spots() {
            return Err(HttpError::new(422, json!({ "message": "Course is full" })).into());
        }
        course.enrolled += 1;
        Ok(())
    }

    pub(crate) fn create_grade_item(&self, course: CourseId, draft: &GradeItemDraft) -> Result<GradeItem> {
        let mut data = self.lock();
        let id = data
            .gradebooks
            .iter()
            .flat_map(|g| g.grade_items.iter())
            .map(|i| i.id.get())
            .max()
            .unwrap_or(0)
            + 1;
        let book = data
            .gradebooks
            .iter_mut()
            .find(|g| g.id == course)
            .ok_or_else(|| not_found("Course"))?;
        let item = GradeItem {
            id: GradeItemId(id),
            name: draft.name.clone(),
            max_score: draft.max_score,
            weight: draft.weight,
        };
        book.grade_items.push(item.clone());
        Ok(item)
    }

    pub(crate) fn update_grade_item(
        &self,
        course: CourseId,
        item: GradeItemId,
        update: &GradeItemUpdate,
    ) -> Result<GradeItem> {
        let mut data = self.lock();
        let existing = data
            .gradebooks
            .iter_mut()
            .filter(|g| g.id == course)
            .flat_map(|g| g.grade_items.iter_mut())
            .find(|i| i.id == item)
            .ok_or_else(|| not_found("Grade item"))?;
        update.apply_to(existing);
        Ok(existing.clone())
    }

    pub(crate) fn publish_grades(&self, course: CourseId, grades: &[StudentGrade]) -> Result<()> {
        let mut data = self.lock();
        let book = data
            .gradebooks
            .iter_mut()
            .find(|g| g.id == course)
            .ok_or_else(|| not_found("Course"))?;
        book.grades = grades.to_vec();
        book.published = true;
        Ok(())
    }

    pub(crate) fn create_session(&self, new: &NewSession) -> AttendanceSession {
        let mut data = self.lock();
        let id = data.sessions.iter().map(|s| s.id.get()).max().unwrap_or(0) + 1;
        let course = data
            .courses
            .iter()
            .find(|c| c.id == new.course_id)
            .map(|c| SessionCourse {
                title: c.title.clone(),
                lecturer: c.lecturer.name.clone(),
            })
            .unwrap_or_else(|| SessionCourse {
                title: "Mock Course".to_string(),
                lecturer: "Mock Lecturer".to_string(),
            });
        let session = AttendanceSession {
            id: SessionId(id),
            course_id: new.course_id,
            course,
            status: AttendanceStatus::Active,
            start_time: new.start_time,
            require_location: new.require_location,
            present_count: 0,
            total_students: NEW_SESSION_STUDENTS,
            attendance_marked: None,
        };
        data.sessions.insert(0, session.clone());
        session
    }

    pub(crate) fn end_session(&self, id: SessionId) -> Result<()> {
        let mut data = self.lock();
        let session = data
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Session"))?;
        session.status = AttendanceStatus::Ended;
        Ok(())
    }

    pub(crate) fn mark_attendance(&self, id: SessionId, at: DateTime<Utc>) -> Result<()> {
        let mut data = self.lock();
        let session = data
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Session"))?;
        if !session.is_active() {
            return Err(HttpError::new(422, json!({ "message": "Session has ended" })).into());
        }
        session.present_count += 1;
        session.attendance_marked = Some(AttendanceMark { timestamp: at });
        Ok(())
    }
}
