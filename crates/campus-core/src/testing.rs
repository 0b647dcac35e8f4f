//! Scriptable backend for store tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::credentials::{LoginCredentials, Registration};
use crate::error::{Error, HttpError};
use crate::model::*;
use crate::navigation::{Router, routes};
use crate::portal::Portal;
use crate::session::SessionHandle;
use crate::tokens::Credential;
use crate::traits::Backend;
use crate::types::*;
use crate::Result;

pub(crate) fn user(role: Role) -> User {
    User {
        id: UserId(1),
        email: "ada@uni.edu".into(),
        name: "Ada Lovelace".into(),
        role,
        avatar: None,
    }
}

pub(crate) fn course(id: u64, capacity: u32, enrolled: u32, status: CourseStatus) -> Course {
    let mut course = CourseDraft::new(
        format!("C{id}"),
        format!("Course {id}"),
        Lecturer {
            id: UserId(9),
            name: "Dr. Smith".into(),
        },
        capacity,
    )
    .into_course(CourseId(id));
    course.enrolled = enrolled;
    course.status = status;
    course
}

pub(crate) fn gradebook() -> Gradebook {
    let item = |id, name: &str, max_score, weight| GradeItem {
        id: GradeItemId(id),
        name: name.into(),
        max_score,
        weight,
    };
    let grade = |student, item, score| StudentGrade {
        student_id: StudentId(student),
        grade_item_id: GradeItemId(item),
        score,
    };
    Gradebook {
        id: CourseId(1),
        code: "CS101".into(),
        name: "Introduction to Programming".into(),
        lecturer: "Dr. Smith".into(),
        students: vec![
            Student {
                id: StudentId(1),
                name: "John Doe".into(),
                email: "john@example.com".into(),
            },
            Student {
                id: StudentId(2),
                name: "Jane Smith".into(),
                email: "jane@example.com".into(),
            },
        ],
        grade_items: vec![
            item(1, "Quiz 1", 20.0, 20.0),
            item(2, "Midterm", 100.0, 30.0),
            item(3, "Final", 100.0, 50.0),
        ],
        grades: vec![grade(1, 1, Some(18.0)), grade(1, 2, Some(85.0)), grade(2, 1, Some(15.0))],
        published: false,
    }
}

pub(crate) fn attendance_session(id: u64, status: AttendanceStatus) -> AttendanceSession {
    AttendanceSession {
        id: SessionId(id),
        course_id: CourseId(1),
        course: SessionCourse {
            title: "Web Development".into(),
            lecturer: "Dr. Smith".into(),
        },
        status,
        start_time: Utc.with_ymd_and_hms(2024, 11, 4, 9, 0, 0).unwrap(),
        require_location: false,
        present_count: 3,
        total_students: 20,
        attendance_marked: None,
    }
}

pub(crate) fn mark_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 4, 9, 5, 0).unwrap()
}

/// Backend double that records calls and keeps just enough state for the
/// stores' re-fetch paths.
#[derive(Default)]
pub(crate) struct FakeBackend {
    calls: Mutex<Vec<&'static str>>,
    fail_status: Mutex<Option<u16>>,
    logout_fails: AtomicBool,
    current_user_rejection: Mutex<Option<Duration>>,
    pub(crate) courses: Mutex<Vec<Course>>,
    course_batches: Mutex<VecDeque<(Duration, Vec<Course>)>>,
    pub(crate) gradebooks: Mutex<Vec<Gradebook>>,
    pub(crate) sessions: Mutex<Vec<AttendanceSession>>,
    pub(crate) published: Mutex<Vec<(CourseId, Vec<StudentGrade>)>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn with_courses(courses: Vec<Course>) -> Arc<Self> {
        let fake = Self::default();
        *fake.courses.lock().unwrap() = courses;
        Arc::new(fake)
    }

    /// Every following call fails with this HTTP status.
    pub(crate) fn fail_with(&self, status: u16) {
        *self.fail_status.lock().unwrap() = Some(status);
    }

    pub(crate) fn fail_logout(&self) {
        self.logout_fails.store(true, Ordering::SeqCst);
    }

    /// `current_user` answers 401 after `delay`; other calls are unaffected.
    pub(crate) fn reject_current_user_after(&self, delay: Duration) {
        *self.current_user_rejection.lock().unwrap() = Some(delay);
    }

    /// Queue a course listing that resolves after `delay`.
    pub(crate) fn queue_courses(&self, delay: Duration, courses: Vec<Course>) {
        self.course_batches.lock().unwrap().push_back((delay, courses));
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn enter(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match *self.fail_status.lock().unwrap() {
            Some(status) => Err(HttpError::new(status, json!({"message": "scripted failure"})).into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload> {
        self.enter("login")?;
        let mut user = user(Role::Lecturer);
        user.email = credentials.email().to_string();
        Ok(AuthPayload {
            user,
            token: Credential::new(format!("token-for-{}", credentials.email())),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload> {
        self.enter("register")?;
        let mut user = user(registration.role);
        user.email = registration.email.clone();
        user.name = registration.display_name();
        Ok(AuthPayload {
            user,
            token: Credential::new("fake-token"),
        })
    }

    async fn logout(&self) -> Result<()> {
        self.enter("logout")?;
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(HttpError::new(500, json!(null)).into());
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        self.enter("current_user")?;
        let rejection = *self.current_user_rejection.lock().unwrap();
        if let Some(delay) = rejection {
            tokio::time::sleep(delay).await;
            return Err(HttpError::new(401, json!({"message": "token expired"})).into());
        }
        let mut user = user(Role::Lecturer);
        user.name = "Ada King".into();
        Ok(user)
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.enter("list_courses")?;
        let batch = self.course_batches.lock().unwrap().pop_front();
        match batch {
            Some((delay, courses)) => {
                tokio::time::sleep(delay).await;
                Ok(courses)
            }
            None => Ok(self.courses.lock().unwrap().clone()),
        }
    }

    async fn create_course(&self, draft: &CourseDraft) -> Result<Course> {
        self.enter("create_course")?;
        let mut courses = self.courses.lock().unwrap();
        let course = draft.clone().into_course(CourseId(courses.len() as u64 + 1));
        courses.push(course.clone());
        Ok(course)
    }

    async fn update_course(&self, id: CourseId, update: &CourseUpdate) -> Result<Course> {
        self.enter("update_course")?;
        let mut courses = self.courses.lock().unwrap();
        let course = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::from(HttpError::new(404, json!(null))))?;
        update.apply_to(course);
        Ok(course.clone())
    }

    async fn enroll(&self, id: CourseId) -> Result<()> {
        self.enter("enroll")?;
        if let Some(course) = self.courses.lock().unwrap().iter_mut().find(|c| c.id == id) {
            course.enrolled += 1;
        }
        Ok(())
    }

    async fn list_gradebooks(&self) -> Result<Vec<Gradebook>> {
        self.enter("list_gradebooks")?;
        Ok(self.gradebooks.lock().unwrap().clone())
    }

    async fn create_grade_item(&self, _course: CourseId, draft: &GradeItemDraft) -> Result<GradeItem> {
        self.enter("create_grade_item")?;
        Ok(GradeItem {
            id: GradeItemId(100),
            name: draft.name.clone(),
            max_score: draft.max_score,
            weight: draft.weight,
        })
    }

    async fn update_grade_item(
        &self,
        _course: CourseId,
        item: GradeItemId,
        update: &GradeItemUpdate,
    ) -> Result<GradeItem> {
        self.enter("update_grade_item")?;
        let mut updated = GradeItem {
            id: item,
            name: "Quiz 1".into(),
            max_score: 20.0,
            weight: 20.0,
        };
        update.apply_to(&mut updated);
        Ok(updated)
    }

    async fn publish_grades(&self, course: CourseId, grades: &[StudentGrade]) -> Result<()> {
        self.enter("publish_grades")?;
        self.published.lock().unwrap().push((course, grades.to_vec()));
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<AttendanceSession>> {
        self.enter("list_sessions")?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn create_session(&self, session: &NewSession) -> Result<AttendanceSession> {
        self.enter("create_session")?;
        let mut created = attendance_session(77, AttendanceStatus::Active);
        created.course_id = session.course_id;
        created.start_time = session.start_time;
        created.require_location = session.require_location;
        created.present_count = 0;
        Ok(created)
    }

    async fn end_session(&self, id: SessionId) -> Result<()> {
        self.enter("end_session")?;
        if let Some(s) = self.sessions.lock().unwrap().iter_mut().find(|s| s.id == id) {
            s.status = AttendanceStatus::Ended;
        }
        Ok(())
    }

    async fn mark_attendance(&self, id: SessionId) -> Result<AttendanceMark> {
        self.enter("mark_attendance")?;
        if let Some(s) = self.sessions.lock().unwrap().iter_mut().find(|s| s.id == id) {
            s.present_count += 1;
        }
        Ok(AttendanceMark {
            timestamp: mark_time(),
        })
    }
}

/// A portal over the fake, signed in as a lecturer, sitting on the dashboard.
pub(crate) fn signed_in_portal(backend: Arc<FakeBackend>) -> (Portal, Arc<Router>) {
    let session = SessionHandle::in_memory();
    session.sign_in(user(Role::Lecturer), Credential::new("fake-token"));
    let router = Arc::new(Router::new(routes::DASHBOARD));
    (Portal::new(backend, session, router.clone()), router)
}
