//! The mock [`Backend`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use campus_core::error::{Error, HttpError};
use campus_core::model::{
    AttendanceMark, AttendanceSession, AuthPayload, Course, CourseDraft, CourseUpdate, GradeItem,
    GradeItemDraft, GradeItemUpdate, Gradebook, NewSession, Role, StudentGrade, User,
};
use campus_core::types::{CourseId, GradeItemId, SessionId, UserId};
use campus_core::{Backend, Credential, LoginCredentials, Registration, Result, SessionHandle};

use crate::latency::MockLatency;
use crate::store::MockStore;

const AVATAR: &str = "/default-avatar.jpg";

/// Serves fixture data with artificial latency.
///
/// State lives for as long as the backend does: enrollments, new courses,
/// grade items and attendance marks are visible to later calls. Tokens are
/// the signed-in user serialized as JSON, so [`Backend::current_user`] can
/// answer for a session restored from disk.
#[derive(Debug)]
pub struct MockBackend {
    session: SessionHandle,
    latency: MockLatency,
    store: MockStore,
}

impl MockBackend {
    /// A backend seeded with the fixtures. `session` is read to answer
    /// `current_user`.
    pub fn new(session: SessionHandle, latency: MockLatency) -> Self {
        Self {
            session,
            latency,
            store: MockStore::seeded(Utc::now()),
        }
    }

    /// Read-only access to the collections the mock models.
    ///
    /// Unknown paths fail with [`Error::MockUnsupported`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value: Value = match path {
            "/api/courses" => {
                self.pause(self.latency.fetch_courses).await;
                serde_json::to_value(self.store.courses())?
            }
            "/api/grades" => {
                self.pause(self.latency.other).await;
                serde_json::to_value(self.store.gradebooks())?
            }
            "/api/attendance/sessions" => {
                self.pause(self.latency.fetch_sessions).await;
                serde_json::to_value(self.store.sessions())?
            }
            "/api/auth/me" => {
                self.pause(self.latency.other).await;
                json!({ "user": self.signed_in_user()? })
            }
            other => {
                return Err(Error::MockUnsupported {
                    path: other.to_string(),
                });
            }
        };
        Ok(serde_json::from_value(value)?)
    }

    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn issue(user: User) -> Result<AuthPayload> {
        let token = Credential::new(serde_json::to_string(&user)?);
        Ok(AuthPayload { user, token })
    }

    fn signed_in_user(&self) -> Result<User> {
        self.session
            .credential()
            .and_then(|token| serde_json::from_str::<User>(token.as_str()).ok())
            .ok_or_else(|| HttpError::new(401, json!({ "message": "Unauthenticated." })).into())
    }
}

#[async_trait]
impl Backend for MockBackend {
    #[instrument(skip_all, fields(email = %credentials.email()))]
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload> {
        self.pause(self.latency.auth).await;
        if credentials.email().trim().is_empty() || credentials.password().is_empty() {
            return Err(HttpError::new(
                422,
                json!({ "message": "Email and password are required" }),
            )
            .into());
        }
        debug!("Mock login accepted");
        Self::issue(User {
            id: UserId(1),
            email: credentials.email().to_string(),
            name: "John Doe".to_string(),
            role: Role::Lecturer,
            avatar: Some(AVATAR.to_string()),
        })
    }

    #[instrument(skip_all, fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<AuthPayload> {
        self.pause(self.latency.auth).await;
        Self::issue(User {
            id: UserId(1),
            email: registration.email.clone(),
            name: registration.display_name(),
            role: registration.role,
            avatar: Some(AVATAR.to_string()),
        })
    }

    async fn logout(&self) -> Result<()> {
        self.pause(self.latency.other).await;
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        #[derive(serde::Deserialize)]
        struct Me {
            user: User,
        }
        let me: Me = self.get("/api/auth/me").await?;
        Ok(me.user)
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.get("/api/courses").await
    }

    async fn create_course(&self, draft: &CourseDraft) -> Result<Course> {
        self.pause(self.latency.other).await;
        Ok(self.store.create_course(draft))
    }

    async fn update_course(&self, id: CourseId, update: &CourseUpdate) -> Result<Course> {
        self.pause(self.latency.other).await;
        self.store.update_course(id, update)
    }

    async fn enroll(&self, id: CourseId) -> Result<()> {
        self.pause(self.latency.other).await;
        self.store.enroll(id)
    }

    async fn list_gradebooks(&self) -> Result<Vec<Gradebook>> {
        self.get("/api/grades").await
    }

    async fn create_grade_item(&self, course: CourseId, draft: &GradeItemDraft) -> Result<GradeItem> {
        self.pause(self.latency.other).await;
        self.store.create_grade_item(course, draft)
    }

    async fn update_grade_item(
        &self,
        course: CourseId,
        item: GradeItemId,
        update: &GradeItemUpdate,
    ) -> Result<GradeItem> {
        self.pause(self.latency.other).await;
        self.store.update_grade_item(course, item, update)
    }

    async fn publish_grades(&self, course: CourseId, grades: &[StudentGrade]) -> Result<()> {
        self.pause(self.latency.other).await;
        self.store.publish_grades(course, grades)
    }

    async fn list_sessions(&self) -> Result<Vec<AttendanceSession>> {
        self.get("/api/attendance/sessions").await
    }

    async fn create_session(&self, session: &NewSession) -> Result<AttendanceSession> {
        self.pause(self.latency.create_session).await;
        Ok(self.store.create_session(session))
    }

    async fn end_session(&self, id: SessionId) -> Result<()> {
        self.pause(self.latency.end_session).await;
        self.store.end_session(id)
    }

    async fn mark_attendance(&self, id: SessionId) -> Result<AttendanceMark> {
        self.pause(self.latency.mark_attendance).await;
        let timestamp = Utc::now();
        self.store.mark_attendance(id, timestamp)?;
        Ok(AttendanceMark { timestamp })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use campus_core::navigation::{Router, routes};
    use campus_core::{AttendanceStatus, CourseStatus, Portal, SessionHandle};
    use tokio::time::Instant;

    use super::*;

    fn instant() -> (MockBackend, SessionHandle) {
        let session = SessionHandle::in_memory();
        (MockBackend::new(session.clone(), MockLatency::none()), session)
    }

    #[tokio::test(start_paused = true)]
    async fn default_latency_applies_per_call() {
        let session = SessionHandle::in_memory();
        let backend = MockBackend::new(session, MockLatency::default());

        let start = Instant::now();
        backend.list_courses().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(500));

        let start = Instant::now();
        backend
            .login(&LoginCredentials::new("a@uni.edu", "pw"))
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(1000));

        let start = Instant::now();
        backend.list_sessions().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn serves_course_fixtures() {
        let (backend, _) = instant();
        let courses = backend.list_courses().await.unwrap();

        assert_eq!(courses.len(), 4);
        assert_eq!(courses[0].code, "CS101");
        assert_eq!(courses[2].status, CourseStatus::Upcoming);
        assert!(!courses[2].has_available_spots());
        assert_eq!(courses[3].rating, Some(4.8));
    }

    #[tokio::test]
    async fn unknown_path_is_unsupported() {
        let (backend, _) = instant();
        let err = backend.get::<Value>("/api/timetable").await.unwrap_err();
        assert!(matches!(err, Error::MockUnsupported { path } if path == "/api/timetable"));
    }

    #[tokio::test]
    async fn token_identifies_user_across_restarts() {
        let (backend, session) = instant();
        let payload = backend
            .login(&LoginCredentials::new("grace@uni.edu", "pw"))
            .await
            .unwrap();
        session.sign_in(payload.user.clone(), payload.token);

        let restarted = MockBackend::new(session.clone(), MockLatency::none());
        let me = restarted.current_user().await.unwrap();

        assert_eq!(me, payload.user);
        assert_eq!(me.email, "grace@uni.edu");
    }

    #[tokio::test]
    async fn missing_or_foreign_token_is_unauthorized() {
        let (backend, session) = instant();
        assert!(backend.current_user().await.unwrap_err().is_unauthorized());

        session.sign_in(
            User {
                id: UserId(3),
                email: "x@uni.edu".into(),
                name: "X".into(),
                role: Role::Student,
                avatar: None,
            },
            Credential::new("opaque-live-token"),
        );
        assert!(backend.current_user().await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected() {
        let (backend, _) = instant();
        let err = backend
            .login(&LoginCredentials::new("a@uni.edu", ""))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn enroll_mutates_fixtures() {
        let (backend, _) = instant();

        backend.enroll(CourseId(1)).await.unwrap();
        let courses = backend.list_courses().await.unwrap();
        assert_eq!(courses[0].enrolled, 143);

        let full = backend.enroll(CourseId(3)).await.unwrap_err();
        assert_eq!(full.status(), Some(422));

        let missing = backend.enroll(CourseId(42)).await.unwrap_err();
        assert_eq!(missing.status(), Some(404));
        let missing = backend
            .update_course(CourseId(42), &CourseUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(missing.status(), Some(404));
    }

    #[tokio::test]
    async fn sessions_open_end_and_mark() {
        let (backend, _) = instant();
        let opened = backend
            .create_session(&NewSession {
                course_id: CourseId(2),
                start_time: Utc::now(),
                require_location: false,
            })
            .await
            .unwrap();
        assert_eq!(opened.id, SessionId(2));
        assert_eq!(opened.course.title, "Linear Algebra");
        assert_eq!(opened.total_students, 25);

        backend.mark_attendance(SessionId(1)).await.unwrap();
        backend.end_session(SessionId(1)).await.unwrap();

        let sessions = backend.list_sessions().await.unwrap();
        assert_eq!(sessions[0].id, SessionId(2));
        assert_eq!(sessions[1].present_count, 16);
        assert_eq!(sessions[1].status, AttendanceStatus::Ended);

        let late = backend.mark_attendance(SessionId(1)).await.unwrap_err();
        assert_eq!(late.status(), Some(422));
        assert_eq!(
            backend.end_session(SessionId(9)).await.unwrap_err().status(),
            Some(404)
        );
    }

    #[tokio::test]
    async fn stores_observe_their_own_mutations() {
        let session = SessionHandle::in_memory();
        let backend = Arc::new(MockBackend::new(session.clone(), MockLatency::none()));
        let router = Arc::new(Router::new(routes::LOGIN));
        let portal = Portal::new(backend, session, router);

        portal.auth().login("john@uni.edu", "pw").await.unwrap();
        assert!(portal.auth().check_auth().await);

        portal.courses().fetch_courses().await.unwrap();
        portal.courses().enroll_in_course(CourseId(2)).await.unwrap();
        assert_eq!(portal.courses().course_by_id(CourseId(2)).unwrap().enrolled, 88);

        portal.grades().fetch_grades().await.unwrap();
        portal
            .grades()
            .record_score(CourseId(1), campus_core::StudentId(2), GradeItemId(2), Some(60.0))
            .unwrap();
        portal.grades().publish_grades(CourseId(1)).await.unwrap();
        portal.grades().fetch_grades().await.unwrap();
        let book = portal.grades().gradebook(CourseId(1)).unwrap();
        assert!(book.published);
        assert_eq!(book.grades.len(), 4);
    }
}
