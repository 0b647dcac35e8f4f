//! The live [`Backend`].

use async_trait::async_trait;
use tracing::{debug, instrument};

use campus_core::model::{
    AttendanceMark, AttendanceSession, AuthPayload, Course, CourseDraft, CourseUpdate, GradeItem,
    GradeItemDraft, GradeItemUpdate, Gradebook, NewSession, StudentGrade, User,
};
use campus_core::types::{CourseId, GradeItemId, SessionId};
use campus_core::{Backend, LoginCredentials, Registration, Result, SessionHandle};

use crate::client::{ClientConfig, HttpClient};
use crate::endpoints::{self, MeResponse, PublishRequest};

/// Talks to the portal's REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: HttpClient,
}

impl HttpBackend {
    pub fn new(config: ClientConfig, session: SessionHandle) -> Result<Self> {
        Ok(Self::from_client(HttpClient::create(config, session)?))
    }

    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip_all, fields(email = %credentials.email()))]
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload> {
        let payload: AuthPayload = self.client.post(endpoints::LOGIN, credentials).await?.json()?;
        debug!(user_id = %payload.user.id, "Logged in");
        Ok(payload)
    }

    #[instrument(skip_all, fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<AuthPayload> {
        self.client
            .post(endpoints::REGISTER, registration)
            .await?
            .json()
    }

    async fn logout(&self) -> Result<()> {
        self.client.post_empty(endpoints::LOGOUT).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<User> {
        let me: MeResponse = self.client.get(endpoints::ME).await?.json()?;
        Ok(me.user)
    }

    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.client.get(endpoints::COURSES).await?.json()
    }

    async fn create_course(&self, draft: &CourseDraft) -> Result<Course> {
        self.client.post(endpoints::COURSES, draft).await?.json()
    }

    async fn update_course(&self, id: CourseId, update: &CourseUpdate) -> Result<Course> {
        self.client.put(&endpoints::course(id), update).await?.json()
    }

    async fn enroll(&self, id: CourseId) -> Result<()> {
        self.client.post_empty(&endpoints::enroll(id)).await?;
        Ok(())
    }

    async fn list_gradebooks(&self) -> Result<Vec<Gradebook>> {
        self.client.get(endpoints::GRADES).await?.json()
    }

    async fn create_grade_item(&self, course: CourseId, draft: &GradeItemDraft) -> Result<GradeItem> {
        self.client
            .post(&endpoints::grade_items(course), draft)
            .await?
            .json()
    }

    async fn update_grade_item(
        &self,
        course: CourseId,
        item: GradeItemId,
        update: &GradeItemUpdate,
    ) -> Result<GradeItem> {
        self.client
            .put(&endpoints::grade_item(course, item), update)
            .await?
            .json()
    }

    async fn publish_grades(&self, course: CourseId, grades: &[StudentGrade]) -> Result<()> {
        self.client
            .post(&endpoints::publish(course), &PublishRequest { grades })
            .await?;
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<AttendanceSession>> {
        self.client.get(endpoints::SESSIONS).await?.json()
    }

    async fn create_session(&self, session: &NewSession) -> Result<AttendanceSession> {
        self.client.post(endpoints::SESSIONS, session).await?.json()
    }

    async fn end_session(&self, id: SessionId) -> Result<()> {
        self.client.put_empty(&endpoints::end_session(id)).await?;
        Ok(())
    }

    async fn mark_attendance(&self, id: SessionId) -> Result<AttendanceMark> {
        self.client.post_empty(&endpoints::mark(id)).await?.json()
    }
}
