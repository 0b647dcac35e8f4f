//! Course catalogue and enrollment.

use std::sync::{Arc, RwLock};

use tracing::{debug, instrument};

use crate::Result;
use crate::error::{Error, ValidationError};
use crate::model::{Course, CourseDraft, CourseStatus, CourseUpdate};
use crate::response::ResponseHandler;
use crate::sync::{self, FlagGuard};
use crate::traits::Backend;
use crate::types::CourseId;

const FETCH_FAILED: &str = "Failed to fetch courses";
const ENROLL_FAILED: &str = "Failed to enroll in course";
const CREATE_FAILED: &str = "Failed to create course";
const UPDATE_FAILED: &str = "Failed to update course";

#[derive(Debug, Default)]
struct CourseState {
    courses: Vec<Course>,
    selected: Option<Course>,
    loading: bool,
    error: Option<String>,
}

pub struct CourseStore {
    backend: Arc<dyn Backend>,
    responses: ResponseHandler,
    state: RwLock<CourseState>,
}

impl CourseStore {
    pub fn new(backend: Arc<dyn Backend>, responses: ResponseHandler) -> Self {
        Self {
            backend,
            responses,
            state: RwLock::new(CourseState::default()),
        }
    }

    pub fn courses(&self) -> Vec<Course> {
        sync::read(&self.state).courses.clone()
    }

    pub fn loading(&self) -> bool {
        sync::read(&self.state).loading
    }

    /// Message of the last failed action, cleared when a fetch starts.
    pub fn error(&self) -> Option<String> {
        sync::read(&self.state).error.clone()
    }

    pub fn selected_course(&self) -> Option<Course> {
        sync::read(&self.state).selected.clone()
    }

    pub fn select_course(&self, course: Option<Course>) {
        sync::write(&self.state).selected = course;
    }

    pub fn clear_selected_course(&self) {
        sync::write(&self.state).selected = None;
    }

    pub fn course_by_id(&self, id: CourseId) -> Option<Course> {
        sync::read(&self.state)
            .courses
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Courses with at least one free seat.
    pub fn available_courses(&self) -> Vec<Course> {
        self.filtered(Course::has_available_spots)
    }

    pub fn active_courses(&self) -> Vec<Course> {
        self.filtered(|c| c.status == CourseStatus::Active)
    }

    pub fn upcoming_courses(&self) -> Vec<Course> {
        self.filtered(|c| c.status == CourseStatus::Upcoming)
    }

    /// False for unknown courses.
    pub fn has_available_spots(&self, id: CourseId) -> bool {
        self.course_by_id(id).is_some_and(|c| c.has_available_spots())
    }

    fn filtered(&self, keep: impl Fn(&Course) -> bool) -> Vec<Course> {
        sync::read(&self.state)
            .courses
            .iter()
            .filter(|c| keep(c))
            .cloned()
            .collect()
    }

    /// Replace the catalogue with the backend's.
    #[instrument(skip(self))]
    pub async fn fetch_courses(&self) -> Result<()> {
        let _loading = FlagGuard::raise(&self.state, |s| &mut s.loading);
        sync::write(&self.state).error = None;

        self.reload().await.map_err(|e| self.fail(FETCH_FAILED, e))
    }

    /// Enroll the current user, then refresh the catalogue.
    ///
    /// Unknown and full courses are rejected locally, before any call.
    #[instrument(skip(self))]
    pub async fn enroll_in_course(&self, id: CourseId) -> Result<()> {
        let course = self
            .course_by_id(id)
            .ok_or(ValidationError::CourseNotFound { course_id: id.get() })?;
        if !course.has_available_spots() {
            return Err(ValidationError::CourseFull { course_id: id.get() }.into());
        }

        let _loading = FlagGuard::raise(&self.state, |s| &mut s.loading);
        let result = async {
            self.backend.enroll(id).await?;
            self.reload().await
        }
        .await;
        result.map_err(|e| self.fail(ENROLL_FAILED, e))
    }

    #[instrument(skip_all, fields(code = %draft.code))]
    pub async fn create_course(&self, draft: &CourseDraft) -> Result<Course> {
        draft.validate()?;
        let _loading = FlagGuard::raise(&self.state, |s| &mut s.loading);
        sync::write(&self.state).error = None;

        let result = async {
            let created = self.backend.create_course(draft).await?;
            self.reload().await?;
            Ok::<_, Error>(created)
        }
        .await;
        result.map_err(|e| self.fail(CREATE_FAILED, e))
    }

    #[instrument(skip(self, update))]
    pub async fn update_course(&self, id: CourseId, update: &CourseUpdate) -> Result<Course> {
        update.validate()?;
        let _loading = FlagGuard::raise(&self.state, |s| &mut s.loading);
        sync::write(&self.state).error = None;

        let result = async {
            let updated = self.backend.update_course(id, update).await?;
            self.reload().await?;
            Ok::<_, Error>(updated)
        }
        .await;
        result.map_err(|e| self.fail(UPDATE_FAILED, e))
    }

    async fn reload(&self) -> Result<()> {
        let courses = self.backend.list_courses().await?;
        debug!(count = courses.len(), "Fetched courses");
        sync::write(&self.state).courses = courses;
        Ok(())
    }

    fn fail(&self, message: &str, err: Error) -> Error {
        self.responses.inspect(&err);
        sync::write(&self.state).error = Some(message.to_string());
        err
    }
}
