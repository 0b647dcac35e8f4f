//! Gradebooks, grade items and publication.

use std::sync::{Arc, RwLock};

use tracing::{debug, instrument};

use crate::Result;
use crate::error::{Error, ValidationError};
use crate::grading;
use crate::model::{
    CourseInfo, GradeDetail, GradeItem, GradeItemDraft, GradeItemUpdate, GradeReport, Gradebook,
    StudentGrade,
};
use crate::response::ResponseHandler;
use crate::sync::{self, FlagGuard};
use crate::traits::Backend;
use crate::types::{CourseId, GradeItemId, StudentId};

const LOAD_FAILED: &str = "Failed to load grades";
const CREATE_ITEM_FAILED: &str = "Failed to create grade item";
const UPDATE_ITEM_FAILED: &str = "Failed to update grade item";
const PUBLISH_FAILED: &str = "Failed to publish grades";

#[derive(Debug, Default)]
struct GradeState {
    gradebooks: Vec<Gradebook>,
    loading: bool,
    saving: bool,
    error: Option<String>,
}

pub struct GradeStore {
    backend: Arc<dyn Backend>,
    responses: ResponseHandler,
    state: RwLock<GradeState>,
}

impl GradeStore {
    pub fn new(backend: Arc<dyn Backend>, responses: ResponseHandler) -> Self {
        Self {
            backend,
            responses,
            state: RwLock::new(GradeState::default()),
        }
    }

    pub fn gradebooks(&self) -> Vec<Gradebook> {
        sync::read(&self.state).gradebooks.clone()
    }

    pub fn gradebook(&self, course: CourseId) -> Option<Gradebook> {
        sync::read(&self.state)
            .gradebooks
            .iter()
            .find(|g| g.id == course)
            .cloned()
    }

    pub fn loading(&self) -> bool {
        sync::read(&self.state).loading
    }

    /// True while a grade item or publication is being written.
    pub fn saving(&self) -> bool {
        sync::read(&self.state).saving
    }

    pub fn error(&self) -> Option<String> {
        sync::read(&self.state).error.clone()
    }

    /// Gradebooks the student is enrolled in.
    pub fn courses_by_student(&self, student: StudentId) -> Vec<Gradebook> {
        sync::read(&self.state)
            .gradebooks
            .iter()
            .filter(|g| g.has_student(student))
            .cloned()
            .collect()
    }

    /// Gradebooks taught by the named lecturer.
    pub fn courses_by_lecturer(&self, lecturer: &str) -> Vec<Gradebook> {
        sync::read(&self.state)
            .gradebooks
            .iter()
            .filter(|g| g.lecturer == lecturer)
            .cloned()
            .collect()
    }

    /// One student's report for one course, or `None` for an unknown course.
    pub fn student_grades(&self, course: CourseId, student: StudentId) -> Option<GradeReport> {
        let state = sync::read(&self.state);
        let book = state.gradebooks.iter().find(|g| g.id == course)?;
        let grades = book.grades_of(student);

        let details = book
            .grade_items
            .iter()
            .map(|item| {
                let score = grades
                    .iter()
                    .find(|g| g.grade_item_id == item.id)
                    .and_then(|g| g.score);
                GradeDetail {
                    item: item.clone(),
                    score,
                    percentage: score.map(|s| grading::percentage(s, item)),
                }
            })
            .collect();

        Some(GradeReport {
            course_info: CourseInfo {
                id: book.id,
                code: book.code.clone(),
                name: book.name.clone(),
                lecturer: book.lecturer.clone(),
            },
            grades: details,
            final_grade: grading::final_grade(&book.grade_items, &grades),
        })
    }

    pub fn final_grade(&self, course: CourseId, student: StudentId) -> Option<f64> {
        self.student_grades(course, student)?.final_grade
    }

    #[instrument(skip(self))]
    pub async fn fetch_grades(&self) -> Result<()> {
        let _loading = FlagGuard::raise(&self.state, |s| &mut s.loading);
        sync::write(&self.state).error = None;

        match self.backend.list_gradebooks().await {
            Ok(gradebooks) => {
                debug!(count = gradebooks.len(), "Fetched gradebooks");
                sync::write(&self.state).gradebooks = gradebooks;
                Ok(())
            }
            Err(e) => Err(self.fail(LOAD_FAILED, e)),
        }
    }

    /// Add a grade item and append it to the course's gradebook.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_grade_item(&self, course: CourseId, draft: &GradeItemDraft) -> Result<GradeItem> {
        draft.validate()?;
        let _saving = FlagGuard::raise(&self.state, |s| &mut s.saving);

        let item = self
            .backend
            .create_grade_item(course, draft)
            .await
            .map_err(|e| self.fail(CREATE_ITEM_FAILED, e))?;

        let mut state = sync::write(&self.state);
        if let Some(book) = state.gradebooks.iter_mut().find(|g| g.id == course) {
            book.grade_items.push(item.clone());
        }
        Ok(item)
    }

    #[instrument(skip(self, update))]
    pub async fn update_grade_item(
        &self,
        course: CourseId,
        item: GradeItemId,
        update: &GradeItemUpdate,
    ) -> Result<GradeItem> {
        update.validate()?;
        let _saving = FlagGuard::raise(&self.state, |s| &mut s.saving);

        let updated = self
            .backend
            .update_grade_item(course, item, update)
            .await
            .map_err(|e| self.fail(UPDATE_ITEM_FAILED, e))?;

        let mut state = sync::write(&self.state);
        if let Some(existing) = state
            .gradebooks
            .iter_mut()
            .filter(|g| g.id == course)
            .flat_map(|g| g.grade_items.iter_mut())
            .find(|i| i.id == item)
        {
            *existing = updated.clone();
        }
        Ok(updated)
    }

    /// Record a score locally; nothing is sent until the course is published.
    ///
    /// Returns false for an unknown course; an item the course does not have
    /// is rejected. A recorded score marks the gradebook as having
    /// unpublished changes.
    pub fn record_score(
        &self,
        course: CourseId,
        student: StudentId,
        item: GradeItemId,
        score: Option<f64>,
    ) -> std::result::Result<bool, ValidationError> {
        if score.is_some_and(|s| !(s >= 0.0)) {
            return Err(ValidationError::field("score", "must not be negative"));
        }

        let mut state = sync::write(&self.state);
        let Some(book) = state.gradebooks.iter_mut().find(|g| g.id == course) else {
            return Ok(false);
        };
        let Some(max) = book.grade_items.iter().find(|i| i.id == item).map(|i| i.max_score) else {
            return Err(ValidationError::field("grade_item", "not found"));
        };
        if score.is_some_and(|s| s > max) {
            return Err(ValidationError::field("score", format!("must not exceed {max}")));
        }

        match book
            .grades
            .iter_mut()
            .find(|g| g.student_id == student && g.grade_item_id == item)
        {
            Some(existing) => existing.score = score,
            None => book.grades.push(StudentGrade {
                student_id: student,
                grade_item_id: item,
                score,
            }),
        }
        book.published = false;
        Ok(true)
    }

    /// Send the course's recorded grades and mark the gradebook published.
    #[instrument(skip(self))]
    pub async fn publish_grades(&self, course: CourseId) -> Result<()> {
        let grades = self
            .gradebook(course)
            .map(|g| g.grades)
            .ok_or(ValidationError::CourseNotFound { course_id: course.get() })?;
        let _saving = FlagGuard::raise(&self.state, |s| &mut s.saving);

        self.backend
            .publish_grades(course, &grades)
            .await
            .map_err(|e| self.fail(PUBLISH_FAILED, e))?;

        if let Some(book) = sync::write(&self.state)
            .gradebooks
            .iter_mut()
            .find(|g| g.id == course)
        {
            book.published = true;
        }
        Ok(())
    }

    fn fail(&self, message: &str, err: Error) -> Error {
        self.responses.inspect(&err);
        sync::write(&self.state).error = Some(message.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;
    use crate::model::{GradeItemDraft, GradeItemUpdate};
    use crate::navigation::routes;
    use crate::testing::{FakeBackend, gradebook, signed_in_portal};
    use crate::types::{CourseId, GradeItemId, StudentId};

    fn loaded() -> (std::sync::Arc<FakeBackend>, crate::portal::Portal) {
        let fake = FakeBackend::new();
        fake.gradebooks.lock().unwrap().push(gradebook());
        let (portal, _) = signed_in_portal(fake.clone());
        (fake, portal)
    }

    #[tokio::test]
    async fn report_weights_scored_items_only() {
        let (_, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();

        let report = store.student_grades(CourseId(1), StudentId(1)).unwrap();

        assert_eq!(report.course_info.code, "CS101");
        assert_eq!(report.grades.len(), 3);
        assert_eq!(report.grades[0].percentage, Some(90.0));
        assert_eq!(report.grades[2].score, None);
        assert_eq!(report.grades[2].percentage, None);
        // (90 * 20 + 85 * 30) / 50
        assert_eq!(report.final_grade, Some(87.0));
        assert!(store.student_grades(CourseId(9), StudentId(1)).is_none());
    }

    #[tokio::test]
    async fn student_without_scores_has_no_final_grade() {
        let (_, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();

        assert_eq!(store.final_grade(CourseId(1), StudentId(3)), None);
    }

    #[tokio::test]
    async fn filters_by_student_and_lecturer() {
        let (_, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();

        assert_eq!(store.courses_by_student(StudentId(2)).len(), 1);
        assert!(store.courses_by_student(StudentId(7)).is_empty());
        assert_eq!(store.courses_by_lecturer("Dr. Smith").len(), 1);
        assert!(store.courses_by_lecturer("Prof. Nobody").is_empty());
    }

    #[tokio::test]
    async fn load_failure_sets_message() {
        let (fake, portal) = loaded();
        fake.fail_with(503);

        assert!(portal.grades().fetch_grades().await.is_err());
        assert_eq!(portal.grades().error().as_deref(), Some("Failed to load grades"));
        assert!(!portal.grades().loading());
    }

    #[tokio::test]
    async fn record_score_upserts_locally() {
        let (fake, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();

        assert!(store.record_score(CourseId(1), StudentId(2), GradeItemId(2), Some(70.0)).unwrap());
        assert!(store.record_score(CourseId(1), StudentId(1), GradeItemId(1), Some(20.0)).unwrap());
        assert!(!store.record_score(CourseId(5), StudentId(1), GradeItemId(1), Some(1.0)).unwrap());
        assert!(store.record_score(CourseId(1), StudentId(1), GradeItemId(1), Some(-1.0)).is_err());
        assert!(store.record_score(CourseId(1), StudentId(1), GradeItemId(1), Some(21.0)).is_err());

        let report = store.student_grades(CourseId(1), StudentId(1)).unwrap();
        assert_eq!(report.grades[0].score, Some(20.0));
        assert_eq!(store.final_grade(CourseId(1), StudentId(2)), Some(72.0));
        assert_eq!(fake.calls(), vec!["list_gradebooks"]);
    }

    #[tokio::test]
    async fn publish_sends_recorded_grades() {
        let (fake, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();
        store
            .record_score(CourseId(1), StudentId(2), GradeItemId(3), Some(60.0))
            .unwrap();

        store.publish_grades(CourseId(1)).await.unwrap();

        let published = fake.published.lock().unwrap();
        assert_eq!(published[0].0, CourseId(1));
        assert_eq!(published[0].1.len(), 4);
        assert!(store.gradebook(CourseId(1)).unwrap().published);
        assert!(!store.saving());
    }

    #[tokio::test]
    async fn publish_failure_keeps_unpublished() {
        let (fake, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();
        fake.fail_with(500);

        assert!(store.publish_grades(CourseId(1)).await.is_err());
        assert_eq!(store.error().as_deref(), Some("Failed to publish grades"));
        assert!(!store.gradebook(CourseId(1)).unwrap().published);
    }

    #[tokio::test]
    async fn publish_unknown_course_makes_no_call() {
        let (fake, portal) = loaded();
        assert!(portal.grades().publish_grades(CourseId(8)).await.is_err());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn grade_items_are_appended_and_patched() {
        let (_, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();

        let draft = GradeItemDraft {
            name: "Project".into(),
            max_score: 50.0,
            weight: 10.0,
        };
        let created = store.create_grade_item(CourseId(1), &draft).await.unwrap();
        assert_eq!(store.gradebook(CourseId(1)).unwrap().grade_items.len(), 4);
        assert_eq!(created.name, "Project");

        let update = GradeItemUpdate {
            weight: Some(25.0),
            ..Default::default()
        };
        store
            .update_grade_item(CourseId(1), GradeItemId(1), &update)
            .await
            .unwrap();
        let items = store.gradebook(CourseId(1)).unwrap().grade_items;
        assert_eq!(items[0].weight, 25.0);
        assert_eq!(items[0].name, "Quiz 1");
    }

    #[tokio::test]
    async fn grade_item_failure_sets_message() {
        let (fake, portal) = loaded();
        fake.fail_with(500);
        let draft = GradeItemDraft {
            name: "Project".into(),
            max_score: 50.0,
            weight: 10.0,
        };

        assert!(portal.grades().create_grade_item(CourseId(1), &draft).await.is_err());
        assert_eq!(
            portal.grades().error().as_deref(),
            Some("Failed to create grade item")
        );
    }

    #[tokio::test]
    async fn unknown_grade_item_is_rejected() {
        let (fake, portal) = loaded();
        let store = portal.grades();
        store.fetch_grades().await.unwrap();

        let err = store
            .record_score(CourseId(1), StudentId(1), GradeItemId(999), Some(1e9))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Field { field: "grade_item", .. }));

        store.publish_grades(CourseId(1)).await.unwrap();
        let published = fake.published.lock().unwrap();
        assert!(published[0].1.iter().all(|g| g.grade_item_id != GradeItemId(999)));
    }

    #[tokio::test]
    async fn unauthorized_fetch_tears_down_session() {
        let fake = FakeBackend::new();
        let (portal, router) = signed_in_portal(fake.clone());
        fake.fail_with(401);

        let err = portal.grades().fetch_grades().await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!portal.auth().is_authenticated());
        assert_eq!(router.current(), routes::LOGIN);
        assert_eq!(portal.grades().error().as_deref(), Some("Failed to load grades"));
    }
}
