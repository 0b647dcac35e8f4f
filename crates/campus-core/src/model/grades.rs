//! Gradebooks, graded items and per-student reports.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Student;
use crate::types::{CourseId, GradeItemId, StudentId};

/// A graded piece of work within a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeItem {
    pub id: GradeItemId,
    pub name: String,
    pub max_score: f64,
    /// Relative weight; weights need not sum to any particular total.
    pub weight: f64,
}

/// One student's score on one grade item. `None` means not graded yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGrade {
    pub student_id: StudentId,
    pub grade_item_id: GradeItemId,
    pub score: Option<f64>,
}

/// A course together with its roster, grade items and recorded scores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradebook {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub lecturer: String,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub grade_items: Vec<GradeItem>,
    #[serde(default)]
    pub grades: Vec<StudentGrade>,
    #[serde(default)]
    pub published: bool,
}

impl Gradebook {
    /// All recorded grades of one student.
    pub fn grades_of(&self, student: StudentId) -> Vec<StudentGrade> {
        self.grades
            .iter()
            .filter(|g| g.student_id == student)
            .cloned()
            .collect()
    }

    pub fn has_student(&self, student: StudentId) -> bool {
        self.students.iter().any(|s| s.id == student)
    }
}

/// Input for `POST /api/grades/{courseId}/items`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeItemDraft {
    pub name: String,
    pub max_score: f64,
    pub weight: f64,
}

impl GradeItemDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "must not be empty"));
        }
        if !(self.max_score > 0.0) {
            return Err(ValidationError::field("max_score", "must be positive"));
        }
        if !(self.weight > 0.0) {
            return Err(ValidationError::field("weight", "must be positive"));
        }
        Ok(())
    }
}

/// Partial update for `PUT /api/grades/{courseId}/items/{itemId}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl GradeItemUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_score.is_some_and(|m| !(m > 0.0)) {
            return Err(ValidationError::field("max_score", "must be positive"));
        }
        if self.weight.is_some_and(|w| !(w > 0.0)) {
            return Err(ValidationError::field("weight", "must be positive"));
        }
        Ok(())
    }

    pub fn apply_to(&self, item: &mut GradeItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(max_score) = self.max_score {
            item.max_score = max_score;
        }
        if let Some(weight) = self.weight {
            item.weight = weight;
        }
    }
}

/// Header of a [`GradeReport`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub lecturer: String,
}

/// A grade item with one student's result on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeDetail {
    #[serde(flatten)]
    pub item: GradeItem,
    pub score: Option<f64>,
    /// Score as a rounded percentage of the item's maximum.
    pub percentage: Option<f64>,
}

/// One student's standing in one course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub course_info: CourseInfo,
    pub grades: Vec<GradeDetail>,
    /// Weighted final grade over scored items; `None` when nothing is scored.
    pub final_grade: Option<f64>,
}
