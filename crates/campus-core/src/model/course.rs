//! Courses and their drafts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::GradeItem;
use crate::types::{CourseId, StudentId, UserId};

/// Lifecycle of a course offering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Active,
    Upcoming,
    Completed,
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CourseStatus::Active => "active",
            CourseStatus::Upcoming => "upcoming",
            CourseStatus::Completed => "completed",
        })
    }
}

impl FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CourseStatus::Active),
            "upcoming" => Ok(CourseStatus::Upcoming),
            "completed" => Ok(CourseStatus::Completed),
            other => Err(format!("unknown course status '{other}'")),
        }
    }
}

/// The lecturer teaching a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: UserId,
    pub name: String,
}

/// A student on a course roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
}

/// A course as listed by `GET /api/courses`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lecturer: Lecturer,
    pub capacity: u32,
    pub enrolled: u32,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub grade_items: Vec<GradeItem>,
}

impl Course {
    /// True while at least one seat is free.
    pub fn has_available_spots(&self) -> bool {
        self.enrolled < self.capacity
    }
}

/// Input for creating a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub code: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lecturer: Lecturer,
    pub capacity: u32,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl CourseDraft {
    pub fn new(code: impl Into<String>, title: impl Into<String>, lecturer: Lecturer, capacity: u32) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            description: None,
            lecturer,
            capacity,
            status: CourseStatus::Active,
            rating: None,
            thumbnail: None,
        }
    }

    /// Check the draft locally before it is sent anywhere.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().chars().count() < 3 {
            return Err(ValidationError::field("title", "must be at least 3 characters"));
        }
        if self.capacity < 1 {
            return Err(ValidationError::field("capacity", "must be at least 1"));
        }
        validate_rating(self.rating)
    }

    /// Build the course the draft describes, with no enrollments yet.
    pub fn into_course(self, id: CourseId) -> Course {
        Course {
            id,
            code: self.code,
            title: self.title,
            description: self.description,
            lecturer: self.lecturer,
            capacity: self.capacity,
            enrolled: 0,
            status: self.status,
            rating: self.rating,
            thumbnail: self.thumbnail,
            students: Vec::new(),
            grade_items: Vec::new(),
        }
    }
}

/// Partial update for `PUT /api/courses/{id}`; absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl CourseUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            if title.trim().chars().count() < 3 {
                return Err(ValidationError::field("title", "must be at least 3 characters"));
            }
        }
        if self.capacity == Some(0) {
            return Err(ValidationError::field("capacity", "must be at least 1"));
        }
        validate_rating(self.rating)
    }

    /// Merge the update into an existing course.
    pub fn apply_to(&self, course: &mut Course) {
        if let Some(title) = &self.title {
            course.title = title.clone();
        }
        if let Some(description) = &self.description {
            course.description = Some(description.clone());
        }
        if let Some(capacity) = self.capacity {
            course.capacity = capacity;
        }
        if let Some(status) = self.status {
            course.status = status;
        }
        if let Some(rating) = self.rating {
            course.rating = Some(rating);
        }
        if let Some(thumbnail) = &self.thumbnail {
            course.thumbnail = Some(thumbnail.clone());
        }
    }
}

fn validate_rating(rating: Option<f32>) -> Result<(), ValidationError> {
    match rating {
        Some(r) if !(0.0..=5.0).contains(&r) => {
            Err(ValidationError::field("rating", "must be between 0 and 5"))
        }
        _ => Ok(()),
    }
}
