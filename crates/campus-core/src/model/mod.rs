//! Portal records as exchanged with the backend.
//!
//! Field names follow the API's camelCase JSON. Operations over these
//! records live on the stores in [`crate::stores`].

mod attendance;
mod course;
mod grades;
mod user;

pub use attendance::{AttendanceMark, AttendanceSession, AttendanceStatus, NewSession, SessionCourse};
pub use course::{Course, CourseDraft, CourseStatus, CourseUpdate, Lecturer, Student};
pub use grades::{
    CourseInfo, GradeDetail, GradeItem, GradeItemDraft, GradeItemUpdate, GradeReport, Gradebook,
    StudentGrade,
};
pub use user::{AuthPayload, Role, User};
