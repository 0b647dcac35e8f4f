//! campus-core - Types, session state and stores for the campus portal client.
//!
//! The crate is backend-agnostic: the live HTTP client and the in-memory mock
//! both implement [`Backend`], and a [`Portal`] wires one of them to a
//! [`SessionHandle`] and the domain stores.

pub mod credentials;
pub mod error;
pub mod grading;
pub mod model;
pub mod navigation;
pub mod portal;
pub mod response;
pub mod session;
pub mod stores;
mod sync;
pub mod tokens;
pub mod traits;
pub mod types;

#[cfg(test)]
mod testing;

pub use credentials::{LoginCredentials, Registration};
pub use error::{Error, HttpError, TransportError, ValidationError};
pub use model::{
    AttendanceMark, AttendanceSession, AttendanceStatus, AuthPayload, Course, CourseDraft,
    CourseInfo, CourseStatus, CourseUpdate, GradeDetail, GradeItem, GradeItemDraft,
    GradeItemUpdate, GradeReport, Gradebook, Lecturer, NewSession, Role, SessionCourse, Student,
    StudentGrade, User,
};
pub use navigation::{GuardOutcome, Router, guest_only, require_auth, routes};
pub use portal::Portal;
pub use response::ResponseHandler;
pub use session::{AuthState, MemoryStorage, PersistedSession, SessionHandle};
pub use stores::{AttendanceStore, AuthStore, CourseStore, GradeStore};
pub use tokens::Credential;
pub use traits::{Backend, Navigator, SessionStorage};
pub use types::{ApiUrl, CourseId, GradeItemId, SessionId, StudentId, UserId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
