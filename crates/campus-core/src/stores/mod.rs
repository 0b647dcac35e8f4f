//! Client-side state for each domain, each with its own loading flag and
//! error slot.
//!
//! Stores talk to whichever [`Backend`](crate::traits::Backend) was chosen at
//! startup and route every failure through the shared
//! [`ResponseHandler`](crate::response::ResponseHandler) before handing it
//! back to the caller.
//!
//! Overlapping fetches are not coordinated: whichever response resolves last
//! wins.

mod attendance;
mod auth;
mod courses;
mod grades;

pub use attendance::AttendanceStore;
pub use auth::AuthStore;
pub use courses::CourseStore;
pub use grades::GradeStore;
