//! Core portal types.
//!
//! These types enforce their invariants at construction time.

mod api_url;
mod ids;

pub use api_url::ApiUrl;
pub use ids::{CourseId, GradeItemId, SessionId, StudentId, UserId};
