//! Subcommand implementations.

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod grades;
