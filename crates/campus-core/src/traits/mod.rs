//! Core traits for backend, persistence and navigation behavior.

mod backend;
mod navigator;
mod storage;

pub use backend::Backend;
pub use navigator::Navigator;
pub use storage::SessionStorage;
