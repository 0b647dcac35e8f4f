//! campus-mock - In-memory fixture backend.
//!
//! [`MockBackend`] answers every portal call from fixture data held for the
//! lifetime of the process, after an artificial delay.

mod backend;
mod fixtures;
mod latency;
mod store;

pub use backend::MockBackend;
pub use latency::MockLatency;
