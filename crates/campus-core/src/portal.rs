//! Wiring of one backend, one session and the stores that share them.

use std::sync::Arc;

use crate::response::ResponseHandler;
use crate::session::SessionHandle;
use crate::stores::{AttendanceStore, AuthStore, CourseStore, GradeStore};
use crate::traits::{Backend, Navigator};

/// Everything a front end needs, built once at startup.
///
/// ```
/// use std::sync::Arc;
/// use campus_core::{Portal, Router, SessionHandle, routes};
/// # fn backend() -> Arc<dyn campus_core::Backend> { unimplemented!() }
/// # fn run() {
/// let router = Arc::new(Router::new(routes::DASHBOARD));
/// let portal = Portal::new(backend(), SessionHandle::in_memory(), router);
/// assert!(!portal.auth().is_authenticated());
/// # }
/// ```
pub struct Portal {
    session: SessionHandle,
    auth: AuthStore,
    courses: CourseStore,
    grades: GradeStore,
    attendance: AttendanceStore,
}

impl Portal {
    pub fn new(backend: Arc<dyn Backend>, session: SessionHandle, navigator: Arc<dyn Navigator>) -> Self {
        let responses = ResponseHandler::new(session.clone(), navigator);
        Self {
            auth: AuthStore::new(backend.clone(), session.clone(), responses.clone()),
            courses: CourseStore::new(backend.clone(), responses.clone()),
            grades: GradeStore::new(backend.clone(), responses.clone()),
            attendance: AttendanceStore::new(backend, responses),
            session,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn courses(&self) -> &CourseStore {
        &self.courses
    }

    pub fn grades(&self) -> &GradeStore {
        &self.grades
    }

    pub fn attendance(&self) -> &AttendanceStore {
        &self.attendance
    }
}
