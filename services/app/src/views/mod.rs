//! Controllers for each screen. Every view owns its own view state and
//! exposes a render model; none of them draw anything themselves.

pub mod auth;
pub mod country;
pub mod dashboard;
pub mod navbar;

pub use auth::{LoginView, RegisterView, ViewError};
pub use country::CountrySelector;
pub use dashboard::{Dashboard, DashboardError, DashboardView, EditorState};
pub use navbar::Navbar;

/// Holds a view's busy flag up for as long as it lives. A submission that is
/// dropped mid-request still clears the flag.
pub(crate) struct Busy<'a>(&'a mut bool);

impl<'a> Busy<'a> {
    pub(crate) fn hold(flag: &'a mut bool) -> Self {
        *flag = true;
        Busy(flag)
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
