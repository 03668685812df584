//! services/app/src/views/navbar.rs

use crate::client::SessionContext;
use dashboard_core::guard::Route;

pub struct Navbar {
    context: SessionContext,
}

impl Navbar {
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }

    /// `"alice (Admin)"`, or `None` when nobody is signed in.
    pub fn label(&self) -> Option<String> {
        self.context
            .user()
            .map(|u| format!("{} ({})", u.username, u.role))
    }

    pub fn logout(&self) -> Route {
        self.context.logout();
        Route::Login
    }
}
