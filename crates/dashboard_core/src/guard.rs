//! crates/dashboard_core/src/guard.rs
//!
//! Route table and the authentication guard in front of protected views.

use crate::domain::Session;
use std::fmt;

/// Every view the client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Index,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Index => "/",
            Route::Dashboard => "/dashboard",
        }
    }

    /// Parses a path, ignoring a trailing slash and any query string.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Index),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }

    /// Whether the route sits behind the guard.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Index | Route::Dashboard)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Lets a session through only when it carries a token.
///
/// Roles play no part here; a Viewer reaches the same protected pages as an
/// Admin and only sees fewer controls once there.
pub fn guard(session: &Session) -> RouteDecision {
    if session.token().is_some() {
        RouteDecision::Allow
    } else {
        RouteDecision::Redirect(Route::Login)
    }
}

/// Resolves a navigation request to the view that should be shown.
pub fn resolve(path: &str, session: &Session) -> Route {
    let Some(route) = Route::from_path(path) else {
        return resolve(Route::Index.path(), session);
    };
    if !route.is_protected() {
        return route;
    }
    match guard(session) {
        RouteDecision::Redirect(target) => target,
        RouteDecision::Allow if route == Route::Index => Route::Dashboard,
        RouteDecision::Allow => route,
    }
}
