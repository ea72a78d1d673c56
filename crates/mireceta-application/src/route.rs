//! Navigable routes and the admission check for protected views.

use std::fmt;
use std::sync::Arc;

use crate::session::SessionStore;

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Search,
    Detail(String),
    Create,
    Edit(String),
    Favorites,
}

impl Route {
    /// Parses a path such as `/detail/3`.
    ///
    /// The empty path, `/` and anything unknown fall through to `Login`.
    /// Query strings and fragments are ignored. The Spanish paths of the
    /// first release are accepted as aliases.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["search" | "buscar"] => Route::Search,
            ["detail" | "detalle", id] => Route::Detail((*id).to_string()),
            ["create" | "crear"] => Route::Create,
            ["create" | "crear", id] => Route::Edit((*id).to_string()),
            ["favorites" | "favoritos"] => Route::Favorites,
            _ => Route::Login,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Search => "/search".to_string(),
            Route::Detail(id) => format!("/detail/{id}"),
            Route::Create => "/create".to_string(),
            Route::Edit(id) => format!("/create/{id}"),
            Route::Favorites => "/favorites".to_string(),
        }
    }

    /// Every route except `Login` requires a logged-in user.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Redirect(Route),
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allow)
    }
}

/// Decides whether navigation may proceed, based only on the session store.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Admits `route` or redirects to the login view.
    ///
    /// For a protected route this first waits for session initialization, so
    /// a stored session is never mistaken for a logged-out one during startup.
    pub async fn admit(&self, route: &Route) -> Admission {
        if !route.is_protected() {
            return Admission::Allow;
        }

        self.session.wait_initialized().await;

        if self.session.is_logged_in() {
            Admission::Allow
        } else {
            tracing::debug!("[RouteGuard] Redirecting {} to login", route);
            Admission::Redirect(Route::Login)
        }
    }

    /// Redirect applied by the root view while it shows `current`.
    ///
    /// A logged-in user on the login view goes to search; without a user any
    /// protected view goes to login. Returns `None` to stay, including while
    /// the session is still initializing.
    pub fn landing(&self, current: &Route) -> Option<Route> {
        if !self.session.is_initialized() {
            return None;
        }

        let logged_in = self.session.is_logged_in();
        match current {
            Route::Login if logged_in => Some(Route::Search),
            route if route.is_protected() && !logged_in => Some(Route::Login),
            _ => None,
        }
    }
}
