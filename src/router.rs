//! Client-side routes and the authentication guard
//!
//! Every route except `/login` needs a session. Unknown paths fall back to
//! the dashboard, as does `/`.

use std::sync::Mutex;
use tracing::debug;

use crate::session::Session;

/// A client-side location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Root,
    Dashboard,
    Projects,
    Appraisals,
    CreateAppraisal,
    AppraisalDetail(i64),
}

impl Route {
    /// Match a path; anything unrecognised is the dashboard
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["projects"] => Route::Projects,
            ["appraisals"] => Route::Appraisals,
            ["appraisals", "create"] => Route::CreateAppraisal,
            ["appraisals", id] => match id.parse::<i64>() {
                Ok(id) => Route::AppraisalDetail(id),
                Err(_) => Route::Dashboard,
            },
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Root => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Appraisals => "/appraisals".to_string(),
            Route::CreateAppraisal => "/appraisals/create".to_string(),
            Route::AppraisalDetail(id) => format!("/appraisals/{}", id),
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolve where a request for `route` actually lands.
///
/// Unauthenticated requests for protected routes go to login; `/` goes to
/// the dashboard.
pub fn guard(route: Route, session: &Session) -> Route {
    if route.requires_auth() && !session.is_authenticated() {
        debug!("Guard redirect {} -> /login", route);
        return Route::Login;
    }
    match route {
        Route::Root => Route::Dashboard,
        other => other,
    }
}

/// Receiver of hard navigations (forced logout, post-create redirects)
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records the current location
#[derive(Debug)]
pub struct History {
    current: Mutex<Route>,
    visited: Mutex<Vec<Route>>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            current: Mutex::new(start),
            visited: Mutex::new(vec![start]),
        }
    }

    pub fn current(&self) -> Route {
        self.current
            .lock()
            .map(|r| *r)
            .unwrap_or(Route::Login)
    }

    /// Every location entered, oldest first
    pub fn visited(&self) -> Vec<Route> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        debug!("Navigate -> {}", route);
        if let Ok(mut current) = self.current.lock() {
            *current = route;
        }
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(route);
        }
    }
}
