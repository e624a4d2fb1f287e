//! Page view state machines
//!
//! Each page owns an [`ApiClient`](crate::services::ApiClient) handle and
//! turns service results into local state. Failures never escape a page
//! operation; they land in the page's error state for rendering.

pub mod appraisals;
pub mod create;
pub mod dashboard;
pub mod detail;
pub mod projects;

pub use appraisals::AppraisalListPage;
pub use create::{CreateAppraisalPage, FormPhase};
pub use dashboard::{DashboardPage, QuickStats};
pub use detail::{AppraisalDetailPage, DetailState, LoadedAppraisal};
pub use projects::ProjectListPage;

/// State of a page that shows one list
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    Error(String),
    Populated(Vec<T>),
}

impl<T> ListState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListState::Populated(items) => items,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ListState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome banner of a save sub-flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}
