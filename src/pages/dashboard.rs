//! Dashboard: profile of the signed-in user plus quick stats

use tracing::warn;

use crate::services::ApiClient;
use crate::types::{Appraisal, AppraisalStatus, User};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickStats {
    pub projects: usize,
    /// Pending or in progress
    pub open: usize,
    pub completed: usize,
}

impl QuickStats {
    pub fn from_lists(projects: usize, appraisals: &[Appraisal]) -> Self {
        let completed = appraisals
            .iter()
            .filter(|a| a.status == AppraisalStatus::Completed)
            .count();
        Self {
            projects,
            open: appraisals.len() - completed,
            completed,
        }
    }
}

pub struct DashboardPage {
    client: ApiClient,
    user: Option<User>,
    stats: Option<QuickStats>,
    error: Option<String>,
}

impl DashboardPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            user: None,
            stats: None,
            error: None,
        }
    }

    /// Profile comes from the session; stats are fetched concurrently
    pub async fn load(&mut self) {
        self.user = match self.client.session().current_user() {
            Ok(user) => user,
            Err(e) => {
                warn!("Reading stored user failed: {}", e);
                None
            }
        };

        let projects = self.client.projects();
        let appraisals = self.client.appraisals();
        match tokio::try_join!(projects.list(), appraisals.list()) {
            Ok((projects, appraisals)) => {
                self.stats = Some(QuickStats::from_lists(projects.len(), &appraisals));
            }
            Err(e) => {
                warn!("Loading dashboard stats failed: {}", e);
                self.error = Some("Failed to load stats".to_string());
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Heading shown to the user
    pub fn greeting(&self) -> String {
        match &self.user {
            Some(user) => format!("Welcome, {}!", user.display_name()),
            None => "Welcome!".to_string(),
        }
    }

    pub fn stats(&self) -> Option<QuickStats> {
        self.stats
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
