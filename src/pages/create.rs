//! Create-appraisal form
//!
//! Projects and active cycles load together. The appraisee selector stays
//! disabled until a project is picked; every project change refetches its
//! members and clears the chosen appraisee. Submission moves
//! `Idle -> Submitting` and either navigates to the new appraisal or returns
//! to `Idle` with an error.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::router::Route;
use crate::services::ApiClient;
use crate::types::{AppraisalCycle, AppraisalStatus, NewAppraisal, Project, ProjectMembership};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
    /// Created and navigated to the detail route
    Done(i64),
}

pub struct CreateAppraisalPage {
    client: ApiClient,
    projects: Vec<Project>,
    cycles: Vec<AppraisalCycle>,
    members: Vec<ProjectMembership>,
    cycle: Option<i64>,
    project: Option<i64>,
    appraisee: Option<i64>,
    discussion_date: Option<NaiveDate>,
    phase: FormPhase,
    error: Option<String>,
}

impl CreateAppraisalPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            projects: Vec::new(),
            cycles: Vec::new(),
            members: Vec::new(),
            cycle: None,
            project: None,
            appraisee: None,
            discussion_date: None,
            phase: FormPhase::Idle,
            error: None,
        }
    }

    /// Fetch projects and active cycles concurrently
    pub async fn load(&mut self) {
        let projects = self.client.projects();
        let cycles = self.client.cycles();

        match tokio::try_join!(projects.list(), cycles.list_active()) {
            Ok((projects, cycles)) => {
                debug!(
                    "Create form loaded {} projects and {} active cycles",
                    projects.len(),
                    cycles.len()
                );
                self.projects = projects;
                self.cycles = cycles;
            }
            Err(e) => {
                warn!("Loading create form failed: {}", e);
                self.error = Some("Failed to load data".to_string());
            }
        }
    }

    /// Pick or clear the project. A new project refetches the appraisee
    /// list; either way the previous appraisee is dropped.
    pub async fn select_project(&mut self, project: Option<i64>) {
        self.project = project;
        self.appraisee = None;
        self.members.clear();

        let Some(project_id) = project else {
            return;
        };

        match self.client.projects().members(project_id).await {
            Ok(members) => {
                self.members = members.into_iter().filter(|m| m.is_appraisable()).collect();
            }
            Err(e) => {
                warn!("Loading members of project {} failed: {}", project_id, e);
                self.error = Some("Failed to load project members".to_string());
            }
        }
    }

    pub fn select_cycle(&mut self, cycle: Option<i64>) {
        self.cycle = cycle;
    }

    /// Only users listed among the appraisable members can be chosen
    pub fn select_appraisee(&mut self, user: Option<i64>) {
        if !self.appraisee_enabled() {
            return;
        }
        self.appraisee = user.filter(|id| self.members.iter().any(|m| m.user == *id));
        if user.is_some() && self.appraisee.is_none() {
            debug!("Ignoring appraisee outside the member list: {:?}", user);
        }
    }

    pub fn set_discussion_date(&mut self, date: Option<NaiveDate>) {
        self.discussion_date = date;
    }

    pub fn appraisee_enabled(&self) -> bool {
        self.project.is_some() && self.phase != FormPhase::Submitting
    }

    /// Create the appraisal as `PENDING` and navigate to it
    pub async fn submit(&mut self) -> Option<i64> {
        if self.phase != FormPhase::Idle {
            return None;
        }
        self.error = None;

        let (Some(cycle), Some(project), Some(appraisee), Some(discussion_date)) =
            (self.cycle, self.project, self.appraisee, self.discussion_date)
        else {
            self.error = Some("Please fill in all required fields".to_string());
            return None;
        };

        self.phase = FormPhase::Submitting;
        let request = NewAppraisal {
            cycle,
            appraisee,
            project,
            discussion_date,
            status: Some(AppraisalStatus::Pending),
        };

        match self.client.appraisals().create(&request).await {
            Ok(created) => {
                info!("Appraisal {} created for user {}", created.id, appraisee);
                self.phase = FormPhase::Done(created.id);
                self.client
                    .transport()
                    .navigator()
                    .navigate(Route::AppraisalDetail(created.id));
                Some(created.id)
            }
            Err(e) => {
                warn!("Creating appraisal failed: {}", e);
                self.error = Some(e.user_message("Failed to create appraisal"));
                self.phase = FormPhase::Idle;
                None
            }
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn cycles(&self) -> &[AppraisalCycle] {
        &self.cycles
    }

    /// Appraisable members of the selected project
    pub fn members(&self) -> &[ProjectMembership] {
        &self.members
    }

    pub fn selected_project(&self) -> Option<i64> {
        self.project
    }

    pub fn selected_appraisee(&self) -> Option<i64> {
        self.appraisee
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
