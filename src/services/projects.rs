//! Projects and their memberships

use std::sync::Arc;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport};
use crate::types::{ListPayload, Project, ProjectMembership};

pub struct ProjectService {
    transport: Arc<ApiTransport>,
}

impl ProjectService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        let payload: ListPayload<Project> = self.transport.send(ApiRequest::get("/projects/")).await?;
        Ok(payload.into_vec())
    }

    pub async fn get(&self, id: i64) -> Result<Project> {
        self.transport
            .send(ApiRequest::get(format!("/projects/{}/", id)))
            .await
    }

    /// Every membership of the project, reporters included
    pub async fn members(&self, project_id: i64) -> Result<Vec<ProjectMembership>> {
        let payload: ListPayload<ProjectMembership> = self
            .transport
            .send(ApiRequest::get(format!("/projects/{}/members/", project_id)))
            .await?;
        Ok(payload.into_vec())
    }

    pub async fn reporters(&self, project_id: i64) -> Result<Vec<ProjectMembership>> {
        let payload: ListPayload<ProjectMembership> = self
            .transport
            .send(ApiRequest::get(format!("/projects/{}/reporters/", project_id)))
            .await?;
        Ok(payload.into_vec())
    }
}
