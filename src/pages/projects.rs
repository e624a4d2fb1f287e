//! Project list page

use tracing::warn;

use super::ListState;
use crate::services::ApiClient;
use crate::types::Project;

pub struct ProjectListPage {
    client: ApiClient,
    state: ListState<Project>,
}

impl ProjectListPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState<Project> {
        &self.state
    }

    pub async fn load(&mut self) {
        self.state = match self.client.projects().list().await {
            Ok(items) => ListState::Populated(items),
            Err(e) => {
                warn!("Loading projects failed: {}", e);
                ListState::Error("Failed to load projects".to_string())
            }
        };
    }

    pub async fn reload(&mut self) {
        self.state = ListState::Loading;
        self.load().await;
    }
}
