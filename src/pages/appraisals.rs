//! Appraisal list page

use tracing::warn;

use super::ListState;
use crate::services::ApiClient;
use crate::types::Appraisal;

pub struct AppraisalListPage {
    client: ApiClient,
    state: ListState<Appraisal>,
}

impl AppraisalListPage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState<Appraisal> {
        &self.state
    }

    pub async fn load(&mut self) {
        self.state = match self.client.appraisals().list().await {
            Ok(items) => ListState::Populated(items),
            Err(e) => {
                warn!("Loading appraisals failed: {}", e);
                ListState::Error("Failed to load appraisals".to_string())
            }
        };
    }

    /// Full reload: back to `Loading`, then fetch again
    pub async fn reload(&mut self) {
        self.state = ListState::Loading;
        self.load().await;
    }
}
