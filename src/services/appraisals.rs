//! Appraisals

use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport};
use crate::types::{Appraisal, AppraisalUpdate, ListPayload, NewAppraisal};

pub struct AppraisalService {
    transport: Arc<ApiTransport>,
}

impl AppraisalService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Appraisal>> {
        let payload: ListPayload<Appraisal> =
            self.transport.send(ApiRequest::get("/appraisals/")).await?;
        Ok(payload.into_vec())
    }

    pub async fn get(&self, id: i64) -> Result<Appraisal> {
        self.transport
            .send(ApiRequest::get(format!("/appraisals/{}/", id)))
            .await
    }

    pub async fn create(&self, appraisal: &NewAppraisal) -> Result<Appraisal> {
        let created: Appraisal = self
            .transport
            .send(ApiRequest::post("/appraisals/", appraisal)?)
            .await?;
        info!("Created appraisal {}", created.id);
        Ok(created)
    }

    pub async fn update(&self, id: i64, update: &AppraisalUpdate) -> Result<Appraisal> {
        self.transport
            .send(ApiRequest::patch(format!("/appraisals/{}/", id), update)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .send_empty(ApiRequest::delete(format!("/appraisals/{}/", id)))
            .await
    }
}
