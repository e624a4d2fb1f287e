//! Appraisal cycles

use std::sync::Arc;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport};
use crate::types::{AppraisalCycle, CycleStatus, ListPayload};

pub struct CycleService {
    transport: Arc<ApiTransport>,
}

impl CycleService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<AppraisalCycle>> {
        self.fetch(ApiRequest::get("/appraisal-cycles/")).await
    }

    pub async fn list_by_status(&self, status: CycleStatus) -> Result<Vec<AppraisalCycle>> {
        self.fetch(ApiRequest::get("/appraisal-cycles/").query("status", status.as_str()))
            .await
    }

    /// Cycles open for new appraisals
    pub async fn list_active(&self) -> Result<Vec<AppraisalCycle>> {
        self.list_by_status(CycleStatus::Active).await
    }

    async fn fetch(&self, request: ApiRequest) -> Result<Vec<AppraisalCycle>> {
        let payload: ListPayload<AppraisalCycle> = self.transport.send(request).await?;
        Ok(payload.into_vec())
    }
}
