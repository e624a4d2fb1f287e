//! Appraisal reviews

use std::sync::Arc;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport};
use crate::types::{AppraisalReview, ListPayload, ReviewUpdate};

pub struct ReviewService {
    transport: Arc<ApiTransport>,
}

impl ReviewService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// All visible reviews, or only those of one appraisal
    pub async fn list(&self, appraisal_id: Option<i64>) -> Result<Vec<AppraisalReview>> {
        let mut request = ApiRequest::get("/appraisal-reviews/");
        if let Some(id) = appraisal_id {
            request = request.query("appraisal", id);
        }
        let payload: ListPayload<AppraisalReview> = self.transport.send(request).await?;
        Ok(payload.into_vec())
    }

    pub async fn get(&self, id: i64) -> Result<AppraisalReview> {
        self.transport
            .send(ApiRequest::get(format!("/appraisal-reviews/{}/", id)))
            .await
    }

    pub async fn update(&self, id: i64, update: &ReviewUpdate) -> Result<AppraisalReview> {
        self.transport
            .send(ApiRequest::patch(format!("/appraisal-reviews/{}/", id), update)?)
            .await
    }
}
