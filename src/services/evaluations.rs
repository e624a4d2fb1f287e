//! Overall evaluations

use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport};
use crate::types::{ListPayload, OverallEvaluation, OverallEvaluationUpdate};

pub struct EvaluationService {
    transport: Arc<ApiTransport>,
}

impl EvaluationService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// Evaluation of one appraisal.
    ///
    /// Not-found (404, or no row for this appraisal) is `None`; every other
    /// failure propagates.
    pub async fn for_appraisal(&self, appraisal_id: i64) -> Result<Option<OverallEvaluation>> {
        let request = ApiRequest::get("/overall-evaluations/").query("appraisal", appraisal_id);

        match self.transport.send::<ListPayload<OverallEvaluation>>(request).await {
            Ok(payload) => Ok(payload
                .into_vec()
                .into_iter()
                .find(|e| e.appraisal == appraisal_id)),
            Err(e) if e.is_not_found() => {
                debug!("No overall evaluation for appraisal {}", appraisal_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update(
        &self,
        id: i64,
        update: &OverallEvaluationUpdate,
    ) -> Result<OverallEvaluation> {
        self.transport
            .send(ApiRequest::patch(format!("/overall-evaluations/{}/", id), update)?)
            .await
    }
}
