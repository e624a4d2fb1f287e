//! Competency ratings

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::transport::{ApiRequest, ApiTransport};
use crate::types::{CompetencyRating, ListPayload, NewCompetencyRating, RatingUpdate};

/// Persistence seam used by the rating sheet
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn create_rating(&self, rating: NewCompetencyRating) -> Result<CompetencyRating>;

    async fn update_rating(&self, id: i64, update: RatingUpdate) -> Result<CompetencyRating>;

    async fn delete_rating(&self, id: i64) -> Result<()>;
}

pub struct RatingService {
    transport: Arc<ApiTransport>,
}

impl RatingService {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// All visible ratings, or only those of one review
    pub async fn list(&self, review_id: Option<i64>) -> Result<Vec<CompetencyRating>> {
        let mut request = ApiRequest::get("/competency-ratings/");
        if let Some(id) = review_id {
            request = request.query("appraisal_review", id);
        }
        let payload: ListPayload<CompetencyRating> = self.transport.send(request).await?;
        Ok(payload.into_vec())
    }

    pub async fn create(&self, rating: &NewCompetencyRating) -> Result<CompetencyRating> {
        self.transport
            .send(ApiRequest::post("/competency-ratings/", rating)?)
            .await
    }

    pub async fn update(&self, id: i64, update: &RatingUpdate) -> Result<CompetencyRating> {
        self.transport
            .send(ApiRequest::patch(format!("/competency-ratings/{}/", id), update)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .send_empty(ApiRequest::delete(format!("/competency-ratings/{}/", id)))
            .await
    }
}

#[async_trait]
impl RatingStore for RatingService {
    async fn create_rating(&self, rating: NewCompetencyRating) -> Result<CompetencyRating> {
        self.create(&rating).await
    }

    async fn update_rating(&self, id: i64, update: RatingUpdate) -> Result<CompetencyRating> {
        self.update(id, &update).await
    }

    async fn delete_rating(&self, id: i64) -> Result<()> {
        self.delete(id).await
    }
}
