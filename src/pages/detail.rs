//! Appraisal detail page
//!
//! `Loading -> {NotFound | Loaded}`. Inside `Loaded` the rating sheet and the
//! signature pad save independently; each save reports through its own
//! [`Notice`] and re-fetches the appraisal on success.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::Notice;
use crate::aggregator::{self, RatingSheet};
use crate::criteria::Criterion;
use crate::error::Result;
use crate::services::ApiClient;
use crate::signature::SignaturePad;
use crate::types::{Appraisal, AppraisalReview, OverallEvaluation, RatingLevel, ReviewUpdate};

#[derive(Debug)]
pub enum DetailState {
    Loading,
    NotFound(String),
    Loaded(Box<LoadedAppraisal>),
}

#[derive(Debug)]
pub struct LoadedAppraisal {
    pub appraisal: Appraisal,
    /// Review written by the signed-in user, if they review this appraisal
    pub own_review: Option<AppraisalReview>,
    pub sheet: Option<RatingSheet>,
    pub signature: SignaturePad,
    pub evaluation: Option<OverallEvaluation>,
    pub saving_ratings: bool,
    pub saving_signature: bool,
    pub ratings_notice: Option<Notice>,
    pub signature_notice: Option<Notice>,
}

impl LoadedAppraisal {
    /// Mean across completed reviews, for the summary header
    pub fn overall_average(&self) -> Option<f64> {
        aggregator::overall_average(&self.appraisal.reviews)
    }
}

pub struct AppraisalDetailPage {
    client: ApiClient,
    appraisal_id: i64,
    state: DetailState,
}

impl AppraisalDetailPage {
    pub fn new(client: ApiClient, appraisal_id: i64) -> Self {
        Self {
            client,
            appraisal_id,
            state: DetailState::Loading,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn loaded(&self) -> Option<&LoadedAppraisal> {
        match &self.state {
            DetailState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut LoadedAppraisal> {
        match &mut self.state {
            DetailState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub async fn load(&mut self) {
        self.state = DetailState::Loading;
        self.state = match self.fetch().await {
            Ok(loaded) => DetailState::Loaded(Box::new(loaded)),
            Err(e) => {
                warn!("Loading appraisal {} failed: {}", self.appraisal_id, e);
                let message = if e.is_not_found() {
                    "Appraisal not found"
                } else {
                    "Failed to load appraisal"
                };
                DetailState::NotFound(message.to_string())
            }
        };
    }

    async fn fetch(&self) -> Result<LoadedAppraisal> {
        let appraisal = self.client.appraisals().get(self.appraisal_id).await?;

        let evaluation = match appraisal.overall_evaluation.clone() {
            Some(evaluation) => Some(evaluation),
            None => match self.client.evaluations().for_appraisal(appraisal.id).await {
                Ok(evaluation) => evaluation,
                Err(e) => {
                    warn!("Overall evaluation of {} unavailable: {}", appraisal.id, e);
                    None
                }
            },
        };

        let own_review = match self.client.session().current_user()? {
            Some(user) => match aggregator::own_review(&appraisal, &user) {
                Ok(review) => Some(review.clone()),
                Err(e) => {
                    debug!("{}", e);
                    None
                }
            },
            None => None,
        };

        let sheet = own_review.as_ref().map(RatingSheet::for_review);
        let signature = match &own_review {
            Some(review) if review.is_signed() => {
                SignaturePad::with_existing(review.reviewer_signature_base64.clone())
            }
            _ => SignaturePad::default(),
        };

        Ok(LoadedAppraisal {
            appraisal,
            own_review,
            sheet,
            signature,
            evaluation,
            saving_ratings: false,
            saving_signature: false,
            ratings_notice: None,
            signature_notice: None,
        })
    }

    /// Re-fetch after a save, keeping the notices of the current view
    async fn refresh(&mut self) {
        match self.fetch().await {
            Ok(mut fresh) => {
                if let DetailState::Loaded(current) = &mut self.state {
                    fresh.ratings_notice = current.ratings_notice.take();
                    fresh.signature_notice = current.signature_notice.take();
                }
                self.state = DetailState::Loaded(Box::new(fresh));
            }
            Err(e) => warn!("Refreshing appraisal {} failed: {}", self.appraisal_id, e),
        }
    }

    pub fn set_rating(&mut self, criterion: Criterion, rating: RatingLevel) {
        if let Some(sheet) = self.loaded_mut().and_then(|l| l.sheet.as_mut()) {
            sheet.set_rating(criterion, rating);
        }
    }

    pub fn set_comment(&mut self, criterion: Criterion, comments: impl Into<String>) {
        if let Some(sheet) = self.loaded_mut().and_then(|l| l.sheet.as_mut()) {
            sheet.set_comment(criterion, comments);
        }
    }

    /// Persist every rated criterion of the own review
    pub async fn save_ratings(&mut self) {
        let ratings = self.client.ratings();
        let DetailState::Loaded(loaded) = &mut self.state else {
            return;
        };
        let Some(sheet) = loaded.sheet.as_mut() else {
            loaded.ratings_notice = Some(Notice::Error("No review found".to_string()));
            return;
        };

        loaded.saving_ratings = true;
        loaded.ratings_notice = None;
        let result = sheet.save_all(&ratings).await;
        loaded.saving_ratings = false;

        match result {
            Ok(summary) => {
                info!("Saved {} ratings", summary.total());
                loaded.ratings_notice =
                    Some(Notice::Success("Ratings saved successfully!".to_string()));
                self.refresh().await;
            }
            Err(e) => {
                loaded.ratings_notice = Some(Notice::Error(e.user_message("Failed to save ratings")));
            }
        }
    }

    /// Encode the pad and store it on the own review, completing it
    pub async fn save_signature(&mut self) {
        let reviews = self.client.reviews();
        let DetailState::Loaded(loaded) = &mut self.state else {
            return;
        };
        let Some(review_id) = loaded.own_review.as_ref().map(|r| r.id) else {
            loaded.signature_notice = Some(Notice::Error("No review found".to_string()));
            return;
        };

        let before = loaded.signature.clone();
        let mut payload = None;
        match loaded.signature.save(|data| payload = Some(data.to_string())) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                loaded.signature_notice =
                    Some(Notice::Error(e.user_message("Failed to save signature")));
                return;
            }
        }
        let Some(payload) = payload else {
            return;
        };

        loaded.saving_signature = true;
        loaded.signature_notice = None;
        let update = ReviewUpdate {
            is_completed: Some(true),
            reviewer_signature_base64: Some(payload),
            reviewer_signed_at: Some(Utc::now()),
        };
        let result = reviews.update(review_id, &update).await;
        loaded.saving_signature = false;

        match result {
            Ok(_) => {
                info!("Review {} signed", review_id);
                loaded.signature_notice =
                    Some(Notice::Success("Signature saved successfully!".to_string()));
                self.refresh().await;
            }
            Err(e) => {
                // Unlock so the reviewer can retry
                loaded.signature = before;
                loaded.signature_notice =
                    Some(Notice::Error(e.user_message("Failed to save signature")));
            }
        }
    }
}
