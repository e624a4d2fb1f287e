//! Rating sheet for one reviewer's review
//!
//! Holds the per-criterion rating and comment a reviewer is editing, seeded
//! from what the backend already has. Edits are local until [`RatingSheet::save_all`],
//! which upserts one record per rated criterion: criteria with a persisted
//! rating are patched, the rest are created. A cleared rating that was
//! already persisted is deleted on save.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::criteria::Criterion;
use crate::error::{AppraiseError, Result};
use crate::services::RatingStore;
use crate::types::{
    Appraisal, AppraisalReview, CompetencyRating, NewCompetencyRating, RatingCategory, RatingLevel,
    RatingUpdate, User,
};

/// Local state of one criterion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingEntry {
    pub rating: Option<RatingLevel>,
    pub comments: String,
    persisted_id: Option<i64>,
}

impl RatingEntry {
    /// Id of the backend record this entry writes to, if any
    pub fn persisted_id(&self) -> Option<i64> {
        self.persisted_id
    }
}

/// Outcome of a successful save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SaveSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

/// Editable ratings of one review
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSheet {
    review_id: i64,
    entries: BTreeMap<Criterion, RatingEntry>,
}

impl RatingSheet {
    /// Empty sheet for a review with no ratings yet
    pub fn new(review_id: i64) -> Self {
        Self {
            review_id,
            entries: BTreeMap::new(),
        }
    }

    /// Seed from a review's persisted ratings.
    ///
    /// Where the backend holds several rows for one criterion the newest
    /// (latest `created_at`, then highest id) wins. Rows naming a criterion
    /// outside the fixed list are skipped.
    pub fn for_review(review: &AppraisalReview) -> Self {
        let mut sheet = Self::new(review.id);
        let mut newest: BTreeMap<Criterion, &CompetencyRating> = BTreeMap::new();

        for rating in &review.competency_ratings {
            let Some(criterion) = Criterion::from_name(&rating.criterion_name) else {
                warn!(
                    "Skipping rating {} with unknown criterion '{}'",
                    rating.id, rating.criterion_name
                );
                continue;
            };
            let replace = match newest.get(&criterion) {
                Some(current) => (rating.created_at, rating.id) > (current.created_at, current.id),
                None => true,
            };
            if replace {
                newest.insert(criterion, rating);
            }
        }

        for (criterion, rating) in newest {
            sheet.entries.insert(
                criterion,
                RatingEntry {
                    rating: Some(rating.rating),
                    comments: rating.comments.clone(),
                    persisted_id: Some(rating.id),
                },
            );
        }

        debug!(
            "Seeded sheet for review {} with {} ratings",
            review.id,
            sheet.entries.len()
        );
        sheet
    }

    pub fn review_id(&self) -> i64 {
        self.review_id
    }

    pub fn set_rating(&mut self, criterion: Criterion, rating: RatingLevel) {
        self.entries.entry(criterion).or_default().rating = Some(rating);
    }

    pub fn clear_rating(&mut self, criterion: Criterion) {
        if let Some(entry) = self.entries.get_mut(&criterion) {
            entry.rating = None;
        }
    }

    pub fn set_comment(&mut self, criterion: Criterion, comments: impl Into<String>) {
        self.entries.entry(criterion).or_default().comments = comments.into();
    }

    pub fn entry(&self, criterion: Criterion) -> Option<&RatingEntry> {
        self.entries.get(&criterion)
    }

    pub fn rating(&self, criterion: Criterion) -> Option<RatingLevel> {
        self.entries.get(&criterion).and_then(|e| e.rating)
    }

    pub fn rated_count(&self) -> usize {
        self.entries.values().filter(|e| e.rating.is_some()).count()
    }

    /// Criteria of a category with their current entry, in sheet order
    pub fn category(&self, category: RatingCategory) -> Vec<(Criterion, Option<&RatingEntry>)> {
        Criterion::in_category(category)
            .map(|c| (c, self.entries.get(&c)))
            .collect()
    }

    /// Mean of the rated criteria
    pub fn average(&self) -> Option<f64> {
        mean(self.entries.values().filter_map(|e| e.rating))
    }

    /// Upsert every rated criterion, in sheet order.
    ///
    /// Stops at the first failure; records written before it stay written
    /// and are remembered, so a later save patches them instead of creating
    /// duplicates.
    pub async fn save_all<S>(&mut self, store: &S) -> Result<SaveSummary>
    where
        S: RatingStore + ?Sized,
    {
        let mut summary = SaveSummary::default();
        let review_id = self.review_id;

        for (criterion, entry) in self.entries.iter_mut() {
            let Some(rating) = entry.rating else {
                if let Some(id) = entry.persisted_id {
                    if let Err(e) = store.delete_rating(id).await {
                        warn!("Removing cleared '{}' failed: {}", criterion, e);
                        return Err(e);
                    }
                    entry.persisted_id = None;
                    summary.deleted += 1;
                }
                continue;
            };

            let result = match entry.persisted_id {
                Some(id) => store
                    .update_rating(
                        id,
                        RatingUpdate {
                            rating: Some(rating),
                            comments: Some(entry.comments.clone()),
                        },
                    )
                    .await
                    .map(|_| summary.updated += 1),
                None => store
                    .create_rating(NewCompetencyRating {
                        appraisal_review: review_id,
                        category: criterion.category(),
                        criterion_name: criterion.name().to_string(),
                        rating,
                        comments: entry.comments.clone(),
                    })
                    .await
                    .map(|created| {
                        entry.persisted_id = Some(created.id);
                        summary.created += 1;
                    }),
            };

            if let Err(e) = result {
                warn!(
                    "Saving '{}' failed after {} of the review's ratings were written: {}",
                    criterion,
                    summary.total(),
                    e
                );
                return Err(e);
            }
        }

        info!(
            "Saved ratings for review {} ({} created, {} updated, {} deleted)",
            review_id, summary.created, summary.updated, summary.deleted
        );
        Ok(summary)
    }
}

/// The review on `appraisal` written by `user`
pub fn own_review<'a>(appraisal: &'a Appraisal, user: &User) -> Result<&'a AppraisalReview> {
    appraisal
        .reviews
        .iter()
        .find(|r| r.reviewer == user.id)
        .ok_or(AppraiseError::ReviewNotFound {
            appraisal: appraisal.id,
            reviewer: user.id,
        })
}

/// Mean rating across all completed reviews, the rule the backend uses for
/// `overall_rating_avg`
pub fn overall_average(reviews: &[AppraisalReview]) -> Option<f64> {
    mean(
        reviews
            .iter()
            .filter(|r| r.is_completed)
            .flat_map(|r| r.competency_ratings.iter().map(|c| c.rating)),
    )
}

fn mean(levels: impl Iterator<Item = RatingLevel>) -> Option<f64> {
    let (sum, count) = levels.fold((0u32, 0u32), |(sum, count), level| {
        (sum + u32::from(level.value()), count + 1)
    });
    (count > 0).then(|| f64::from(sum) / f64::from(count))
}
