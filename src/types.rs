//! Core data types for the appraisal client
//!
//! These mirror the JSON resources served by the appraisal backend. All of
//! them are backend-owned; the client only holds transient copies. Fields the
//! backend may omit in abbreviated payloads carry `#[serde(default)]`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppraiseError;

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub company: Option<i64>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub date_joined: Option<NaiveDate>,
    #[serde(default)]
    pub last_promotion_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
}

impl User {
    /// Name to greet the user with: full name when set, username otherwise
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

fn default_true() -> bool {
    true
}

/// Company owning projects and cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Named unit of work under a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub company: Option<i64>,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Role of a user inside a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipRole {
    /// Reviews other members; never appraised within the project
    Reporter,
    Member,
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipRole::Reporter => write!(f, "REPORTER"),
            MembershipRole::Member => write!(f, "MEMBER"),
        }
    }
}

/// Link between a user and a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub id: i64,
    #[serde(default)]
    pub project: Option<i64>,
    #[serde(default)]
    pub project_name: String,
    pub user: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    pub role: MembershipRole,
    #[serde(default)]
    pub joined_at: Option<NaiveDate>,
}

impl ProjectMembership {
    /// Only non-reporter members can be appraised
    pub fn is_appraisable(&self) -> bool {
        self.role != MembershipRole::Reporter
    }
}

/// Lifecycle of an appraisal cycle: DRAFT -> ACTIVE -> CLOSED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleStatus {
    Draft,
    Active,
    Closed,
}

impl CycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStatus::Draft => "DRAFT",
            CycleStatus::Active => "ACTIVE",
            CycleStatus::Closed => "CLOSED",
        }
    }
}

impl std::str::FromStr for CycleStatus {
    type Err = AppraiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(CycleStatus::Draft),
            "ACTIVE" => Ok(CycleStatus::Active),
            "CLOSED" => Ok(CycleStatus::Closed),
            other => Err(AppraiseError::InvalidOperation(format!(
                "unknown cycle status '{}'",
                other
            ))),
        }
    }
}

/// Time-bounded review period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalCycle {
    pub id: i64,
    #[serde(default)]
    pub company: Option<i64>,
    #[serde(default)]
    pub company_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: CycleStatus,
}

impl std::fmt::Display for AppraisalCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {} ({})",
            self.period_start,
            self.period_end,
            self.status.as_str()
        )
    }
}

/// Lifecycle of an appraisal: PENDING -> IN_PROGRESS -> COMPLETED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppraisalStatus {
    Pending,
    InProgress,
    Completed,
}

impl AppraisalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppraisalStatus::Pending => "PENDING",
            AppraisalStatus::InProgress => "IN_PROGRESS",
            AppraisalStatus::Completed => "COMPLETED",
        }
    }
}

impl std::str::FromStr for AppraisalStatus {
    type Err = AppraiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "PENDING" => Ok(AppraisalStatus::Pending),
            "IN_PROGRESS" => Ok(AppraisalStatus::InProgress),
            "COMPLETED" => Ok(AppraisalStatus::Completed),
            other => Err(AppraiseError::InvalidOperation(format!(
                "unknown appraisal status '{}'",
                other
            ))),
        }
    }
}

/// Cycle summary embedded in appraisal payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleInfo {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: String,
}

/// One evaluation of an appraisee, in a project, for a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appraisal {
    pub id: i64,
    pub cycle: i64,
    #[serde(default)]
    pub cycle_info: Option<CycleInfo>,
    pub appraisee: i64,
    #[serde(default)]
    pub appraisee_name: String,
    pub project: i64,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub discussion_date: Option<NaiveDate>,
    pub status: AppraisalStatus,
    #[serde(default)]
    pub reviews: Vec<AppraisalReview>,
    #[serde(default)]
    pub overall_evaluation: Option<OverallEvaluation>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating an appraisal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppraisal {
    pub cycle: i64,
    pub appraisee: i64,
    pub project: i64,
    pub discussion_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppraisalStatus>,
}

/// Partial update of an appraisal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppraisalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppraisalStatus>,
}

/// One reviewer's assessment of an appraisal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalReview {
    pub id: i64,
    pub appraisal: i64,
    pub reviewer: i64,
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Inline PNG data URL, empty when unsigned
    #[serde(default)]
    pub reviewer_signature_base64: String,
    #[serde(default)]
    pub reviewer_signed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub competency_ratings: Vec<CompetencyRating>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AppraisalReview {
    pub fn is_signed(&self) -> bool {
        !self.reviewer_signature_base64.is_empty()
    }
}

/// Partial update of a review
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_signature_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_signed_at: Option<DateTime<Utc>>,
}

/// Competency category a criterion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingCategory {
    WorkEfficiency,
    Productivity,
    Personal,
}

impl RatingCategory {
    pub const ALL: [RatingCategory; 3] = [
        RatingCategory::WorkEfficiency,
        RatingCategory::Productivity,
        RatingCategory::Personal,
    ];

    /// Heading shown above the category's criteria
    pub fn display_name(&self) -> &'static str {
        match self {
            RatingCategory::WorkEfficiency => "Work Efficiency",
            RatingCategory::Productivity => "Productivity & Supervisory",
            RatingCategory::Personal => "Personal Attributes",
        }
    }
}

/// Five-level ordinal rating scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RatingLevel {
    NotObserved = 1,
    Weak = 2,
    AsExpected = 3,
    Good = 4,
    Exceptional = 5,
}

impl RatingLevel {
    pub const ALL: [RatingLevel; 5] = [
        RatingLevel::NotObserved,
        RatingLevel::Weak,
        RatingLevel::AsExpected,
        RatingLevel::Good,
        RatingLevel::Exceptional,
    ];

    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingLevel::NotObserved => "Not Observed",
            RatingLevel::Weak => "Weak",
            RatingLevel::AsExpected => "As Expected",
            RatingLevel::Good => "Good",
            RatingLevel::Exceptional => "Exceptional",
        }
    }
}

impl TryFrom<u8> for RatingLevel {
    type Error = AppraiseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RatingLevel::NotObserved),
            2 => Ok(RatingLevel::Weak),
            3 => Ok(RatingLevel::AsExpected),
            4 => Ok(RatingLevel::Good),
            5 => Ok(RatingLevel::Exceptional),
            other => Err(AppraiseError::InvalidRating(other)),
        }
    }
}

impl From<RatingLevel> for u8 {
    fn from(level: RatingLevel) -> Self {
        level.value()
    }
}

impl std::fmt::Display for RatingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.value())
    }
}

/// One scored criterion within a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyRating {
    pub id: i64,
    pub appraisal_review: i64,
    pub category: RatingCategory,
    pub criterion_name: String,
    pub rating: RatingLevel,
    #[serde(default)]
    pub rating_display: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a competency rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCompetencyRating {
    pub appraisal_review: i64,
    pub category: RatingCategory,
    pub criterion_name: String,
    pub rating: RatingLevel,
    pub comments: String,
}

/// Partial update of a competency rating
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Cycle-level rollup for an appraisal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallEvaluation {
    pub id: i64,
    pub appraisal: i64,
    #[serde(default)]
    pub overall_rating_avg: Option<f64>,
    #[serde(default)]
    pub ready_for_advanced_work: bool,
    #[serde(default)]
    pub ready_for_promotion: bool,
    #[serde(default)]
    pub summary_comment: String,
    #[serde(default)]
    pub appraisee_signature_base64: String,
    #[serde(default)]
    pub appraisee_signed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hr_signature_base64: String,
    #[serde(default)]
    pub hr_signed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finalized_at: Option<DateTime<Utc>>,
}

impl OverallEvaluation {
    pub fn is_finalized(&self) -> bool {
        self.finalized_at.is_some()
    }
}

/// Partial update of an overall evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallEvaluationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_for_advanced_work: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_for_promotion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appraisee_signature_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appraisee_signed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr_signature_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr_signed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
}

/// Credentials for `/auth/login/`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Tokens and profile returned by `/auth/login/`
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access", &"[redacted]")
            .field("refresh", &"[redacted]")
            .field("user", &self.user)
            .finish()
    }
}

/// List endpoints answer either a bare array or a paginated envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListPayload<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListPayload<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Plain(items) => items,
            ListPayload::Paged { results } => results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_level_wire_format() {
        let json = serde_json::to_string(&RatingLevel::Good).unwrap();
        assert_eq!(json, "4");

        let level: RatingLevel = serde_json::from_str("5").unwrap();
        assert_eq!(level, RatingLevel::Exceptional);
        assert_eq!(level.label(), "Exceptional");

        assert!(serde_json::from_str::<RatingLevel>("0").is_err());
        assert!(serde_json::from_str::<RatingLevel>("6").is_err());
    }

    #[test]
    fn test_rating_labels_are_ordered() {
        let labels: Vec<&str> = RatingLevel::ALL.iter().map(|l| l.label()).collect();
        assert_eq!(
            labels,
            vec!["Not Observed", "Weak", "As Expected", "Good", "Exceptional"]
        );
    }

    #[test]
    fn test_category_wire_format() {
        let json = serde_json::to_string(&RatingCategory::WorkEfficiency).unwrap();
        assert_eq!(json, "\"WORK_EFFICIENCY\"");
    }

    #[test]
    fn test_abbreviated_membership_payload() {
        let membership: ProjectMembership = serde_json::from_str(
            r#"{"id": 9, "user": 42, "user_name": "Jane Doe", "role": "MEMBER"}"#,
        )
        .unwrap();
        assert_eq!(membership.user, 42);
        assert!(membership.is_appraisable());
    }

    #[test]
    fn test_appraisal_payload() {
        let appraisal: Appraisal = serde_json::from_str(
            r#"{
                "id": 7, "cycle": 1, "appraisee": 42, "project": 5,
                "cycle_info": {"period_start": "2024-01-01", "period_end": "2024-06-30", "status": "ACTIVE"},
                "discussion_date": "2024-07-01", "status": "IN_PROGRESS",
                "reviews": [], "overall_evaluation": null,
                "created_at": "2024-07-01T09:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(appraisal.status, AppraisalStatus::InProgress);
        assert_eq!(
            appraisal.discussion_date,
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
        assert!(appraisal.overall_evaluation.is_none());
    }

    #[test]
    fn test_new_appraisal_serialization() {
        let body = serde_json::to_value(NewAppraisal {
            cycle: 1,
            appraisee: 42,
            project: 5,
            discussion_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            status: Some(AppraisalStatus::Pending),
        })
        .unwrap();
        assert_eq!(body["discussion_date"], "2024-07-01");
        assert_eq!(body["status"], "PENDING");
    }

    #[test]
    fn test_partial_updates_skip_unset_fields() {
        let body = serde_json::to_value(ReviewUpdate {
            is_completed: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"is_completed": true}));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "in-progress".parse::<AppraisalStatus>().unwrap(),
            AppraisalStatus::InProgress
        );
        assert_eq!("active".parse::<CycleStatus>().unwrap(), CycleStatus::Active);
        assert!("archived".parse::<CycleStatus>().is_err());
    }

    #[test]
    fn test_list_payload_shapes() {
        let plain: ListPayload<Company> =
            serde_json::from_str(r#"[{"id": 1, "name": "Acme"}]"#).unwrap();
        assert_eq!(plain.into_vec().len(), 1);

        let paged: ListPayload<Company> = serde_json::from_str(
            r#"{"count": 1, "next": null, "results": [{"id": 1, "name": "Acme"}]}"#,
        )
        .unwrap();
        assert_eq!(paged.into_vec()[0].name, "Acme");
    }

    #[test]
    fn test_login_response_debug_redacts_tokens() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"access": "a.b.c", "refresh": "d.e.f", "user": {"id": 1, "username": "jane"}}"#,
        )
        .unwrap();
        let debug = format!("{:?}", response);
        assert!(!debug.contains("a.b.c"));
        assert!(debug.contains("jane"));
    }
}
