//! Appraise - typed client for the employee appraisal service
//!
//! Provides everything a front end needs to drive appraisals against the
//! REST backend:
//! - Session management with bearer tokens and a single transparent refresh
//! - One service client per backend resource
//! - A rating sheet over the fixed competency criteria with upsert saves
//! - A signature pad that produces embeddable PNG payloads
//! - Page state machines for the list, create, detail and dashboard views
//!
//! # Architecture
//!
//! The crate is organized into several layers:
//! - **Types**: Backend resources (Appraisal, AppraisalReview, CompetencyRating, ...)
//! - **Session**: Persisted tokens and user behind a [`SessionStore`]
//! - **Transport**: Authenticated HTTP with the refresh-and-retry policy
//! - **Services**: Per-resource clients bundled in [`ApiClient`]
//! - **Pages**: View state driven by service results
//!
//! # Example
//!
//! ```ignore
//! use appraise_core::{ApiClient, ClientConfig, History, MemorySessionStore, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::load()?;
//!     let session = Arc::new(Session::create(Arc::new(MemorySessionStore::new())));
//!     let client = ApiClient::new(&config, session, Arc::new(History::default()))?;
//!
//!     client.auth().login("jane", "secret").await?;
//!     for appraisal in client.appraisals().list().await? {
//!         println!("{} {}", appraisal.id, appraisal.status.as_str());
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod criteria;
pub mod error;
pub mod pages;
pub mod router;
pub mod services;
pub mod session;
pub mod signature;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use aggregator::{RatingSheet, SaveSummary};
pub use config::ClientConfig;
pub use criteria::{resolve_category, Criterion};
pub use error::{AppraiseError, Result};
pub use router::{History, Navigator, Route};
pub use services::{ApiClient, RatingStore};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use signature::SignaturePad;
pub use transport::{ApiRequest, ApiTransport};
pub use types::{
    Appraisal, AppraisalCycle, AppraisalReview, AppraisalStatus, CompetencyRating, CycleStatus,
    MembershipRole, OverallEvaluation, Project, ProjectMembership, RatingCategory, RatingLevel,
    User,
};
