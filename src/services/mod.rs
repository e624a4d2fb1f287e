//! Domain service clients
//!
//! Each service maps one domain operation onto one HTTP call through the
//! shared [`ApiTransport`]. No retries, no caching; errors propagate as-is.

pub mod appraisals;
pub mod auth;
pub mod cycles;
pub mod evaluations;
pub mod projects;
pub mod ratings;
pub mod reviews;

pub use appraisals::AppraisalService;
pub use auth::AuthService;
pub use cycles::CycleService;
pub use evaluations::EvaluationService;
pub use projects::ProjectService;
pub use ratings::{RatingService, RatingStore};
pub use reviews::ReviewService;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::router::Navigator;
use crate::session::Session;
use crate::transport::ApiTransport;

/// Bundle of all service clients over one transport
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<ApiTransport>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        session: Arc<Session>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let transport = ApiTransport::new(config, session, navigator)?;
        Ok(Self::from_transport(Arc::new(transport)))
    }

    pub fn from_transport(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<ApiTransport> {
        &self.transport
    }

    pub fn session(&self) -> &Arc<Session> {
        self.transport.session()
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.transport.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.transport.clone())
    }

    pub fn cycles(&self) -> CycleService {
        CycleService::new(self.transport.clone())
    }

    pub fn appraisals(&self) -> AppraisalService {
        AppraisalService::new(self.transport.clone())
    }

    pub fn reviews(&self) -> ReviewService {
        ReviewService::new(self.transport.clone())
    }

    pub fn ratings(&self) -> RatingService {
        RatingService::new(self.transport.clone())
    }

    pub fn evaluations(&self) -> EvaluationService {
        EvaluationService::new(self.transport.clone())
    }
}
