//! Common test utilities and helpers

#![allow(dead_code)]

use appraise_core::{
    session::{SessionStore, ACCESS_TOKEN_KEY},
    types::LoginResponse,
    ApiClient, ClientConfig, History, MemorySessionStore, Navigator, Session,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

/// Reviewer signed in by [`TestApp::sign_in`]
pub const REVIEWER_ID: i64 = 3;

/// Client stack wired to a mock backend
pub struct TestApp {
    pub server: MockServer,
    pub client: ApiClient,
    pub store: Arc<MemorySessionStore>,
    pub history: Arc<History>,
}

impl TestApp {
    /// Store tokens and the reviewer profile as a login would
    pub fn sign_in(&self, access: &str, refresh: &str) {
        let login: LoginResponse = serde_json::from_value(json!({
            "access": access,
            "refresh": refresh,
            "user": reviewer_json(),
        }))
        .expect("valid login response");
        self.client
            .session()
            .authenticate(&login)
            .expect("Failed to store session");
    }

    /// Only an access token, as left behind by an older client
    pub fn sign_in_without_refresh(&self, access: &str) {
        self.store
            .set(ACCESS_TOKEN_KEY, access)
            .expect("Failed to store token");
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }
}

/// Start a mock backend and a client pointed at it
pub async fn spawn_app() -> TestApp {
    let server = MockServer::start().await;
    let config = ClientConfig {
        api_url: server.uri(),
        timeout_secs: 5,
        session_dir: None,
    };

    let store = Arc::new(MemorySessionStore::new());
    let session = Arc::new(Session::create(store.clone()));
    let history = Arc::new(History::default());
    let navigator: Arc<dyn Navigator> = history.clone();
    let client = ApiClient::new(&config, session, navigator).expect("Failed to build client");

    TestApp {
        server,
        client,
        store,
        history,
    }
}

pub fn reviewer_json() -> Value {
    json!({
        "id": REVIEWER_ID,
        "username": "rita",
        "email": "rita@example.com",
        "full_name": "Rita Reviewer",
        "position": "Lead",
        "division": "Engineering"
    })
}

/// Appraisal 7 of Jane Doe with two reviews; review 11 belongs to the
/// signed-in reviewer and already rates one criterion.
pub fn appraisal_json() -> Value {
    json!({
        "id": 7,
        "cycle": 1,
        "cycle_info": {"period_start": "2024-01-01", "period_end": "2024-06-30", "status": "ACTIVE"},
        "appraisee": 42,
        "appraisee_name": "Jane Doe",
        "project": 5,
        "project_name": "Alpha",
        "discussion_date": "2024-07-01",
        "status": "IN_PROGRESS",
        "reviews": [
            {
                "id": 10,
                "appraisal": 7,
                "reviewer": 8,
                "reviewer_name": "Other Reviewer",
                "is_completed": true,
                "competency_ratings": [
                    {"id": 30, "appraisal_review": 10, "category": "PERSONAL",
                     "criterion_name": "Manner and appearance", "rating": 5}
                ]
            },
            review_json(false)
        ],
        "overall_evaluation": null
    })
}

pub fn review_json(signed: bool) -> Value {
    let signature = if signed {
        "data:image/png;base64,AAAA"
    } else {
        ""
    };
    json!({
        "id": 11,
        "appraisal": 7,
        "reviewer": REVIEWER_ID,
        "reviewer_name": "Rita Reviewer",
        "is_completed": signed,
        "reviewer_signature_base64": signature,
        "competency_ratings": [
            {"id": 40, "appraisal_review": 11, "category": "WORK_EFFICIENCY",
             "criterion_name": "Work accuracy and correctness", "rating": 2,
             "comments": "rushes reviews", "created_at": "2024-07-01T09:00:00Z"}
        ]
    })
}
