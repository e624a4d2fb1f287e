//! Service clients against a mock backend

mod common;

use appraise_core::pages::{
    AppraisalListPage, DashboardPage, ListState, ProjectListPage, QuickStats,
};
use appraise_core::types::{AppraisalStatus, AppraisalUpdate, OverallEvaluationUpdate};
use appraise_core::{AppraiseError, CycleStatus};
use common::spawn_app;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_evaluation_not_found_is_absent() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/overall-evaluations/"))
        .and(query_param("appraisal", "7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.server)
        .await;

    let evaluation = app.client.evaluations().for_appraisal(7).await.unwrap();
    assert!(evaluation.is_none());
}

#[tokio::test]
async fn test_evaluation_without_matching_row_is_absent() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/overall-evaluations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 3, "appraisal": 8}]
        })))
        .mount(&app.server)
        .await;

    assert!(app.client.evaluations().for_appraisal(7).await.unwrap().is_none());
}

#[tokio::test]
async fn test_evaluation_server_error_propagates() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/overall-evaluations/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&app.server)
        .await;

    let err = app.client.evaluations().for_appraisal(7).await.unwrap_err();
    assert!(matches!(err, AppraiseError::Server { status: 500, ref message } if message == "database unavailable"));
}

#[tokio::test]
async fn test_evaluation_update_sends_only_set_fields() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("PATCH"))
        .and(path("/overall-evaluations/3/"))
        .and(body_json(json!({"ready_for_promotion": true, "summary_comment": "Strong year"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "appraisal": 7, "ready_for_promotion": true, "summary_comment": "Strong year"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let update = OverallEvaluationUpdate {
        ready_for_promotion: Some(true),
        summary_comment: Some("Strong year".to_string()),
        ..Default::default()
    };
    let updated = app.client.evaluations().update(3, &update).await.unwrap();
    assert!(updated.ready_for_promotion);
    assert!(!updated.is_finalized());
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/appraisal-cycles/"))
        .and(query_param("status", "CLOSED"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "period_start": "2023-07-01", "period_end": "2023-12-31", "status": "CLOSED"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    let cycles = app.client.cycles().list_by_status(CycleStatus::Closed).await.unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].status, CycleStatus::Closed);
}

#[tokio::test]
async fn test_field_errors_are_joined() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("PATCH"))
        .and(path("/appraisals/7/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": ["\"ARCHIVED\" is not a valid choice."]
        })))
        .mount(&app.server)
        .await;

    let update = AppraisalUpdate {
        status: Some(AppraisalStatus::Completed),
        ..Default::default()
    };
    let err = app.client.appraisals().update(7, &update).await.unwrap_err();
    assert_eq!(
        err.user_message("fallback"),
        "status: \"ARCHIVED\" is not a valid choice."
    );
}

#[tokio::test]
async fn test_review_and_rating_filters() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/appraisal-reviews/"))
        .and(query_param("appraisal", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([common::review_json(false)])))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/competency-ratings/"))
        .and(query_param("appraisal_review", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0, "next": null, "previous": null, "results": []
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/competency-ratings/40/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    let reviews = app.client.reviews().list(Some(7)).await.unwrap();
    assert_eq!(reviews[0].competency_ratings.len(), 1);
    assert!(app.client.ratings().list(Some(11)).await.unwrap().is_empty());
    app.client.ratings().delete(40).await.unwrap();
}

#[tokio::test]
async fn test_list_page_states() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/appraisals/"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appraisals/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([common::appraisal_json()])))
        .mount(&app.server)
        .await;

    let mut page = AppraisalListPage::new(app.client.clone());
    assert!(page.state().is_loading());

    page.load().await;
    assert_eq!(page.state().error(), Some("Failed to load appraisals"));

    page.reload().await;
    assert!(matches!(page.state(), ListState::Populated(items) if items.len() == 1));
    assert_eq!(page.state().items()[0].appraisee_name, "Jane Doe");
}

#[tokio::test]
async fn test_project_list_page_states() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "name": "Alpha", "company_name": "Acme"},
            {"id": 6, "name": "Beta", "company_name": "Acme"}
        ])))
        .mount(&app.server)
        .await;

    let mut page = ProjectListPage::new(app.client.clone());
    assert!(page.state().is_loading());

    page.load().await;
    assert_eq!(page.state().error(), Some("Failed to load projects"));

    page.reload().await;
    let names: Vec<&str> = page.state().items().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn test_dashboard_loads_profile_and_stats() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    let mut completed = common::appraisal_json();
    completed["id"] = json!(8);
    completed["status"] = json!("COMPLETED");
    let mut pending = common::appraisal_json();
    pending["id"] = json!(9);
    pending["status"] = json!("PENDING");

    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "name": "Alpha", "company_name": "Acme"}
        ])))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appraisals/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::appraisal_json(),
            completed,
            pending
        ])))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut page = DashboardPage::new(app.client.clone());
    page.load().await;

    assert_eq!(page.greeting(), "Welcome, Rita Reviewer!");
    assert_eq!(page.error(), None);
    assert_eq!(
        page.stats(),
        Some(QuickStats {
            projects: 1,
            open: 2,
            completed: 1
        })
    );
}

#[tokio::test]
async fn test_dashboard_stats_failure_keeps_profile() {
    let app = spawn_app().await;
    app.sign_in("a1", "r1");

    Mock::given(method("GET"))
        .and(path("/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appraisals/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.server)
        .await;

    let mut page = DashboardPage::new(app.client.clone());
    page.load().await;

    assert_eq!(page.user().map(|u| u.id), Some(common::REVIEWER_ID));
    assert_eq!(page.stats(), None);
    assert_eq!(page.error(), Some("Failed to load stats"));
}
