/*
[INPUT]:  Mock task API responses
[OUTPUT]: Verification of panel fetch, sort, outcome and config flows
[POS]:    Integration tests - panel controller against a mock server
[UPDATE]: When controller sequencing or listener events change
*/

mod common;

use std::time::Duration;

use common::{
    Event, mount_token, task_json, tasks_body, tasks_mock, tasks_response, test_config,
    test_controller,
};
use task_viewer_adapter::{StatusFilter, TASKS_ENDPOINT, TaskViewerError};
use task_viewer_panel::{FetchOutcome, FilterChange, PanelError, SubmissionState, SubmitError};
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_ids(tasks: &[task_viewer_adapter::Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}

fn approve_body() -> serde_json::Value {
    serde_json::json!({
        "tasks": [{
            "id": "T1",
            "name": "Approve expense",
            "status": "active",
            "createdDate": "2024-04-02T09:00:00Z",
            "outcomes": ["Approve", "Reject"],
            "taskAssignments": [{ "id": "A1", "assignee": "approver@example.com" }]
        }, {
            "id": "T2",
            "name": "Approve travel",
            "status": "active",
            "createdDate": "2024-04-03T09:00:00Z",
            "outcomes": ["Approve"],
            "taskAssignments": [{ "id": "A2" }]
        }]
    })
}

#[tokio::test]
async fn test_refresh_fills_store_in_created_order() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .and(query_param("assignee", "approver@example.com"))
        .and(query_param("status", "active"))
        .and(header("authorization", "Bearer panel-token"))
        .respond_with(tasks_response(tasks_body(vec![
            task_json("T2", "2024-04-10T00:00:00Z"),
            task_json("T1", "2024-04-01T00:00:00Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, listener) = test_controller(&server, test_config());
    let outcome = assert_ok!(controller.refresh().await);
    assert_eq!(outcome, FetchOutcome::Applied { count: 2 });
    assert!(!controller.is_loading());

    let tasks = controller.tasks().await;
    assert_eq!(task_ids(&tasks), ["T1", "T2"]);
    assert_eq!(
        listener.events(),
        vec![
            Event::FetchStarted,
            Event::FetchComplete(vec!["T1".to_string(), "T2".to_string()])
        ]
    );

    // toggling re-sorts locally, no second GET
    assert!(!controller.toggle_sort().await);
    let tasks = controller.tasks().await;
    assert_eq!(task_ids(&tasks), ["T2", "T1"]);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_tasks() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(tasks_body(vec![task_json("T1", "2024-04-01T00:00:00Z")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    tasks_mock()
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (controller, listener) = test_controller(&server, test_config());
    assert_ok!(controller.refresh().await);

    let err = controller.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        PanelError::Fetch(TaskViewerError::Api { status: 500, .. })
    ));

    let tasks = controller.tasks().await;
    assert_eq!(task_ids(&tasks), ["T1"]);

    let errors = listener.count(|e| matches!(e, Event::FetchError(_)));
    assert_eq!(errors, 1);
    let Some(Event::FetchError(message)) = listener.events().pop() else {
        panic!("expected fetch error event");
    };
    assert!(message.starts_with("Unable to load tasks."));
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(serde_json::json!({ "tasks": "nope" })))
        .mount(&server)
        .await;

    let (controller, _listener) = test_controller(&server, test_config());
    let err = controller.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        PanelError::Fetch(TaskViewerError::MalformedResponse(_))
    ));
    assert!(controller.tasks().await.is_empty());
}

#[tokio::test]
async fn test_approve_patches_first_assignment_then_fetches_once() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(approve_body()))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/workflows/v2/tasks/T1/assignments/A1"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({ "outcome": "Approve" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, listener) = test_controller(&server, test_config());
    assert_ok!(controller.refresh().await);

    let pending = assert_ok!(controller.request_outcome("T1", "Approve", "").await);
    assert_eq!(pending.assignment_id, "A1");
    assert_eq!(controller.submission_state(), SubmissionState::Confirming);
    assert!(listener.events().contains(&Event::ConfirmationRequested(
        "Are you sure you want to complete the task with the outcome of Approve?".to_string()
    )));

    // confirmation alone sends nothing
    let patches = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "PATCH")
        .count();
    assert_eq!(patches, 0);

    let done = assert_ok!(controller.confirm_outcome().await);
    assert_eq!(done.task_id, "T1");
    assert_eq!(controller.submission_state(), SubmissionState::Success);
    assert!(controller.pending_outcome().is_none());

    let events = listener.events();
    let submitted_at = events
        .iter()
        .position(|e| *e == Event::SubmitComplete("Approve".to_string()))
        .expect("submit complete event");
    let fetches_after = events[submitted_at..]
        .iter()
        .filter(|e| matches!(e, Event::FetchComplete(_)))
        .count();
    assert_eq!(fetches_after, 1);
}

#[tokio::test]
async fn test_rejected_outcome_is_not_retried() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(approve_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already completed"))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, listener) = test_controller(&server, test_config());
    assert_ok!(controller.refresh().await);
    assert_ok!(controller.request_outcome("T1", "Reject", "").await);

    let err = controller.confirm_outcome().await.unwrap_err();
    assert!(matches!(
        err,
        PanelError::Submit(SubmitError::Api(TaskViewerError::Api { status: 409, .. }))
    ));
    assert_eq!(controller.submission_state(), SubmissionState::Failed);
    assert_eq!(listener.count(|e| matches!(e, Event::SubmitError(_))), 1);

    // prior state stays visible
    let tasks = controller.tasks().await;
    assert_eq!(task_ids(&tasks), ["T1", "T2"]);
}

#[tokio::test]
async fn test_outcome_for_unknown_task_is_not_found() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(approve_body()))
        .mount(&server)
        .await;

    let (controller, _listener) = test_controller(&server, test_config());
    assert_ok!(controller.refresh().await);

    let err = controller.request_outcome("T404", "Approve", "").await.unwrap_err();
    assert!(matches!(
        err,
        PanelError::Submit(SubmitError::NotFound { ref task_id }) if task_id == "T404"
    ));
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
}

#[tokio::test]
async fn test_cancel_sends_nothing() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(approve_body()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (controller, _listener) = test_controller(&server, test_config());
    assert_ok!(controller.refresh().await);
    assert_ok!(controller.request_outcome("T1", "Approve", "").await);

    assert!(controller.cancel_outcome());
    assert_eq!(controller.submission_state(), SubmissionState::Idle);
    assert!(matches!(
        controller.confirm_outcome().await,
        Err(PanelError::Submit(SubmitError::NothingPending))
    ));
}

#[tokio::test]
async fn test_second_request_replaces_pending_confirmation() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(approve_body()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/workflows/v2/tasks/T2/assignments/A2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, _listener) = test_controller(&server, test_config());
    assert_ok!(controller.refresh().await);
    assert_ok!(controller.request_outcome("T1", "Approve", "").await);
    assert_ok!(controller.request_outcome("T2", "Approve", "").await);

    let done = assert_ok!(controller.confirm_outcome().await);
    assert_eq!(done.task_id, "T2");
}

#[tokio::test]
async fn test_request_while_submitting_is_busy() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(approve_body()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    let (controller, _listener) = test_controller(&server, test_config());
    assert_ok!(controller.refresh().await);
    assert_ok!(controller.request_outcome("T1", "Approve", "").await);

    let (submitted, second) = tokio::join!(controller.confirm_outcome(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.request_outcome("T2", "Approve", "").await
    });

    assert_ok!(submitted);
    assert!(matches!(second, Err(PanelError::Submit(SubmitError::Busy))));
}

#[tokio::test]
async fn test_stale_fetch_result_is_discarded() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    // the first fetch (status=active) answers late with old data
    tasks_mock()
        .and(query_param("status", "active"))
        .respond_with(
            tasks_response(tasks_body(vec![task_json("OLD", "2024-04-01T00:00:00Z")]))
                .set_delay(Duration::from_millis(400)),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    tasks_mock()
        .respond_with(tasks_response(tasks_body(vec![task_json("NEW", "2024-04-02T00:00:00Z")])))
        .mount(&server)
        .await;

    let (controller, listener) = test_controller(&server, test_config());

    let (first, second) = tokio::join!(controller.refresh(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller
            .update_filter(FilterChange::Status(StatusFilter::All))
            .await
    });

    assert_eq!(assert_ok!(first), FetchOutcome::Stale);
    assert_eq!(assert_ok!(second), FetchOutcome::Applied { count: 1 });

    let tasks = controller.tasks().await;
    assert_eq!(task_ids(&tasks), ["NEW"]);
    assert_eq!(
        listener.count(|e| matches!(e, Event::FetchComplete(_))),
        1
    );
}

#[tokio::test]
async fn test_hung_request_stays_loading_until_transport_timeout() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(
            tasks_response(tasks_body(Vec::new())).set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = test_config();
    config.request_timeout_seconds = 1;
    let (controller, _listener) = test_controller(&server, config);

    let (result, was_loading) = tokio::join!(controller.refresh(), async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        controller.is_loading()
    });

    assert!(was_loading);
    let err = result.unwrap_err();
    assert!(matches!(err, PanelError::Fetch(ref e) if e.is_timeout()));
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_apply_config_updates_filters_and_scheduler() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .and(query_param("assignee", "approver@example.com"))
        .respond_with(tasks_response(tasks_body(Vec::new())))
        .expect(1)
        .mount(&server)
        .await;
    tasks_mock()
        .and(query_param("assignee", "boss@example.com"))
        .respond_with(tasks_response(tasks_body(Vec::new())))
        .expect(2)
        .mount(&server)
        .await;

    let (mut controller, _listener) = test_controller(&server, test_config());
    assert_ok!(controller.start().await);
    assert!(!controller.is_auto_refreshing());

    let mut config = test_config();
    config.assignee_email = Some("boss@example.com".to_string());
    assert_ok!(controller.apply_config(config.clone()).await);
    assert_eq!(
        controller.filters().state().assignee.as_deref(),
        Some("boss@example.com")
    );
    assert!(!controller.is_auto_refreshing());

    config.auto_refresh_enabled = true;
    config.auto_refresh_interval_seconds = 60;
    assert_ok!(controller.apply_config(config).await);
    assert!(controller.is_auto_refreshing());

    controller.stop().await;
    assert!(!controller.is_auto_refreshing());
}

async fn task_fetch_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == TASKS_ENDPOINT)
        .count()
}

#[tokio::test]
async fn test_auto_refresh_tick_fetches_again() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    tasks_mock()
        .respond_with(tasks_response(tasks_body(vec![task_json("T1", "2024-04-01T00:00:00Z")])))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = test_config();
    config.auto_refresh_enabled = true;
    config.auto_refresh_interval_seconds = 15;
    let (mut controller, listener) = test_controller(&server, config);
    assert_ok!(controller.start().await);
    assert!(controller.is_auto_refreshing());
    assert_eq!(task_fetch_count(&server).await, 1);

    // let the timer task register its first tick before moving the clock
    tokio::task::yield_now().await;
    tokio::time::pause();
    tokio::time::advance(Duration::from_secs(15)).await;
    tokio::time::resume();

    let refetched = tokio::time::timeout(Duration::from_secs(5), async {
        while listener.count(|e| matches!(e, Event::FetchComplete(_))) < 2 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(refetched.is_ok(), "timer tick did not trigger a fetch");
    assert_eq!(task_fetch_count(&server).await, 2);

    controller.stop().await;
}

#[tokio::test]
async fn test_apply_config_rejects_invalid_interval() {
    let server = MockServer::start().await;
    let (mut controller, _listener) = test_controller(&server, test_config());

    let mut config = test_config();
    config.auto_refresh_enabled = true;
    config.auto_refresh_interval_seconds = 5;

    let err = controller.apply_config(config).await.unwrap_err();
    assert!(matches!(err, PanelError::Config(_)));
    assert_eq!(controller.config(), test_config());
}
