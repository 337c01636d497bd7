/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared panel test utilities, fixtures, and a recording listener
[POS]:    Test infrastructure - shared across panel test modules
[UPDATE]: When adding new test patterns or fixtures
*/

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use task_viewer_adapter::{TASKS_ENDPOINT, TOKEN_ENDPOINT, Task};
use task_viewer_panel::{PanelConfig, PanelError, PanelListener, PendingOutcome, TaskPanelController};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Event seen by [`RecordingListener`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FetchStarted,
    FetchComplete(Vec<String>),
    FetchError(String),
    ConfirmationRequested(String),
    SubmitComplete(String),
    SubmitError(String),
}

#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Event>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl PanelListener for RecordingListener {
    fn on_fetch_started(&self) {
        self.push(Event::FetchStarted);
    }

    fn on_fetch_complete(&self, tasks: &[Task]) {
        self.push(Event::FetchComplete(tasks.iter().map(|t| t.id.clone()).collect()));
    }

    fn on_fetch_error(&self, error: &PanelError) {
        self.push(Event::FetchError(error.user_message()));
    }

    fn on_confirmation_requested(&self, pending: &PendingOutcome) {
        self.push(Event::ConfirmationRequested(pending.prompt()));
    }

    fn on_submit_complete(&self, pending: &PendingOutcome) {
        self.push(Event::SubmitComplete(pending.outcome.clone()));
    }

    fn on_submit_error(&self, _pending: &PendingOutcome, error: &PanelError) {
        self.push(Event::SubmitError(error.to_string()));
    }
}

pub fn test_config() -> PanelConfig {
    let mut config = PanelConfig::new("test-client", "test-secret");
    config.user_email = Some("approver@example.com".to_string());
    config
}

/// Controller against the mock server plus the listener it reports to
pub fn test_controller(
    server: &MockServer,
    config: PanelConfig,
) -> (TaskPanelController, Arc<RecordingListener>) {
    let listener = Arc::new(RecordingListener::default());
    let controller = TaskPanelController::with_base_url(config, server.uri(), listener.clone())
        .expect("controller init");
    (controller, listener)
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "panel-token",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

pub fn tasks_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn tasks_mock() -> wiremock::MockBuilder {
    Mock::given(method("GET")).and(path(TASKS_ENDPOINT))
}

pub fn task_json(id: &str, created: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Task {id}"),
        "workflowName": "Expenses",
        "status": "active",
        "createdDate": created,
        "message": "",
        "outcomes": ["Approve", "Reject"],
        "taskAssignments": [
            { "id": format!("A-{id}"), "assignee": "approver@example.com", "status": "active" }
        ]
    })
}

pub fn tasks_body(tasks: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "tasks": tasks })
}
