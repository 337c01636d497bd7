/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for task-viewer-adapter tests

use task_viewer_adapter::{ClientConfig, Credentials, TOKEN_ENDPOINT, TaskApiClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn test_client(server: &MockServer, config: ClientConfig) -> TaskApiClient {
    TaskApiClient::with_config_and_base_url(config, &server.uri(), test_credentials())
        .expect("client init")
}

pub fn test_credentials() -> Credentials {
    Credentials::new("test-client", "test-secret")
}

/// Mount a token endpoint that always issues `token`
#[allow(dead_code)]
pub async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

/// A tasks response with one outcome task and one open-link task
pub fn sample_tasks_body() -> serde_json::Value {
    serde_json::json!({
        "tasks": [
            {
                "id": "T1",
                "name": "Approve expense",
                "workflowName": "Expenses",
                "status": "active",
                "createdDate": "2024-04-02T09:00:00Z",
                "message": "Team offsite",
                "outcomes": ["Approve", "Reject"],
                "taskAssignments": [
                    {
                        "id": "A1",
                        "assignee": "approver@example.com",
                        "completedBy": null,
                        "completedDate": null,
                        "status": "active",
                        "urls": { "formUrl": "" }
                    }
                ]
            },
            {
                "id": "T2",
                "name": "Fill onboarding form",
                "workflowName": "Onboarding",
                "status": "complete",
                "createdDate": "2024-03-15T12:30:00Z",
                "message": "",
                "taskAssignments": [
                    {
                        "id": "A9",
                        "assignee": "hr@example.com",
                        "completedBy": "hr@example.com",
                        "completedDate": "2024-03-16T08:00:00Z",
                        "status": "complete",
                        "urls": { "formUrl": "https://forms.example.com/a9" }
                    }
                ]
            }
        ]
    })
}
