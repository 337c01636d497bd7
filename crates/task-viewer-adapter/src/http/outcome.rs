/*
[INPUT]:  Task id, assignment id and chosen outcome label
[OUTPUT]: Confirmation that the outcome was accepted
[POS]:    HTTP layer - outcome write-back endpoint (bearer auth)
[UPDATE]: When the assignment PATCH endpoint or body changes
*/

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::http::{Result, TASKS_ENDPOINT, TaskApiClient};
use crate::types::OutcomeRequest;

impl TaskApiClient {
    /// Complete a task assignment with the given outcome
    ///
    /// PATCH /workflows/v2/tasks/{taskId}/assignments/{assignmentId}
    pub async fn submit_outcome(&self, task_id: &str, assignment_id: &str, outcome: &str) -> Result<()> {
        let access_token = self.acquire_token().await?;

        let endpoint = outcome_endpoint(task_id, assignment_id);
        let body = OutcomeRequest {
            outcome: outcome.to_string(),
        };

        let builder = self
            .authorized_request(Method::PATCH, &endpoint, &access_token)?
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, application/problem+json")
            .json(&body);

        self.send_checked(builder).await?;
        tracing::info!(task_id, assignment_id, outcome, "task outcome submitted");
        Ok(())
    }
}

pub fn outcome_endpoint(task_id: &str, assignment_id: &str) -> String {
    format!(
        "{TASKS_ENDPOINT}/{}/assignments/{}",
        urlencoding::encode(task_id),
        urlencoding::encode(assignment_id)
    )
}
