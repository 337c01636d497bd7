/*
[INPUT]:  FilterState plus client credentials/endpoint
[OUTPUT]: Normalized Task list from GET /workflows/v2/tasks
[POS]:    HTTP layer - task query endpoint (bearer auth)
[UPDATE]: When the tasks endpoint, response shape or mapping changes
*/

use reqwest::Method;
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::http::{FilterState, Result, TaskApiClient, TaskViewerError, build_query};
use crate::types::{Task, TaskRecord};

pub const TASKS_ENDPOINT: &str = "/workflows/v2/tasks";

impl TaskApiClient {
    /// Query tasks matching the filter
    ///
    /// GET /workflows/v2/tasks?workflowName=&assignee=&from=&to=&status=&workflowInstanceId=&cacheBuster=
    pub async fn fetch_tasks(&self, filter: &FilterState) -> Result<Vec<Task>> {
        let access_token = self.acquire_token().await?;

        let endpoint = format!("{TASKS_ENDPOINT}?{}", build_query(filter));
        tracing::debug!(%endpoint, "requesting tasks");

        let builder = self
            .authorized_request(Method::GET, &endpoint, &access_token)?
            .header(ACCEPT, "application/json");
        let response = self.send_checked(builder).await?;
        let body = response.text().await?;

        let tasks = parse_tasks_body(&body)?;
        tracing::info!(count = tasks.len(), "tasks fetched");
        Ok(tasks)
    }
}

/// Validate a tasks response body and map each record into a [`Task`]
pub fn parse_tasks_body(body: &str) -> Result<Vec<Task>> {
    let mut payload: Value = serde_json::from_str(body)
        .map_err(|e| TaskViewerError::MalformedResponse(format!("invalid JSON body: {e}")))?;

    let records = match payload.get_mut("tasks").map(Value::take) {
        Some(Value::Array(records)) => records,
        _ => {
            return Err(TaskViewerError::MalformedResponse(
                "Tasks is not an array or is missing from API response".to_string(),
            ));
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            if !raw.is_object() {
                return Err(TaskViewerError::MalformedResponse(format!(
                    "task at index {index} is not an object"
                )));
            }
            let record: TaskRecord = serde_json::from_value(raw).map_err(|e| {
                TaskViewerError::MalformedResponse(format!("task at index {index}: {e}"))
            })?;
            Ok(Task::from(record))
        })
        .collect()
}
