/*
[INPUT]:  Raw task records from GET /workflows/v2/tasks
[OUTPUT]: Normalized Task view model with derived display fields
[POS]:    Data layer - wire records and the view model they map into
[UPDATE]: When API schema changes or derived fields change
*/

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::TaskStatus;

/// Task record as returned by the tasks endpoint.
///
/// Every field defaults when missing or `null` so that a sparse record still maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRecord {
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub id: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub name: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub workflow_name: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub status: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub created_date: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<String>>,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub task_assignments: Vec<TaskAssignmentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskAssignmentRecord {
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub id: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub assignee: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub completed_by: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub completed_date: String,
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub status: String,
    #[serde(deserialize_with = "serde_helpers::null_as_default")]
    pub urls: AssignmentUrls,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentUrls {
    #[serde(deserialize_with = "serde_helpers::string_or_empty")]
    pub form_url: String,
}

/// One delegate's responsibility record for a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub assignee: String,
    pub completed_by: String,
    pub completed_date: String,
    pub status: String,
    pub form_url: String,
}

impl From<TaskAssignmentRecord> for Assignment {
    fn from(record: TaskAssignmentRecord) -> Self {
        Self {
            id: record.id,
            assignee: record.assignee,
            completed_by: record.completed_by,
            completed_date: record.completed_date,
            status: record.status,
            form_url: record.urls.form_url,
        }
    }
}

/// Normalized task view model.
///
/// `assignee_email`, `completed_by`, `date_completed` and `open_task_url` are
/// derived from the first assignment only. With no assignments they stay empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub workflow_name: String,
    pub status: TaskStatus,
    pub created_date: Option<DateTime<Utc>>,
    pub assignee_email: String,
    pub completed_by: String,
    pub date_completed: Option<DateTime<Utc>>,
    pub open_task_url: String,
    pub outcomes: Option<Vec<String>>,
    pub message: String,
    pub assignments: Vec<Assignment>,
}

/// What a user can do with a task from the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction<'a> {
    /// Open the task form at the given URL.
    Open(&'a str),
    /// Pick one of the listed outcomes.
    ChooseOutcome(&'a [String]),
    None,
}

impl Task {
    pub fn first_assignment(&self) -> Option<&Assignment> {
        self.assignments.first()
    }

    /// Direct link wins over outcome buttons; only active tasks are actionable.
    pub fn action(&self) -> TaskAction<'_> {
        if !self.status.is_active() {
            return TaskAction::None;
        }
        if !self.open_task_url.is_empty() {
            return TaskAction::Open(&self.open_task_url);
        }
        match self.outcomes.as_deref() {
            Some(outcomes) if !outcomes.is_empty() => TaskAction::ChooseOutcome(outcomes),
            _ => TaskAction::None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self.action(), TaskAction::None)
    }

    pub fn has_outcome(&self, outcome: &str) -> bool {
        self.outcomes
            .as_deref()
            .is_some_and(|outcomes| outcomes.iter().any(|o| o == outcome))
    }
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        let status = TaskStatus::from_wire(&record.status);
        if let TaskStatus::Unknown(raw) = &status {
            tracing::warn!(task_id = %record.id, status = %raw, "unexpected task status");
        }

        let assignments: Vec<Assignment> = record
            .task_assignments
            .into_iter()
            .map(Assignment::from)
            .collect();

        let (assignee_email, completed_by, date_completed, open_task_url) =
            match assignments.first() {
                Some(first) => (
                    first.assignee.clone(),
                    first.completed_by.clone(),
                    parse_timestamp(&first.completed_date),
                    first.form_url.clone(),
                ),
                None => (String::new(), String::new(), None, String::new()),
            };

        Self {
            id: record.id,
            name: record.name,
            workflow_name: record.workflow_name,
            status,
            created_date: parse_timestamp(&record.created_date),
            assignee_email,
            completed_by,
            date_completed,
            open_task_url,
            outcomes: record.outcomes,
            message: record.message,
            assignments,
        }
    }
}

/// Parse an API timestamp. Accepts RFC 3339, naive ISO date-times (taken as UTC)
/// and plain dates. Empty or unparseable input yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

mod serde_helpers {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Null => Ok(String::new()),
            Value::String(raw) => Ok(raw),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            _ => Err(serde::de::Error::custom("expected a string value")),
        }
    }

    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}
