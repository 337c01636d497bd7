/*
[INPUT]:  FilterState (assignee, date range, workflow name/instance, status)
[OUTPUT]: Canonical, percent-encoded query string with a cache-busting suffix
[POS]:    HTTP layer - task query construction
[UPDATE]: When query parameters are added or renamed
*/

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::StatusFilter;

pub const CACHE_BUSTER_PARAM: &str = "cacheBuster";

static LAST_CACHE_BUSTER: AtomicI64 = AtomicI64::new(0);

/// Current query criteria for the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub workflow_name: Option<String>,
    pub assignee: Option<String>,
    /// Lower bound on task creation, `YYYY-MM-DD` or RFC 3339
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: StatusFilter,
    pub workflow_instance_id: Option<String>,
}

impl FilterState {
    /// Query parameters in their fixed order, empty values dropped
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let candidates: [(&'static str, Option<&str>); 6] = [
            ("workflowName", self.workflow_name.as_deref()),
            ("assignee", self.assignee.as_deref()),
            ("from", self.from.as_deref()),
            ("to", self.to.as_deref()),
            ("status", self.status.query_value()),
            ("workflowInstanceId", self.workflow_instance_id.as_deref()),
        ];

        candidates
            .into_iter()
            .filter_map(|(key, value)| {
                let value = value?.trim();
                (!value.is_empty()).then_some((key, value))
            })
            .collect()
    }
}

/// Build the task query string with a fresh cache-busting value
pub fn build_query(filter: &FilterState) -> String {
    build_query_with_cache_buster(filter, next_cache_buster())
}

/// Build the task query string with an explicit cache-busting value
pub fn build_query_with_cache_buster(filter: &FilterState, cache_buster: i64) -> String {
    let mut params: Vec<String> = filter
        .query_pairs()
        .into_iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();
    params.push(format!("{CACHE_BUSTER_PARAM}={cache_buster}"));
    params.join("&")
}

/// Current time in milliseconds, strictly increasing within the process
fn next_cache_buster() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_CACHE_BUSTER
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1)
}
